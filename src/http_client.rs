use anyhow::Result;

/// Status line and body of a finished GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: i32,
    pub body: String,
}

/// Blocking HTTP GET, the only network primitive widgets use.
///
/// `Err` means the request never produced a response (DNS, TLS, timeout).
pub trait HttpGet {
    fn get(&mut self, url: &str) -> Result<HttpResponse>;
}

/// Shorten a URL for logs so API keys and long queries stay out of the console.
pub fn redact(url: &str) -> String {
    let base = url.split('?').next().unwrap_or(url);
    base.chars().take(80).collect()
}

#[cfg(feature = "espidf")]
pub use esp::EspHttpClient;

#[cfg(feature = "espidf")]
mod esp {
    use anyhow::{bail, Result};
    use embedded_svc::http::client::Client;
    use embedded_svc::http::Method;
    use embedded_svc::io::Read;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::info;

    use super::{redact, HttpGet, HttpResponse};

    const TIMEOUT_MS: u64 = 15_000;
    const MAX_BODY_BYTES: usize = 32 * 1024;

    /// HTTPS client over the ESP-IDF connection with the global CA bundle.
    pub struct EspHttpClient;

    impl HttpGet for EspHttpClient {
        fn get(&mut self, url: &str) -> Result<HttpResponse> {
            let config = Configuration {
                timeout: Some(std::time::Duration::from_millis(TIMEOUT_MS)),
                use_global_ca_store: true,
                crt_bundle_attach: Some(esp_idf_sys::esp_crt_bundle_attach),
                ..Default::default()
            };

            let connection = EspHttpConnection::new(&config)?;
            let mut client = Client::wrap(connection);
            let mut response = client.request(Method::Get, url, &[])?.submit()?;

            let status = response.status() as i32;
            info!("HTTP GET {} -> status {}", redact(url), status);

            let mut body: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = response.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&buf[..n]);
                if body.len() > MAX_BODY_BYTES {
                    bail!("Response too large (>32KB)");
                }
            }

            Ok(HttpResponse {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}
