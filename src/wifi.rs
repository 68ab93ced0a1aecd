use anyhow::Result;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::info;

const CONNECT_ATTEMPTS: u32 = 5;

/// Station handle plus the outcome of the initial association.
pub struct WifiLink {
    pub wifi: Box<EspWifi<'static>>,
    pub connected: bool,
    pub ip_address: Option<String>,
}

/// Log association state from ESP-IDF internals.
fn log_wifi_diag(label: &str) {
    unsafe {
        let mut ap_info: esp_idf_sys::wifi_ap_record_t = core::mem::zeroed();
        let rc = esp_idf_sys::esp_wifi_sta_get_ap_info(&mut ap_info);
        if rc == esp_idf_sys::ESP_OK {
            info!(
                "WiFi [{}]: assoc=YES rssi={} ch={}",
                label, ap_info.rssi, ap_info.primary
            );
        } else {
            info!("WiFi [{}]: assoc=NO (ap_info err={})", label, rc);
        }
    }
}

fn elapsed_ms_since(t0: i64) -> i64 {
    (unsafe { esp_idf_sys::esp_timer_get_time() } - t0) / 1000
}

/// Try to associate, cycling the radio between failed attempts.
fn connect_with_retries(wifi: &mut BlockingWifi<&mut EspWifi<'static>>, what: &str) -> bool {
    for attempt in 1..=CONNECT_ATTEMPTS {
        let t0 = unsafe { esp_idf_sys::esp_timer_get_time() };
        match wifi.connect() {
            Ok(_) => {
                info!(
                    "WiFi {} OK on attempt {} ({}ms)",
                    what,
                    attempt,
                    elapsed_ms_since(t0)
                );
                log_wifi_diag(&format!("{} {} OK", what, attempt));
                return true;
            }
            Err(e) => {
                log::warn!(
                    "WiFi {} attempt {}/{} failed after {}ms: {}",
                    what,
                    attempt,
                    CONNECT_ATTEMPTS,
                    elapsed_ms_since(t0),
                    e
                );
                log_wifi_diag(&format!("{} {} FAIL", what, attempt));
                if attempt < CONNECT_ATTEMPTS {
                    let _ = wifi.disconnect();
                    wifi.stop().ok();
                    std::thread::sleep(std::time::Duration::from_millis(500));
                    wifi.start().ok();
                    std::thread::sleep(std::time::Duration::from_millis(300));
                }
            }
        }
    }
    false
}

pub fn connect_wifi(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    ssid: &str,
    password: &str,
) -> Result<WifiLink> {
    let mut esp_wifi = Box::new(EspWifi::new(modem, sysloop.clone(), None)?);

    let auth = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    let mut wifi_ssid = heapless::String::<32>::new();
    let mut wifi_pass = heapless::String::<64>::new();
    wifi_ssid.push_str(ssid).ok();
    wifi_pass.push_str(password).ok();

    esp_wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: wifi_ssid,
        password: wifi_pass,
        auth_method: auth,
        ..Default::default()
    }))?;

    let mut ip_address = None;
    let connected;
    {
        let mut blocking_wifi = BlockingWifi::wrap(esp_wifi.as_mut(), sysloop)?;
        blocking_wifi.start()?;
        info!("WiFi connecting to '{}'...", ssid);

        connected = connect_with_retries(&mut blocking_wifi, "connect");
        if connected {
            blocking_wifi.wait_netif_up()?;
            let ip_info = blocking_wifi.wifi().sta_netif().get_ip_info()?;
            info!("WiFi connected, IP: {}", ip_info.ip);
            ip_address = Some(ip_info.ip.to_string());
        } else {
            log::warn!(
                "WiFi failed after {} attempts; will retry later",
                CONNECT_ATTEMPTS
            );
        }
    }

    Ok(WifiLink {
        wifi: esp_wifi,
        connected,
        ip_address,
    })
}

/// Re-associate an existing station. `Ok(None)` when every attempt failed.
pub fn reconnect_existing(
    wifi: &mut EspWifi<'static>,
    sysloop: EspSystemEventLoop,
) -> Result<Option<String>> {
    let mut blocking_wifi = BlockingWifi::wrap(wifi, sysloop)?;
    let _ = blocking_wifi.start();

    if !connect_with_retries(&mut blocking_wifi, "reconnect") {
        return Ok(None);
    }

    blocking_wifi.wait_netif_up()?;
    let ip_info = blocking_wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi reconnected, IP: {}", ip_info.ip);
    Ok(Some(ip_info.ip.to_string()))
}
