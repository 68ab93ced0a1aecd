fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=secrets.local.rs");
    emit_local_secrets();
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

const SECRET_NAMES: [&str; 8] = [
    "WIFI_SSID",
    "WIFI_PASS",
    "TWELVEDATA_API_KEY",
    "VISUALCROSSING_API_KEY",
    "WEATHER_LOCATION",
    "STOCK_TICKER_LIST",
    "WEATHER_UNITS",
    "TIMEZONE",
];

/// Turn `pub const NAME: &str = "..."` lines of `secrets.local.rs` into
/// `LOCAL_NAME` compile-time env vars read by `config.rs`.
fn emit_local_secrets() {
    let path = std::path::Path::new("secrets.local.rs");
    let Ok(src) = std::fs::read_to_string(path) else {
        return;
    };

    for name in SECRET_NAMES {
        if let Some(v) = extract_rust_str_const(&src, name) {
            println!("cargo:rustc-env=LOCAL_{}={}", name, v);
        }
    }
}

fn extract_rust_str_const(src: &str, name: &str) -> Option<String> {
    for line in src.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") {
            continue;
        }
        let needle = format!("pub const {}:", name);
        if !trimmed.starts_with(&needle) {
            continue;
        }
        let start = trimmed.find('"')?;
        let end = trimmed[start + 1..].find('"')? + start + 1;
        return Some(trimmed[start + 1..end].to_string());
    }
    None
}
