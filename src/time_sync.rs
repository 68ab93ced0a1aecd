use anyhow::Result;
use esp_idf_svc::sntp::{EspSntp, OperatingMode, SntpConf, SyncMode, SyncStatus};
use log::info;
use std::thread;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};

const SNTP_SERVER: &str = "pool.ntp.org";
const SYNC_TIMEOUT_MS: u32 = 20_000;
const POLL_INTERVAL_MS: u32 = 250;

/// Start SNTP with the given POSIX timezone and wait up to 20s for the first
/// sync. Keep the returned handle alive for periodic re-sync.
pub fn sync_time(tz: &str) -> Result<EspSntp<'static>> {
    info!("Setting timezone: {}", tz);
    // Safety: single-threaded at this point during init
    unsafe {
        std::env::set_var("TZ", tz);
    }

    let conf = SntpConf {
        servers: [SNTP_SERVER, "time.nist.gov"],
        sync_mode: SyncMode::Immediate,
        operating_mode: OperatingMode::Poll,
    };

    info!("Starting SNTP sync with {}", SNTP_SERVER);
    let sntp = EspSntp::new_with_callback(&conf, |_| {
        info!("SNTP sync callback triggered");
    })?;

    let mut elapsed_ms = 0u32;
    while elapsed_ms < SYNC_TIMEOUT_MS {
        if sntp.get_sync_status() == SyncStatus::Completed {
            let t = SystemClock::new().local_time();
            info!(
                "SNTP time synchronized after {}ms, local time {}:{}",
                elapsed_ms,
                t.hour_padded(),
                t.minute_padded()
            );
            return Ok(sntp);
        }
        thread::sleep(Duration::from_millis(POLL_INTERVAL_MS as u64));
        elapsed_ms += POLL_INTERVAL_MS;
    }

    log::warn!(
        "SNTP sync not completed within {}s, continuing anyway (will sync in background)",
        SYNC_TIMEOUT_MS / 1000
    );
    Ok(sntp)
}
