use std::time::Instant;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Broken-down local wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalTime {
    pub hour: u32,
    pub minute: u32,
    /// Day of month, 1-based.
    pub day: u32,
    /// Month, 1-based.
    pub month: u32,
    /// 0 = Sunday.
    pub weekday: u32,
}

impl LocalTime {
    /// Minutes since midnight; changes exactly when the clock face does.
    pub fn clock_stamp(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month.max(1) as usize - 1) % 12]
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday as usize % 7]
    }

    /// Three-letter name of the weekday `days_ahead` days from now.
    pub fn short_weekday_after(&self, days_ahead: u32) -> &'static str {
        let name = WEEKDAY_NAMES[((self.weekday + days_ahead) % 7) as usize];
        &name[..3]
    }

    pub fn hour_padded(&self) -> String {
        format!("{:02}", self.hour)
    }

    pub fn minute_padded(&self) -> String {
        format!("{:02}", self.minute)
    }
}

/// Time capability handed to widgets at construction.
pub trait Clock {
    /// Monotonic milliseconds since boot.
    fn now_ms(&self) -> u64;
    fn local_time(&self) -> LocalTime;
}

/// Monotonic ms from process start, wall time from the C library (TZ aware,
/// set by SNTP on device). Copies share the same start instant.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn local_time(&self) -> LocalTime {
        let mut now: libc::time_t = 0;
        let mut tm: libc::tm = unsafe { std::mem::zeroed() };
        unsafe {
            libc::time(&mut now);
            libc::localtime_r(&now, &mut tm);
        }
        LocalTime {
            hour: tm.tm_hour as u32,
            minute: tm.tm_min as u32,
            day: tm.tm_mday as u32,
            month: tm.tm_mon as u32 + 1,
            weekday: tm.tm_wday as u32,
        }
    }
}
