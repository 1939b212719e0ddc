//! Timestamp formats used in experiment files
//!
//! All stamps are local wall-clock time.

use chrono::{Local, NaiveDateTime};

/// Current local time.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `2024-05-01`
#[must_use]
pub fn date(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// `14:03:27`
#[must_use]
pub fn seconds(t: &NaiveDateTime) -> String {
    t.format("%H:%M:%S").to_string()
}

/// `14:03:27.51` (fly init and series start)
#[must_use]
pub fn centiseconds(t: &NaiveDateTime) -> String {
    let mut s = micros(t);
    s.truncate(s.len() - 4);
    s
}

/// `14:03:27.518204` (epochs and note keys)
#[must_use]
pub fn micros(t: &NaiveDateTime) -> String {
    t.format("%H:%M:%S%.6f").to_string()
}
