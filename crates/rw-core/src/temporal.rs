//! Time-of-day and day-of-week traffic multipliers.
//!
//! Both functions read the *local* wall clock carried by their argument, so
//! callers should pass a time already converted to the feed's zone.

use chrono::{Datelike, Timelike, Weekday};

pub const RUSH_HOUR_WEIGHT: f64 = 2.0;
pub const LATE_NIGHT_WEIGHT: f64 = 0.5;
pub const WEEKEND_WEIGHT: f64 = 0.7;
pub const PRE_WEEKEND_WEIGHT: f64 = 1.3;

/// Hour-of-day multiplier.
///
/// `2.0` during 07:00–09:59 and 17:00–19:59, `0.5` during 23:00–04:59,
/// `1.0` otherwise.
pub fn hour_weight<T: Timelike>(now: &T) -> f64 {
    match now.hour() {
        7..=9 | 17..=19 => RUSH_HOUR_WEIGHT,
        23 | 0..=4 => LATE_NIGHT_WEIGHT,
        _ => 1.0,
    }
}

/// Day-of-week multiplier: `0.7` on Saturday and Sunday, `1.3` on Friday,
/// `1.0` otherwise.
pub fn day_weight<T: Datelike>(now: &T) -> f64 {
    match now.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_WEIGHT,
        Weekday::Fri => PRE_WEEKEND_WEIGHT,
        _ => 1.0,
    }
}

/// Combined multiplier applied to every weighted draw.
pub fn intensity<T: Timelike + Datelike>(now: &T) -> f64 {
    hour_weight(now) * day_weight(now)
}
