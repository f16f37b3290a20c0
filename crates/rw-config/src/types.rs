use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// HumanDuration
// ---------------------------------------------------------------------------

/// Unit suffixes accepted by [`HumanDuration`], largest first.
const UNITS: [(&str, Duration); 4] = [
    ("h", Duration::from_secs(3600)),
    ("m", Duration::from_secs(60)),
    ("s", Duration::from_secs(1)),
    ("ms", Duration::from_millis(1)),
];

/// A duration written as one or more `<number><unit>` terms, e.g. `"5s"`,
/// `"30m"`, `"1m30s"` or `"500ms"`. Units: `h`, `m`, `s`, `ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(Duration);

impl HumanDuration {
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<HumanDuration> for Duration {
    fn from(hd: HumanDuration) -> Self {
        hd.0
    }
}

impl From<Duration> for HumanDuration {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl FromStr for HumanDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("empty duration string");
        }

        let mut total = Duration::ZERO;
        let mut rest = s;
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                anyhow::bail!("expected a number in duration {s:?}");
            }
            let value: u32 = rest[..digits]
                .parse()
                .map_err(|_| anyhow::anyhow!("number too large in duration {s:?}"))?;
            rest = &rest[digits..];

            let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            let suffix = &rest[..unit_len];
            let Some((_, unit)) = UNITS.iter().find(|(name, _)| *name == suffix) else {
                anyhow::bail!("unsupported unit {suffix:?} in duration {s:?} (expected h/m/s/ms)");
            };
            total += *unit * value;
            rest = &rest[unit_len..];
        }
        Ok(Self(total))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return write!(f, "0s");
        }
        let mut left = self.0;
        for (name, unit) in UNITS {
            let n = left.as_nanos() / unit.as_nanos();
            if n > 0 {
                write!(f, "{n}{name}")?;
                left -= unit * n as u32;
            }
        }
        Ok(())
    }
}

impl Serialize for HumanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// UtcOffset
// ---------------------------------------------------------------------------

/// A fixed UTC offset parsed from `"+HH:MM"` / `"-HH:MM"` (or `"Z"`).
///
/// Used as the local wall clock for hour/day weighting and display dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// Offset east of UTC, in seconds.
    pub fn as_seconds(&self) -> i32 {
        self.0
    }
}

impl FromStr for UtcOffset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self(0));
        }

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => anyhow::bail!("utc offset must start with '+' or '-', got {s:?}"),
        };
        let (hh, mm) = rest
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("utc offset must look like ±HH:MM, got {s:?}"))?;
        let hours: i32 = hh
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid hours in utc offset: {s:?}"))?;
        let minutes: i32 = mm
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid minutes in utc offset: {s:?}"))?;
        if hh.len() != 2 || mm.len() != 2 || hours > 14 || minutes > 59 {
            anyhow::bail!("utc offset out of range: {s:?}");
        }

        Ok(Self(sign * (hours * 3600 + minutes * 60)))
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }
}

impl Serialize for UtcOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UtcOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
