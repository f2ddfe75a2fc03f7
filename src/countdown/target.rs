use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// Used when no target is configured or the configured one can't be read.
/// Interpreted in local time.
pub const DEFAULT_TARGET: &str = "2026-01-30T16:05:00";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TargetSource {
    Configured,
    /// `NOW+...` shorthand, evaluated once at resolution time.
    Relative,
    Default,
}

/// The instant the countdown runs to. Fixed for the whole session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTarget {
    pub instant: DateTime<Utc>,
    pub source: TargetSource,
}

impl CountdownTarget {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            source: TargetSource::Configured,
        }
    }

    /// Resolves a configured target. Never fails: anything unreadable falls
    /// back to [`DEFAULT_TARGET`] with a warning.
    pub fn resolve(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::fallback();
        };

        let resolved = match parse_relative(raw) {
            Some(offset) => now
                .checked_add_signed(offset)
                .map(|instant| Self {
                    instant,
                    source: TargetSource::Relative,
                })
                .ok_or_else(|| anyhow!("offset out of range")),
            None => parse_absolute(raw).map(Self::at),
        };

        match resolved {
            Ok(target) => target,
            Err(err) => {
                warn!("countdown: invalid target {raw:?} ({err}), falling back to default");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            instant: default_instant(),
            source: TargetSource::Default,
        }
    }
}

pub fn default_instant() -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(DEFAULT_TARGET, NAIVE_FORMATS[0])
        .map(local_to_utc)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn parse_absolute(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(local_to_utc(naive));
        }
    }

    // Date-only targets are UTC midnight, unlike the date-time forms above.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("no midnight on {date}"))?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    bail!("not an RFC 3339 or local date-time")
}

/// `NOW+2MIN`, `NOW+30SEC`, `NOW+1H`, case-insensitive. An amount too large
/// for a duration is a malformed offset and reads as the default target.
fn parse_relative(raw: &str) -> Option<ChronoDuration> {
    let upper = raw.to_ascii_uppercase();
    let rest = upper.strip_prefix("NOW+")?;
    let split = rest.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = rest.split_at(split);
    let amount: i64 = amount.parse().ok()?;

    match unit {
        "S" | "SEC" | "SECS" => ChronoDuration::try_seconds(amount),
        "M" | "MIN" | "MINS" => ChronoDuration::try_minutes(amount),
        "H" | "HOUR" | "HOURS" => ChronoDuration::try_hours(amount),
        _ => None,
    }
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    // Skipped local times (DST gaps) are read as UTC rather than rejected.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
