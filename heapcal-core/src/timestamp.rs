//! Lenient ISO-8601 timestamps.
//!
//! Input accepts RFC 3339 plus the shorter ISO-8601 forms clients tend to send:
//! no seconds (`2024-01-01T09:00Z`), no offset (treated as UTC), or a bare date
//! (UTC midnight). Output is always RFC 3339 in UTC with millisecond precision,
//! e.g. `2024-01-01T09:00:00.000Z`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{HeapcalError, HeapcalResult};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parse a timestamp in any of the accepted forms.
pub fn parse(input: &str) -> HeapcalResult<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(naive) = s.strip_suffix(['Z', 'z']) {
        return parse_naive(naive)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| HeapcalError::InvalidTimestamp(input.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_naive(s) {
        return Ok(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(HeapcalError::InvalidTimestamp(input.to_string()))
}

/// Render a timestamp the way it is stored and served.
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time truncated to milliseconds, strictly after `previous`.
///
/// Stored timestamps only keep millisecond precision, so two stamps taken in the
/// same millisecond would otherwise serialize identically.
pub fn stamp_after(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(3);
    match previous {
        Some(prev) if prev >= now => prev.trunc_subsecs(3) + Duration::milliseconds(1),
        _ => now,
    }
}

pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same codec for optional timestamps; `null` and absent both map to `None`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Patch codec: absent is `None`, explicit `null` is `Some(None)`.
///
/// Use with `#[serde(default, deserialize_with = "timestamp::nullable")]`.
pub fn nullable<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error> {
    option::deserialize(deserializer).map(Some)
}
