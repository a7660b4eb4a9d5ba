use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// The instant membership status is evaluated against.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an instant the way the member service and the
/// edit forms write them:
///
///  - RFC 3339 with offset (`2024-01-01T10:00:00.000Z`)
///  - a naive date time, taken as UTC (`2024-01-01T10:00:00`)
///  - a plain date, taken as midnight UTC (`2024-01-01`)
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format an instant for the wire: RFC 3339, UTC, millisecond precision.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render an instant for an edit form. Midnight instants
/// become plain dates, everything else keeps its full time.
pub fn to_draft_text(instant: &DateTime<Utc>) -> String {
    let is_midnight = instant.num_seconds_from_midnight() == 0 && instant.nanosecond() == 0;
    if is_midnight {
        instant.date_naive().format("%Y-%m-%d").to_string()
    } else {
        instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// Serde adapter for instants on the wire.
pub mod instant {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_instant(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_instant(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid instant: {:?}", text)))
    }
}
