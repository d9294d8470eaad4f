use chrono::Duration;

/// Compact human form of an elapsed time: `1h 2m 3s`, `2m 3s`, `3s` or `0s`. Everything below a
/// second is truncated and negative values count as zero.
pub fn format_duration(v: Duration) -> String {
    let v = v.max(Duration::zero());
    if v.num_hours() > 0 {
        format!(
            "{}h {}m {}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m {}s", v.num_minutes(), v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds())
    }
}

/// Serializes a [Duration] as whole nanoseconds, the unit list files store elapsed time in.
pub mod nanoseconds {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Only overflows past ~292 years.
        serializer.serialize_i64(duration.num_nanoseconds().unwrap_or(i64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = i64::deserialize(deserializer)?;
        Ok(Duration::nanoseconds(s))
    }
}
