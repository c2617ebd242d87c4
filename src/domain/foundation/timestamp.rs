//! UTC instants used for item creation times and code expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Signed: negative when `other` is later.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    pub fn plus_secs(&self, secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self(self.0 + Duration::seconds(secs))
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valentines() -> Timestamp {
        Timestamp::from(Utc.with_ymd_and_hms(2026, 2, 14, 19, 30, 0).unwrap())
    }

    #[test]
    fn plus_secs_moves_forward() {
        let start = valentines();
        let later = start.plus_secs(300);

        assert!(start.is_before(&later));
        assert_eq!(later.duration_since(&start).num_seconds(), 300);
        assert_eq!(start.duration_since(&later).num_seconds(), -300);
    }

    #[test]
    fn equal_instants_are_not_before_each_other() {
        assert!(!valentines().is_before(&valentines()));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let json = serde_json::to_string(&valentines()).unwrap();

        assert_eq!(json, "\"2026-02-14T19:30:00Z\"");
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), valentines());
    }
}
