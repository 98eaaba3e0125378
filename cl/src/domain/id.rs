//! Instance ID generation
//!
//! IDs use the format: `{source-id}-{unix-millis}`
//! Example: `morning-1792389600000`

use chrono::{DateTime, TimeZone};

/// Generate an instance ID from its source (template or chore definition) and creation time
pub fn instance_id<Tz: TimeZone>(source_id: &str, created_at: &DateTime<Tz>) -> String {
    format!("{}-{}", source_id, created_at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_instance_id_format() {
        let ts = Utc.timestamp_millis_opt(1_792_389_600_123).single().unwrap();
        assert_eq!(instance_id("morning", &ts), "morning-1792389600123");
        assert_eq!(instance_id("brush-teeth-morning", &ts), "brush-teeth-morning-1792389600123");
    }

    #[test]
    fn test_instance_ids_differ_across_creations() {
        let first = Utc.timestamp_millis_opt(1_000).single().unwrap();
        let second = Utc.timestamp_millis_opt(86_401_000).single().unwrap();
        assert_ne!(instance_id("morning", &first), instance_id("morning", &second));
    }
}
