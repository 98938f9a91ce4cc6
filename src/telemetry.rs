//! Metric names shared by the storage engine and the client.

pub(crate) const COMMAND_DURATION_SECONDS: &str = "kvdouble_command_duration_seconds";
pub(crate) const KEYS_TOTAL: &str = "kvdouble_keys_total";
pub(crate) const EXPIRED_KEYS_TOTAL: &str = "kvdouble_expired_keys_total";

/// Registers descriptions for the metrics this crate emits with the installed
/// `metrics` recorder. Without a recorder this does nothing.
pub fn describe_metrics() {
    metrics::describe_histogram!(COMMAND_DURATION_SECONDS, "Command processing latency in seconds");
    metrics::describe_gauge!(KEYS_TOTAL, "Number of keys in the selected database");
    metrics::describe_counter!(EXPIRED_KEYS_TOTAL, "Number of keys removed by lazy expiry");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_prefixed() {
        for name in [COMMAND_DURATION_SECONDS, KEYS_TOTAL, EXPIRED_KEYS_TOTAL] {
            assert!(name.starts_with("kvdouble_"), "{name}");
        }
    }

    #[test]
    fn describe_metrics_without_recorder_is_harmless() {
        describe_metrics();
    }
}
