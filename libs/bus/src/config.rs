//! Broker connection parameters.

/// Broker address used when nothing is configured.
pub const DEFAULT_BROKER: &str = "127.0.0.1:9092";

const CLIENT_ID: &str = "colearn";

/// Resolved Kafka connection parameters.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Bootstrap broker addresses.
    pub brokers: Vec<String>,
    /// Client identity reported to the broker.
    pub client_id: String,
}

impl KafkaConfig {
    /// Resolves brokers from `COLEARN_BROKERS` (comma-separated), falling
    /// back to the local default.
    pub fn from_env() -> Self {
        let brokers = std::env::var("COLEARN_BROKERS")
            .ok()
            .map(|raw| parse_brokers(&raw))
            .filter(|brokers| !brokers.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_BROKER.to_string()]);

        Self {
            brokers,
            client_id: CLIENT_ID.to_string(),
        }
    }
}

fn parse_brokers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|broker| !broker.is_empty())
        .map(String::from)
        .collect()
}
