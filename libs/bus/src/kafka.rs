//! Kafka-backed transport.
//!
//! Push delivery from the broker is adapted to the pull-style [`Bus`]
//! contract: a background task per topic appends incoming messages to an
//! in-process ordered buffer, and `read_new` polls that buffer up to a fixed
//! timeout before returning whatever is present.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colearn_events::EventEnvelope;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::{sleep, Instant};
use tracing::warn;

use crate::bus::{Bus, ReadBatch};
use crate::config::KafkaConfig;
use crate::error::BusError;
use crate::topic::{Topic, TopicCursor};

/// How long one `read_new` waits for the buffer to grow past the caller's
/// offset before returning what it has.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);
const POLL_STEP: Duration = Duration::from_millis(50);

type TopicBuffer = Arc<Mutex<Vec<EventEnvelope>>>;

/// Broker-backed bus.
///
/// One producer is created lazily on first publish and reused for the life
/// of the process. Each topic gets a dedicated subscription whose
/// consumer-group identity is freshly generated at process start, so a
/// restarted process replays from the earliest retained message; no offset
/// is ever committed back to the broker.
pub struct KafkaBus {
    config: KafkaConfig,
    group_suffix: String,
    producer: OnceCell<FutureProducer>,
    buffers: Mutex<HashMap<Topic, TopicBuffer>>,
}

impl KafkaBus {
    pub fn new(config: KafkaConfig) -> Self {
        let group_suffix = format!("{}-{}", std::process::id(), rand::random::<u32>() % 1_000_000);
        Self {
            config,
            group_suffix,
            producer: OnceCell::new(),
            buffers: Mutex::new(HashMap::new()),
        }
    }

    fn group_id(&self, topic: Topic) -> String {
        format!("colearn-read-{}-{}", topic.wire_name(), self.group_suffix)
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.config.brokers.join(","))
            .set("client.id", &self.config.client_id);
        config
    }

    /// Returns the shared producer, creating it on first use. Concurrent
    /// first-callers coalesce into a single create attempt.
    async fn producer(&self) -> Result<&FutureProducer, BusError> {
        self.producer
            .get_or_try_init(|| async {
                let producer: FutureProducer = self
                    .client_config()
                    // Single-replica ack: latency over replication guarantee.
                    .set("acks", "1")
                    .set("message.timeout.ms", "5000")
                    .create()?;
                Ok(producer)
            })
            .await
    }

    /// Returns the buffer for `topic`, subscribing on first use.
    async fn ensure_subscription(&self, topic: Topic) -> Result<TopicBuffer, BusError> {
        let mut buffers = self.buffers.lock().await;
        if let Some(buffer) = buffers.get(&topic) {
            return Ok(Arc::clone(buffer));
        }

        let consumer: StreamConsumer = self
            .client_config()
            .set("group.id", self.group_id(topic))
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "false")
            .create()?;
        consumer.subscribe(&[topic.wire_name()])?;

        let buffer: TopicBuffer = Arc::new(Mutex::new(Vec::new()));
        let task_buffer = Arc::clone(&buffer);
        tokio::spawn(async move {
            loop {
                match consumer.recv().await {
                    Ok(message) => {
                        let body = match message.payload_view::<str>() {
                            Some(Ok(body)) if !body.is_empty() => body,
                            _ => continue,
                        };
                        match serde_json::from_str::<EventEnvelope>(body) {
                            Ok(event) => task_buffer.lock().await.push(event),
                            Err(err) => {
                                warn!(topic = %topic, error = %err, "dropping malformed message");
                            }
                        }
                    }
                    Err(err) => {
                        warn!(topic = %topic, error = %err, "consumer receive failed");
                        sleep(POLL_STEP).await;
                    }
                }
            }
        });

        buffers.insert(topic, Arc::clone(&buffer));
        Ok(buffer)
    }
}

#[async_trait]
impl Bus for KafkaBus {
    async fn publish(&self, topic: Topic, event: &EventEnvelope) -> Result<(), BusError> {
        let producer = self.producer().await?;
        let body = serde_json::to_string(event)?;

        let record = FutureRecord::<(), _>::to(topic.wire_name()).payload(&body);
        producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(err, _)| BusError::Broker(err))?;
        Ok(())
    }

    async fn read_new(&self, topic: Topic, cursor: TopicCursor) -> Result<ReadBatch, BusError> {
        let buffer = self.ensure_subscription(topic).await?;

        let deadline = Instant::now() + POLL_TIMEOUT;
        loop {
            if buffer.lock().await.len() > cursor.offset || Instant::now() >= deadline {
                break;
            }
            sleep(POLL_STEP).await;
        }

        let buffer = buffer.lock().await;
        let start = cursor.offset.min(buffer.len());
        Ok(ReadBatch {
            events: buffer[start..].to_vec(),
            cursor: TopicCursor {
                offset: buffer.len(),
            },
        })
    }
}
