//! Broker Topology: AMQP exchange/queue/binding declarations and
//! typed publish/consume helpers (spec.md §6, SPEC_FULL.md §5.3).

mod consumer;
mod publisher;
mod topology;

pub use consumer::{Consumer, Delivery};
pub use lapin::Connection;
pub use publisher::Publisher;
pub use topology::{declare_topology, Topic};

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("failed to dial broker at {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: lapin::Error,
    },
    #[error("failed to open channel: {0}")]
    Channel(#[source] lapin::Error),
    #[error("failed to declare topology for {topic}: {source}")]
    Topology {
        topic: &'static str,
        #[source]
        source: lapin::Error,
    },
    #[error("failed to publish to {topic}: {source}")]
    Publish {
        topic: &'static str,
        #[source]
        source: lapin::Error,
    },
    #[error("failed to start consuming {topic}: {source}")]
    Consume {
        topic: &'static str,
        #[source]
        source: lapin::Error,
    },
    #[error("failed to receive delivery: {0}")]
    Deliver(#[source] lapin::Error),
    #[error("failed to ack/nack delivery: {0}")]
    Ack(#[source] lapin::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Connects and opens one channel, per spec.md §4.3's "one channel
/// per worker" rule (channels are not thread-safe).
pub async fn connect(url: &str) -> Result<(Connection, lapin::Channel), BrokerError> {
    let connection = Connection::connect(url, lapin::ConnectionProperties::default())
        .await
        .map_err(|source| BrokerError::Dial { url: url.to_string(), source })?;
    let channel = connection.create_channel().await.map_err(BrokerError::Channel)?;
    Ok((connection, channel))
}
