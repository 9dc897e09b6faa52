//! Per-queue consumption with manual ack/nack+requeue (spec.md §4.5
//! "Every processor has the same skeleton: pull delivery → JSON-decode
//! → run processor-specific logic → on success ack, on failure
//! nack(requeue=true)"). Grounded on
//! `original_source/core/pkg/rabbitmq/consumer.go::Consume`.

use futures::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions};
use lapin::types::FieldTable;
use lapin::Channel;
use serde::de::DeserializeOwned;

use crate::topology::Topic;
use crate::BrokerError;

pub struct Consumer {
    inner: lapin::Consumer,
}

impl Consumer {
    pub async fn new(channel: &Channel, topic: Topic, consumer_tag: &str) -> Result<Self, BrokerError> {
        let inner = channel
            .basic_consume(
                topic.queue(),
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|source| BrokerError::Consume { topic: topic.queue(), source })?;

        Ok(Self { inner })
    }

    /// Waits for the next delivery. `None` means the channel closed.
    pub async fn recv(&mut self) -> Option<Result<Delivery, BrokerError>> {
        self.inner
            .next()
            .await
            .map(|result| result.map(Delivery).map_err(BrokerError::Deliver))
    }
}

pub struct Delivery(lapin::message::Delivery);

impl Delivery {
    pub fn payload(&self) -> &[u8] {
        &self.0.data
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BrokerError> {
        serde_json::from_slice(&self.0.data).map_err(BrokerError::Decode)
    }

    pub async fn ack(self) -> Result<(), BrokerError> {
        self.0.ack(BasicAckOptions::default()).await.map_err(BrokerError::Ack)
    }

    /// `nack(requeue=true)`; infinite by design, no DLQ in scope
    /// (spec.md §4.5).
    pub async fn nack_requeue(self) -> Result<(), BrokerError> {
        self.0
            .nack(BasicNackOptions { requeue: true, ..Default::default() })
            .await
            .map_err(BrokerError::Ack)
    }
}
