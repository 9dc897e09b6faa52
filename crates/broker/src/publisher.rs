//! Typed message publishing (spec.md §4.2 "Output"), grounded on
//! `original_source/block-producer/pkg/rabbitmq/block_publisher.go`'s
//! `PublishMessage` (marshal to JSON, publish non-persistent).

use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel};
use serde::Serialize;

use crate::topology::Topic;
use crate::BrokerError;

pub struct Publisher {
    channel: Channel,
}

impl Publisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Publishes `message` to `topic`'s exchange with
    /// `content-type: application/json`, non-persistent delivery mode
    /// (spec.md §6).
    pub async fn publish<T: Serialize>(&self, topic: Topic, message: &T) -> Result<(), BrokerError> {
        let body = serde_json::to_vec(message).map_err(BrokerError::Encode)?;
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(1); // non-persistent

        self.channel
            .basic_publish(
                topic.exchange(),
                topic.routing_key(),
                BasicPublishOptions::default(),
                &body,
                properties,
            )
            .await
            .map_err(|source| BrokerError::Publish { topic: topic.exchange(), source })?
            .await
            .map_err(|source| BrokerError::Publish { topic: topic.exchange(), source })?;

        Ok(())
    }
}
