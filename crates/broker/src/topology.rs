//! Broker topology (spec.md §6): eight message types, each with its
//! own `direct`, non-durable exchange bound to one queue via one
//! routing key. Grounded on
//! `original_source/producer/pkg/rabbitmq/types.go`'s
//! `ExchangeName`/`RoutingKey`/`QueueType` string-enum triad and
//! `original_source/core/pkg/rabbitmq/consumer.go::MakeNewQueueAndExchange`.
//!
//! spec.md §6's prose says "nine exchanges" but its own table lists
//! eight rows; the table is authoritative here (see DESIGN.md).

use lapin::options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, ExchangeKind};

use crate::BrokerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Block,
    Transaction,
    TransactionLog,
    Withdrawal,
    Reward,
    TokenEvent,
    InternalTransaction,
    TransactionAction,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Block,
        Topic::Transaction,
        Topic::TransactionLog,
        Topic::Withdrawal,
        Topic::Reward,
        Topic::TokenEvent,
        Topic::InternalTransaction,
        Topic::TransactionAction,
    ];

    pub fn exchange(self) -> &'static str {
        match self {
            Topic::Block => "block_exchange",
            Topic::Transaction => "transaction_exchange",
            Topic::TransactionLog => "transaction_log_exchange",
            Topic::Withdrawal => "withdrawal_exchange",
            Topic::Reward => "reward_exchange",
            Topic::TokenEvent => "token_event_exchange",
            Topic::InternalTransaction => "internal_transaction_exchange",
            Topic::TransactionAction => "transaction_action_exchange",
        }
    }

    pub fn routing_key(self) -> &'static str {
        match self {
            Topic::Block => "block_routing_key",
            Topic::Transaction => "transaction_routing_key",
            Topic::TransactionLog => "transaction_log_routing_key",
            Topic::Withdrawal => "withdrawal_routing_key",
            Topic::Reward => "reward_routing_key",
            Topic::TokenEvent => "token_event_routing_key",
            Topic::InternalTransaction => "internal_transaction_routing_key",
            Topic::TransactionAction => "transaction_action_routing_key",
        }
    }

    pub fn queue(self) -> &'static str {
        match self {
            Topic::Block => "block",
            Topic::Transaction => "transaction",
            Topic::TransactionLog => "transaction_log",
            Topic::Withdrawal => "withdrawal",
            Topic::Reward => "reward",
            Topic::TokenEvent => "token_event",
            Topic::InternalTransaction => "internal_transaction",
            Topic::TransactionAction => "transaction_action",
        }
    }
}

/// Declares one topic's exchange, queue, and binding. Idempotent:
/// `declare`/`bind` on an already-existing topology is a no-op.
pub async fn declare_topology(channel: &Channel, topic: Topic) -> Result<(), BrokerError> {
    channel
        .exchange_declare(
            topic.exchange(),
            ExchangeKind::Direct,
            ExchangeDeclareOptions { durable: false, auto_delete: false, ..Default::default() },
            FieldTable::default(),
        )
        .await
        .map_err(|source| BrokerError::Topology { topic: topic.exchange(), source })?;

    channel
        .queue_declare(
            topic.queue(),
            QueueDeclareOptions { durable: false, auto_delete: false, ..Default::default() },
            FieldTable::default(),
        )
        .await
        .map_err(|source| BrokerError::Topology { topic: topic.queue(), source })?;

    channel
        .queue_bind(
            topic.queue(),
            topic.exchange(),
            topic.routing_key(),
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(|source| BrokerError::Topology { topic: topic.queue(), source })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topic_has_a_distinct_triple() {
        let mut seen = std::collections::HashSet::new();
        for topic in Topic::ALL {
            assert!(seen.insert((topic.exchange(), topic.routing_key(), topic.queue())));
        }
    }

    #[test]
    fn queue_names_match_spec_table() {
        assert_eq!(Topic::TokenEvent.queue(), "token_event");
        assert_eq!(Topic::TokenEvent.exchange(), "token_event_exchange");
        assert_eq!(Topic::TokenEvent.routing_key(), "token_event_routing_key");
    }
}
