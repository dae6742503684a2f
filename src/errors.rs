// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for infrastructure operations
//!
//! These are the failures of the plumbing around the domain: event storage,
//! serialization and messaging. Business rule violations live next to the
//! aggregates that enforce them.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in infrastructure operations
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// NATS subscribe error
    #[error("NATS subscribe error: {0}")]
    NatsSubscribe(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Optimistic concurrency check failed on append
    #[error("Concurrency conflict on aggregate {aggregate_id}: expected version {expected}, actual {actual}")]
    ConcurrencyConflict {
        aggregate_id: Uuid,
        expected: u64,
        actual: u64,
    },

    /// An appended event names a different aggregate than its stream
    #[error("Event {event_id} belongs to aggregate {event_aggregate_id}, not stream {stream_id}")]
    StreamMismatch {
        event_id: Uuid,
        event_aggregate_id: Uuid,
        stream_id: Uuid,
    },
}

/// Result type for infrastructure operations
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_conflict_display() {
        let id = Uuid::nil();
        let err = InfrastructureError::ConcurrencyConflict {
            aggregate_id: id,
            expected: 3,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected version 3"));
        assert!(msg.contains("actual 4"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: InfrastructureError = parse.unwrap_err().into();
        assert!(matches!(err, InfrastructureError::Serialization(_)));
    }
}
