// Copyright (c) 2025 - Cowboy AI, Inc.
//! Command Context
//!
//! Every command carries who issued it, when, and under which correlation.
//!
//! # Time Handling
//!
//! The timestamp is supplied by the caller.
//! **NEVER call `Utc::now()` in domain logic**.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AddressInfo, MarkingInfo, NamingInfo};
use crate::events::EventHeader;

/// Actor issuing a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_name: String,

    /// Route node the user is editing, if the client scopes edits to one node
    pub editing_route_node_id: Option<Uuid>,
}

impl UserContext {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            editing_route_node_id: None,
        }
    }
}

/// Correlation, actor and time of one command execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    pub user: UserContext,

    /// Timestamp when command was issued (explicit time parameter)
    pub timestamp: DateTime<Utc>,
}

impl CommandContext {
    pub fn new(correlation_id: Uuid, user: UserContext, timestamp: DateTime<Utc>) -> Self {
        Self {
            correlation_id,
            user,
            timestamp,
        }
    }

    /// Header for an event on the given aggregate
    pub fn header(&self, aggregate_id: Uuid) -> EventHeader {
        EventHeader::new(
            aggregate_id,
            self.timestamp,
            self.correlation_id,
            Some(self.user.user_name.clone()),
        )
    }
}

/// Descriptive properties given when span equipment is created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanEquipmentProperties {
    pub naming_info: Option<NamingInfo>,
    pub marking_info: Option<MarkingInfo>,
    pub address_info: Option<AddressInfo>,
    pub manufacturer_id: Option<Uuid>,
}
