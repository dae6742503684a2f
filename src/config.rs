// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service configuration
//!
//! Plain structs with sensible defaults, optionally overridden from the
//! environment at process start.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{InfrastructureError, InfrastructureResult};

/// Configuration for NATS connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cim-utility-network".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Top-level configuration of the utility network service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilityNetworkConfig {
    /// Messaging used for outbound change notifications
    pub nats: NatsConfig,

    /// Root of the subject hierarchy notifications are published under
    pub notification_subject_prefix: String,

    /// Name stamped on every outbound notification
    pub application_name: String,
}

impl Default for UtilityNetworkConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig::default(),
            notification_subject_prefix: crate::subjects::UTILITY_NETWORK_ROOT.to_string(),
            application_name: "UtilityNetworkService".to_string(),
        }
    }
}

impl UtilityNetworkConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// - `NATS_URL` (comma separated list allowed)
    /// - `NATS_CLIENT_NAME`
    /// - `UTILITY_NETWORK_SUBJECT_PREFIX`
    /// - `UTILITY_NETWORK_APPLICATION_NAME`
    pub fn from_env() -> InfrastructureResult<Self> {
        let mut config = Self::default();

        if let Ok(urls) = std::env::var("NATS_URL") {
            let servers: Vec<String> = urls
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            if servers.is_empty() {
                return Err(InfrastructureError::Configuration(
                    "NATS_URL is set but contains no server".to_string(),
                ));
            }
            config.nats.servers = servers;
        }

        if let Ok(name) = std::env::var("NATS_CLIENT_NAME") {
            config.nats.name = name;
        }

        if let Ok(prefix) = std::env::var("UTILITY_NETWORK_SUBJECT_PREFIX") {
            config.notification_subject_prefix = prefix;
        }

        if let Ok(name) = std::env::var("UTILITY_NETWORK_APPLICATION_NAME") {
            config.application_name = name;
        }

        Ok(config)
    }

    /// Override the NATS servers
    pub fn with_servers(mut self, servers: Vec<String>) -> Self {
        self.nats.servers = servers;
        self
    }
}
