// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for utility network notifications
//!
//! Change notifications are routed by their category tag:
//!
//! ```text
//! {root}.notifications.{category group}.{operation}
//! ```
//!
//! The category `EquipmentConnectivityModification.Cut` becomes the
//! tokens `equipment_connectivity_modification.cut`. This allows for:
//! - Precise subscriptions (`utility_network.notifications.equipment_connectivity_modification.cut`)
//! - Group wildcards (`utility_network.notifications.equipment_modification.>`)
//! - Global subscriptions (`utility_network.notifications.>`)
//!
//! # Examples
//!
//! ```rust
//! use cim_utility_network::subjects::SubjectBuilder;
//!
//! let subject = SubjectBuilder::new()
//!     .category("EquipmentConnectivityModification.Cut")
//!     .build();
//! assert_eq!(
//!     subject,
//!     "utility_network.notifications.equipment_connectivity_modification.cut"
//! );
//!
//! let wildcard = SubjectBuilder::new().root("fiber").build_wildcard();
//! assert_eq!(wildcard, "fiber.notifications.>");
//! ```

/// Default root namespace for all utility network subjects
pub const UTILITY_NETWORK_ROOT: &str = "utility_network";

/// Token between the root and the category tokens
pub const NOTIFICATIONS_TOKEN: &str = "notifications";

/// Builder for notification subjects
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    root: String,
    category: Option<String>,
}

impl SubjectBuilder {
    pub fn new() -> Self {
        Self {
            root: UTILITY_NETWORK_ROOT.to_string(),
            category: None,
        }
    }

    /// Replace the root namespace (the configured subject prefix)
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the notification category
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category_tokens(category));
        self
    }

    /// Build the subject; without a category this is the notifications root
    pub fn build(self) -> String {
        match self.category {
            Some(tokens) if !tokens.is_empty() => {
                format!("{}.{}.{}", self.root, NOTIFICATIONS_TOKEN, tokens)
            }
            _ => format!("{}.{}", self.root, NOTIFICATIONS_TOKEN),
        }
    }

    /// Subscription for every notification below the category, or all of them
    pub fn build_wildcard(self) -> String {
        format!("{}.>", self.build())
    }
}

impl Default for SubjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Subject tokens for a category tag
///
/// Each dot separated part is converted from CamelCase to snake_case;
/// characters NATS treats specially are dropped.
pub fn category_tokens(category: &str) -> String {
    category
        .split('.')
        .map(snake_case)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn snake_case(part: &str) -> String {
    let mut token = String::with_capacity(part.len() + 4);
    let mut previous_lower = false;

    for c in part.chars() {
        if c.is_ascii_uppercase() {
            if previous_lower {
                token.push('_');
            }
            token.push(c.to_ascii_lowercase());
            previous_lower = false;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            token.push(c);
            previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    token
}

/// Convenience functions for common subject patterns
pub mod subjects {
    use super::*;

    pub fn notification(root: &str, category: &str) -> String {
        SubjectBuilder::new().root(root).category(category).build()
    }

    pub fn all_notifications(root: &str) -> String {
        SubjectBuilder::new().root(root).build_wildcard()
    }
}
