//! Layered configuration.
//!
//! Loaded with increasing priority:
//! 1. Compiled-in defaults (the `default_*` functions below)
//! 2. TOML file, if a path is given
//! 3. Environment overrides, prefix `RELAY_`, nested with `__`
//!    (e.g. `RELAY_NOTIFICATIONS__RETENTION=50`)

use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

fn default_mailbox_capacity() -> usize {
    32
}

/// Longest message body, in characters.
fn default_max_body_len() -> usize {
    2_000
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    200
}

fn default_history_limit() -> usize {
    100
}

fn default_max_history_limit() -> usize {
    1_000
}

/// Notifications kept per user before the oldest are evicted.
fn default_retention() -> usize {
    100
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayConfig {
    /// Mailbox size of every actor.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    #[serde(default)]
    pub conversations: ConversationConfig,
    #[serde(default)]
    pub locations: LocationConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_max_body_len")]
    pub max_body_len: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_retention")]
    pub retention: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
            conversations: ConversationConfig::default(),
            locations: LocationConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_body_len: default_max_body_len(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            max_history_limit: default_max_history_limit(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
        }
    }
}

impl RelayConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: RelayConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mailbox_capacity == 0 {
            bail!("mailbox_capacity must be at least 1");
        }
        if self.conversations.max_body_len == 0 {
            bail!("conversations.max_body_len must be at least 1");
        }
        if self.conversations.page_size == 0
            || self.conversations.page_size > self.conversations.max_page_size
        {
            bail!("conversations.page_size must be between 1 and max_page_size");
        }
        if self.locations.history_limit == 0
            || self.locations.history_limit > self.locations.max_history_limit
        {
            bail!("locations.history_limit must be between 1 and max_history_limit");
        }
        if self.notifications.retention == 0 {
            bail!("notifications.retention must be at least 1");
        }
        Ok(())
    }
}
