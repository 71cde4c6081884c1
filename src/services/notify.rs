// src/services/notify.rs

//! Notification delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Notification, NtfyConfig};

/// Trait for notification transports.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// JSON publish payload understood by ntfy.
#[derive(Debug, Serialize)]
struct NtfyMessage<'a> {
    topic: &'a str,
    title: &'a str,
    message: &'a str,
    priority: u8,
}

/// Publishes to an ntfy server.
///
/// Without a topic every send is a logged no-op.
pub struct NtfyNotifier {
    client: Client,
    server: String,
    topic: Option<String>,
}

impl NtfyNotifier {
    pub fn new(client: Client, server: impl Into<String>, topic: Option<String>) -> Self {
        Self {
            client,
            server: server.into(),
            topic,
        }
    }

    /// Build from configuration, resolving the topic from the environment.
    pub fn from_config(client: Client, config: &NtfyConfig) -> Self {
        let topic = config.resolve_topic();
        if topic.is_none() {
            log::warn!(
                "No ntfy topic configured (set {}); notifications will only be logged",
                config.topic_env
            );
        }
        Self::new(client, &config.server, topic)
    }

    pub fn is_enabled(&self) -> bool {
        self.topic.is_some()
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let Some(topic) = self.topic.as_deref() else {
            log::info!(
                "Skipping notification (no topic): {}: {}",
                notification.title,
                notification.body
            );
            return Ok(());
        };

        let payload = NtfyMessage {
            topic,
            title: &notification.title,
            message: &notification.body,
            priority: notification.priority.ntfy_level(),
        };

        let response = self.client.post(&self.server).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(format!(
                "ntfy answered {}: {}",
                status,
                body.trim()
            )));
        }

        log::info!(
            "Notification sent [{}]: {}",
            notification.priority,
            notification.title
        );
        Ok(())
    }
}

/// Logs notifications instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        log::info!(
            "[dry-run] [{}] {}: {}",
            notification.priority,
            notification.title,
            notification.body.replace('\n', " | ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[tokio::test]
    async fn test_disabled_notifier_is_noop() {
        let notifier = NtfyNotifier::new(Client::new(), "http://127.0.0.1:9", None);
        assert!(!notifier.is_enabled());

        let n = Notification::new("Title", "Body", Priority::High);
        assert!(notifier.send(&n).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        let n = Notification::new("Title", "line 1\nline 2", Priority::Default);
        assert!(LogNotifier.send(&n).await.is_ok());
    }

    #[test]
    fn test_ntfy_payload_shape() {
        let payload = NtfyMessage {
            topic: "drops",
            title: "Lenovo Drop",
            message: "body",
            priority: Priority::Urgent.ntfy_level(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["topic"], "drops");
        assert_eq!(value["priority"], 5);
    }
}
