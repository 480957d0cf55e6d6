//! Flash messages.
//!
//! A flash is queued in the session by one request and shown by the next
//! page that renders. Taking the queue removes it.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Severity of a flash message. Doubles as the CSS modifier class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    /// Lowercase name used in templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A queued one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Queue a flash message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queue = session
        .get::<Vec<FlashMessage>>(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    queue.push(FlashMessage {
        level,
        message: message.into(),
    });
    session.insert(session_keys::FLASH, queue).await
}

/// Take all queued flash messages, oldest first.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn take(session: &Session) -> Result<Vec<FlashMessage>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_returns_messages_in_order_and_clears() {
        let session = session();
        push(&session, FlashLevel::Success, "Added to cart.").await.unwrap();
        push(&session, FlashLevel::Error, "Oops").await.unwrap();

        let messages = take(&session).await.unwrap();
        assert_eq!(
            messages,
            vec![
                FlashMessage {
                    level: FlashLevel::Success,
                    message: "Added to cart.".to_string(),
                },
                FlashMessage {
                    level: FlashLevel::Error,
                    message: "Oops".to_string(),
                },
            ]
        );

        assert!(take(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_take_on_fresh_session_is_empty() {
        assert!(take(&session()).await.unwrap().is_empty());
    }

    #[test]
    fn test_level_names() {
        assert_eq!(FlashLevel::Success.as_str(), "success");
        assert_eq!(FlashLevel::Info.as_str(), "info");
        assert_eq!(FlashLevel::Error.as_str(), "error");
    }
}
