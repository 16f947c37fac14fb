//! One-shot flash messages stored in the session.

use tower_sessions::Session;

const FLASH_KEY: &str = "flash";

pub async fn set_flash(session: &Session, message: &str) {
    if let Err(err) = session.insert(FLASH_KEY, message.to_string()).await {
        tracing::warn!("failed to store flash message: {err}");
    }
}

/// Read and clear the pending flash message, if any.
pub async fn take_flash(session: &Session) -> Option<String> {
    match session.remove::<String>(FLASH_KEY).await {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!("failed to read flash message: {err}");
            None
        }
    }
}
