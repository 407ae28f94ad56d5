//! Keyboard input for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::KeyEventType;

use super::core::PageSession;

impl PageSession {
    /// Windows virtual key code for the keys the engine sends.
    pub(super) fn key_code(key: &str) -> Option<i64> {
        match key {
            "Escape" => Some(27),
            "Enter" => Some(13),
            "Tab" => Some(9),
            "ArrowDown" => Some(40),
            "ArrowUp" => Some(38),
            _ => None,
        }
    }

    /// Press and release a named key on the focused element.
    pub async fn press_key(&self, key: &str) -> Result<(), CdpError> {
        let code = Self::key_code(key)
            .ok_or_else(|| CdpError::InvalidResponse(format!("Unsupported key: {}", key)))?;

        for event_type in [KeyEventType::RawKeyDown, KeyEventType::KeyUp] {
            self.call(
                "Input.dispatchKeyEvent",
                Some(json!({
                    "type": event_type,
                    "key": key,
                    "code": key,
                    "windowsVirtualKeyCode": code,
                    "nativeVirtualKeyCode": code,
                })),
            )
            .await?;
        }

        debug!("Pressed key: {}", key);
        Ok(())
    }
}
