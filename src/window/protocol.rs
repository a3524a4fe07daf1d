//! Wire protocol between the indicator and its settings dialog process
//!
//! One JSON object per line. The dialog writes [`DialogMessage`]s to its
//! stdout and reads [`HostMessage`]s from its stdin.

use serde::{Deserialize, Serialize};

/// Sent by the dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogMessage {
    /// Spin control changed
    IconSize { value: i64 },
    /// Help button pressed
    Help,
    /// Dialog closed by the user
    Close,
}

/// Sent to the dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Raise and focus the window
    Present,
}

/// Encode a message as one protocol line, newline included
pub fn encode_line<T: Serialize>(message: &T) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode one protocol line
pub fn decode_line<'a, T: Deserialize<'a>>(line: &'a str) -> serde_json::Result<T> {
    serde_json::from_str(line.trim_end())
}
