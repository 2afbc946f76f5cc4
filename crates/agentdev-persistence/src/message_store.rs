//! Message store, partitioned by channel.

use std::path::PathBuf;

use agentdev_models::{ChannelId, Message};
use tracing::warn;

use crate::atomic::{atomic_write_json, json_files, read_json, record_file_name};
use crate::error::{PersistenceError, Result};

/// Manages persistence of chat messages.
///
/// Messages are stored as individual JSON files organized by channel:
/// ```text
/// base_path/
/// └── messages/
///     └── {channel_id}/
///         ├── msg-abc123.json
///         └── msg-def456.json
/// ```
pub struct MessageStore {
    base_path: PathBuf,
}

impl MessageStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn channel_dir(&self, channel_id: &ChannelId) -> Result<PathBuf> {
        // reuse the record-name check so a channel ID cannot leave `messages/`
        record_file_name(channel_id.as_str())?;
        Ok(self.base_path.join("messages").join(channel_id.as_str()))
    }

    /// Stores a message in its channel.
    pub fn append(&self, message: &Message) -> Result<()> {
        let dir = self.channel_dir(&message.channel_id)?;
        let path = dir.join(record_file_name(message.message_id.as_str())?);
        atomic_write_json(&path, message)
    }

    /// All messages of a channel, oldest first (timestamp, then id).
    pub fn list_channel(&self, channel_id: &ChannelId) -> Result<Vec<Message>> {
        let dir = match self.channel_dir(channel_id) {
            Ok(dir) => dir,
            Err(PersistenceError::InvalidData(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut messages = Vec::new();
        for path in json_files(&dir)? {
            match read_json::<Message>(&path) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable message");
                }
            }
        }

        messages.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.message_id.cmp(&b.message_id))
        });
        Ok(messages)
    }

    /// Deletes all messages of a channel.
    pub fn delete_channel(&self, channel_id: &ChannelId) -> Result<()> {
        let dir = match self.channel_dir(channel_id) {
            Ok(dir) => dir,
            Err(PersistenceError::InvalidData(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Write { path: dir, source }),
        }
    }
}
