//! Bounded, newest-first event log shown to the player.

use std::collections::VecDeque;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// How many lines are kept
pub const LOG_CAPACITY: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: VecDeque<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a line, dropping the oldest beyond capacity
    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push_front(Message { text: text.into() });
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&Message> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|m| m.text.clone()).collect()
    }
}
