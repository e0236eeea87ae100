// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only conversation log.

use pytutor_core::{ChatMessage, Role};
use tokio::sync::watch;

/// Ordered chat history for one session.
///
/// Messages can only be appended; insertion order is display order. Each
/// append publishes the new message count on a watch channel so observers
/// can re-render.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    changes: watch::Sender<usize>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            messages: Vec::new(),
            changes,
        }
    }

    /// Appends a message and notifies subscribers.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, text));
        // No receivers is fine: send_replace stores the value regardless.
        self.changes.send_replace(self.messages.len());
        &self.messages[self.messages.len() - 1]
    }

    /// Every message in append order.
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended at or after `index`.
    pub fn since(&self, index: usize) -> &[ChatMessage] {
        self.messages.get(index..).unwrap_or_default()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Receiver that observes the message count after every append.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.changes.subscribe()
    }
}
