// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Message Channel Trait
//!
//! Platform-agnostic abstraction over the cross-origin message channel
//! between the app and its parent frame. Inbound messages are pushed into
//! the handshake client by the host platform; this trait covers the
//! outbound side.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::message::OutboundMessage;

/// Errors raised while posting to the parent frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("No parent frame to post to")]
    NoParent,

    #[error("Post failed: {0}")]
    PostFailed(String),
}

/// Outbound side of the parent-frame message channel.
pub trait MessageChannel: Send {
    /// Posts a message to the parent frame, delivered only if the parent's
    /// origin equals `target_origin`. Implementations must never broadcast.
    fn post(&mut self, target_origin: &str, message: &OutboundMessage) -> Result<(), ChannelError>;

    /// Returns false when the page runs top-level with no parent frame.
    fn is_embedded(&self) -> bool {
        true
    }
}

/// A recorded post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub target_origin: String,
    pub message: OutboundMessage,
}

/// Channel that records posts instead of delivering them.
///
/// Clones share the same log, so a test can keep a handle after moving the
/// channel into a client.
#[derive(Debug, Clone)]
pub struct MockChannel {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    embedded: bool,
    fail_posts: bool,
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChannel {
    /// Creates an embedded channel.
    pub fn new() -> Self {
        MockChannel {
            sent: Arc::new(Mutex::new(Vec::new())),
            embedded: true,
            fail_posts: false,
        }
    }

    /// Creates a channel for a page with no parent frame.
    pub fn top_level() -> Self {
        MockChannel {
            embedded: false,
            ..Self::new()
        }
    }

    /// Creates a channel whose posts always fail.
    pub fn failing() -> Self {
        MockChannel {
            fail_posts: true,
            ..Self::new()
        }
    }

    /// Returns every recorded post.
    pub fn sent(&self) -> Vec<SentMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }

    /// Returns the number of recorded posts.
    pub fn sent_count(&self) -> usize {
        self.sent().len()
    }
}

impl MessageChannel for MockChannel {
    fn post(&mut self, target_origin: &str, message: &OutboundMessage) -> Result<(), ChannelError> {
        if !self.embedded {
            return Err(ChannelError::NoParent);
        }
        let record = SentMessage {
            target_origin: target_origin.to_string(),
            message: *message,
        };
        match self.sent.lock() {
            Ok(mut sent) => sent.push(record),
            Err(poison) => poison.into_inner().push(record),
        }
        if self.fail_posts {
            return Err(ChannelError::PostFailed("simulated failure".into()));
        }
        Ok(())
    }

    fn is_embedded(&self) -> bool {
        self.embedded
    }
}
