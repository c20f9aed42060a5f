// src/content.rs
//
// Default window content resolution.
// Given a channel, picks the builder for its capability category and awaits
// the built content descriptor. The builders themselves (message preloading,
// call setup) live outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::channels::{classify, Channel, ChannelCategory};

/// Descriptor for the content a new window should mount.
/// Built by the content builders and threaded back to the window-hosting
/// shell unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum WindowContent {
    /// Message view with recent history preloaded for first paint.
    Chat {
        channel_id: String,
        /// Ids of the messages loaded for first paint, oldest first.
        recent_message_ids: Vec<String>,
    },
    /// Call view for a voice channel.
    Call {
        channel_id: String,
        /// Join with the microphone muted.
        start_muted: bool,
    },
}

/// Builds the default message view for a chat-capable channel.
///
/// Building may do asynchronous work (loading recent messages). Returning
/// `None` means the view could not be built; the resolver passes that
/// through unchanged and the shell falls back to placeholder content.
/// Cancelling the returned future follows the implementor's contract; the
/// resolver holds nothing that needs cleanup.
#[async_trait]
pub trait ChatContentBuilder: Send + Sync {
    async fn build(&self, channel: &Channel) -> Option<WindowContent>;
}

/// Builds the default call view for a voice-capable channel.
#[async_trait]
pub trait CallContentBuilder: Send + Sync {
    async fn build(&self, channel: &Channel) -> Option<WindowContent>;
}

/// Dispatches a channel to its default popout content.
pub struct ContentResolver {
    chat: Arc<dyn ChatContentBuilder>,
    call: Arc<dyn CallContentBuilder>,
}

impl ContentResolver {
    pub fn new(chat: Arc<dyn ChatContentBuilder>, call: Arc<dyn CallContentBuilder>) -> Self {
        Self { chat, call }
    }

    /// Default content for `channel`, or `None` when its kind has no default
    /// view. Absence is not an error: the shell opens the window with
    /// placeholder content.
    ///
    /// Chat-capable kinds resolve through the chat builder, voice-capable
    /// kinds through the call builder. The classification in
    /// `channels::classify` is single-valued, which is what keeps the two
    /// sets disjoint and chat precedence explicit.
    pub async fn resolve_default_content(&self, channel: &Channel) -> Option<WindowContent> {
        match classify(channel.kind) {
            Some(ChannelCategory::Chat) => self.chat.build(channel).await,
            Some(ChannelCategory::Voice) => self.call.build(channel).await,
            None => None,
        }
    }
}
