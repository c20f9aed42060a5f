// src/channels.rs
//
// Channel taxonomy and capability classification.
// Channels are owned by the domain model; this module only reads their kind
// to decide which default view a window should mount.

use serde::{Deserialize, Serialize};

/// Closed set of channel kinds the client understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Plain text channel.
    Text,
    /// Read-mostly text channel for server announcements.
    Announcement,
    /// Threaded post channel.
    Forum,
    /// Voice channel.
    Voice,
    /// Moderated voice channel with a speaker/audience split.
    Stage,
    /// Grouping node in the sidebar, holds no content itself.
    Category,
    /// Server directory listing.
    Directory,
}

/// Behavioural category a channel kind resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelCategory {
    /// Text-first kinds that open a message view.
    Chat,
    /// Audio-first kinds that open a call view.
    Voice,
}

/// Total classification of `ChannelKind` into a capability category.
///
/// Every kind maps to at most one category, so the chat/voice sets cannot
/// overlap. Should a kind ever grow both surfaces, it must be classified
/// `Chat` here: chat content wins as the default view.
pub fn classify(kind: ChannelKind) -> Option<ChannelCategory> {
    match kind {
        ChannelKind::Text | ChannelKind::Announcement | ChannelKind::Forum => {
            Some(ChannelCategory::Chat)
        }
        ChannelKind::Voice | ChannelKind::Stage => Some(ChannelCategory::Voice),
        ChannelKind::Category | ChannelKind::Directory => None,
    }
}

/// A channel as referenced by this crate. The resolver reads `kind` and
/// never mutates the channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
}
