// src/windows.rs
//
// Popout window plumbing: labels, startup URLs, and per-kind window sizing.
// Actual window creation lives in the platform shell; this module only
// produces the data the shell needs to spawn a popout and the consuming
// window needs to find its handoff record.

use serde::Serialize;

use crate::channels::{classify, Channel, ChannelCategory};
use crate::handoff::TransferToken;

/// Query parameter carrying the transfer token in a popout's startup URL.
pub const HANDOFF_PARAM: &str = "handoff";

/// Window sizing defaults for a window kind.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WindowMetrics {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
}

/// Sizing defaults for a popout hosting the given channel's content.
/// Chat popouts get a tall message column; call popouts a compact tile grid.
pub fn popout_metrics(channel: &Channel) -> WindowMetrics {
    match classify(channel.kind) {
        Some(ChannelCategory::Chat) => WindowMetrics {
            width: 520.0,
            height: 720.0,
            min_width: 380.0,
            min_height: 480.0,
        },
        Some(ChannelCategory::Voice) => WindowMetrics {
            width: 460.0,
            height: 360.0,
            min_width: 320.0,
            min_height: 240.0,
        },
        None => WindowMetrics {
            width: 520.0,
            height: 600.0,
            min_width: 380.0,
            min_height: 400.0,
        },
    }
}

/// Everything the shell needs to spawn one popout window.
#[derive(Clone, Debug, Serialize)]
pub struct PopoutLaunch {
    /// Unique window label, derived from the transfer token so the shell can
    /// correlate a window with its handoff.
    pub label: String,
    /// App-relative startup URL with the token embedded.
    pub url: String,
    pub title: String,
    pub metrics: WindowMetrics,
}

/// Build the launch description for a popout hosting `channel`'s content,
/// with `token` pointing at the published transfer record.
pub fn popout_launch(channel: &Channel, token: &TransferToken) -> PopoutLaunch {
    let launch = PopoutLaunch {
        label: format!("popout-{}", token.as_str()),
        url: format!("/popout?{}={}", HANDOFF_PARAM, token.as_str()),
        title: channel.name.clone(),
        metrics: popout_metrics(channel),
    };
    tlog!(
        "[Windows] Prepared popout '{}' for channel '{}'",
        launch.label,
        channel.id
    );
    launch
}

/// Recover the transfer token from a popout's startup URL.
///
/// Returns `None` when the URL carries no token or a mangled one; the
/// consuming window then skips state restore entirely. Only a well-formed
/// 32-char lowercase hex value is accepted.
pub fn token_from_startup_url(url: &str) -> Option<TransferToken> {
    let query = url.split_once('?')?.1;
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix(HANDOFF_PARAM)?.strip_prefix('='))?;

    let well_formed = raw.len() == 32
        && raw
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
    if !well_formed {
        return None;
    }
    Some(TransferToken::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelKind;
    use crate::handoff::{HandoffStore, TransferRecord};

    fn channel(kind: ChannelKind) -> Channel {
        Channel {
            id: "ch_1".to_string(),
            name: "general".to_string(),
            kind,
        }
    }

    fn publish_one(store: &HandoffStore) -> TransferToken {
        store.publish(TransferRecord {
            channel_id: "ch_1".to_string(),
            layout: serde_json::Value::Null,
            scroll_anchor: None,
            draft: None,
        })
    }

    #[test]
    fn test_startup_url_round_trips_token() {
        let store = HandoffStore::new();
        let token = publish_one(&store);
        let launch = popout_launch(&channel(ChannelKind::Text), &token);

        assert_eq!(token_from_startup_url(&launch.url), Some(token));
    }

    #[test]
    fn test_label_embeds_token() {
        let store = HandoffStore::new();
        let token = publish_one(&store);
        let launch = popout_launch(&channel(ChannelKind::Voice), &token);

        assert_eq!(launch.label, format!("popout-{}", token.as_str()));
        assert_eq!(launch.title, "general");
    }

    #[test]
    fn test_mangled_startup_urls_yield_no_token() {
        assert_eq!(token_from_startup_url("/popout"), None);
        assert_eq!(token_from_startup_url("/popout?handoff="), None);
        assert_eq!(token_from_startup_url("/popout?handoff=zzzz"), None);
        // Uppercase hex is not a token this client ever issued
        assert_eq!(
            token_from_startup_url("/popout?handoff=DEADBEEFDEADBEEFDEADBEEFDEADBEEF"),
            None
        );
        assert_eq!(token_from_startup_url("/popout?other=abc"), None);
    }

    #[test]
    fn test_token_survives_extra_query_params() {
        let store = HandoffStore::new();
        let token = publish_one(&store);
        let url = format!("/popout?theme=dark&{}={}&focus=1", HANDOFF_PARAM, token);

        assert_eq!(token_from_startup_url(&url), Some(token));
    }

    #[test]
    fn test_chat_and_call_popouts_size_differently() {
        let chat = popout_metrics(&channel(ChannelKind::Text));
        let call = popout_metrics(&channel(ChannelKind::Stage));
        assert!(chat.height > call.height);
    }
}
