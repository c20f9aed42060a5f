// src/handoff.rs
//
// Cross-window state handoff for popout windows.
// When a tab detaches into its own native window, the originating window
// publishes the tab's state here under a one-time token and embeds the token
// in the new window's startup arguments. The new window's init routine takes
// the state back out exactly once. Publisher and consumer are scheduled
// independently and share nothing but this store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// Types
// ============================================================================

/// One-time key for a published transfer record.
///
/// 128 bits of randomness rendered as 32 lowercase hex characters, so it is
/// safe to embed in a window label or a startup URL. Tokens are never reused
/// and carry no meaning beyond uniqueness.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferToken(String);

impl TransferToken {
    fn generate() -> Self {
        TransferToken(Uuid::new_v4().simple().to_string())
    }

    /// Reconstruct a token received through a window's startup arguments.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        TransferToken(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tab state carried from the originating window to the popout.
///
/// The store never inspects this; only the view layer that published it
/// reads it back. `layout` holds whatever panel/split state the view layer
/// serialises, unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Channel the detached tab was showing.
    pub channel_id: String,
    /// Opaque tab layout state as produced by the view layer.
    pub layout: serde_json::Value,
    /// Message the viewport was anchored on, if any.
    #[serde(default)]
    pub scroll_anchor: Option<String>,
    /// Unsent composer draft carried across.
    #[serde(default)]
    pub draft: Option<String>,
}

// ============================================================================
// Handoff store
// ============================================================================

/// Registry of in-flight window handoffs.
///
/// Constructed once during app setup and shared (via `Arc` or the shell's
/// managed state) between the command that initiates a detach and the init
/// routine of the window being spawned. Records whose consumer never
/// materialises stay until process exit; that leak is accepted since a
/// record is small and an abandoned popout is rare.
pub struct HandoffStore {
    records: Mutex<HashMap<TransferToken, TransferRecord>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Register a record and return the fresh token that retrieves it.
    ///
    /// Cannot fail: the token is generated wide enough that a collision with
    /// a live entry indicates a broken entropy source, not a runtime
    /// condition worth handling.
    pub fn publish(&self, record: TransferRecord) -> TransferToken {
        let token = TransferToken::generate();
        let mut records = self.records.lock().unwrap();
        debug_assert!(
            !records.contains_key(&token),
            "transfer token collision: entropy source failure"
        );
        records.insert(token.clone(), record);
        tlog!(
            "[Handoff] Published record '{}' ({} in flight)",
            token,
            records.len()
        );
        token
    }

    /// Atomically remove and return the record for `token`.
    ///
    /// The first call for a token wins; any later call with the same token,
    /// or a call with a token that was never published, gets `None`. Absence
    /// means "nothing to restore" and the caller opens the window with
    /// placeholder content instead.
    pub fn try_take(&self, token: &TransferToken) -> Option<TransferRecord> {
        let mut records = self.records.lock().unwrap();
        let record = records.remove(token);
        match record {
            Some(record) => {
                tlog!(
                    "[Handoff] Claimed record '{}' ({} in flight)",
                    token,
                    records.len()
                );
                Some(record)
            }
            None => None,
        }
    }

    /// Number of published records not yet claimed.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl Default for HandoffStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn record_for(channel_id: &str) -> TransferRecord {
        TransferRecord {
            channel_id: channel_id.to_string(),
            layout: serde_json::json!({ "split": 0.7, "pinned": false }),
            scroll_anchor: Some("msg_1042".to_string()),
            draft: None,
        }
    }

    #[test]
    fn test_take_is_exactly_once() {
        let store = HandoffStore::new();
        let record = record_for("ch_general");
        let token = store.publish(record.clone());

        assert_eq!(store.try_take(&token), Some(record));
        assert_eq!(store.try_take(&token), None);
        assert_eq!(store.try_take(&token), None);
    }

    #[test]
    fn test_unknown_token_is_absent() {
        let store = HandoffStore::new();
        let never_published = TransferToken::from_raw("deadbeefdeadbeefdeadbeefdeadbeef");
        assert_eq!(store.try_take(&never_published), None);
    }

    #[test]
    fn test_token_is_32_lowercase_hex_chars() {
        let store = HandoffStore::new();
        let token = store.publish(record_for("ch_general"));
        assert_eq!(token.as_str().len(), 32);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_consecutive_tokens_are_distinct() {
        let store = HandoffStore::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = store.publish(record_for("ch_general"));
            assert!(seen.insert(token), "duplicate token issued");
        }
        assert_eq!(store.len(), 10_000);
    }

    #[test]
    fn test_unclaimed_records_accumulate() {
        let store = HandoffStore::new();
        assert!(store.is_empty());
        let token = store.publish(record_for("ch_general"));
        store.publish(record_for("ch_random"));
        assert_eq!(store.len(), 2);
        assert!(store.try_take(&token).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_publish_take_no_cross_contamination() {
        let store = Arc::new(HandoffStore::new());
        let threads: Vec<_> = (0..100)
            .map(|thread_no| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for iteration in 0..1_000 {
                        let channel_id = format!("ch_{}_{}", thread_no, iteration);
                        let record = TransferRecord {
                            channel_id: channel_id.clone(),
                            layout: serde_json::Value::Null,
                            scroll_anchor: None,
                            draft: None,
                        };
                        let token = store.publish(record);
                        let taken = store
                            .try_take(&token)
                            .expect("own record missing after publish");
                        assert_eq!(taken.channel_id, channel_id);
                        assert_eq!(store.try_take(&token), None);
                    }
                })
            })
            .collect();

        for handle in threads {
            handle.join().unwrap();
        }
        assert!(store.is_empty());
    }
}
