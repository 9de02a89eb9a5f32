pub mod completions;
pub mod habits;
pub mod health;
pub mod stats;
pub mod view;
pub mod ws;

use crate::AppState;

/// Pushes a change event to the WebSocket feed. Best-effort: a feed with
/// no subscribers is not an error.
pub(crate) fn broadcast(state: &AppState, event: serde_json::Value) {
    if let Some(tx) = state.ws_tx.as_ref() {
        let _ = tx.send(event.to_string());
    }
}
