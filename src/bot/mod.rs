/// Command and dialogue message handlers
pub mod handlers;
/// Reply delivery helpers
pub mod messaging;
/// Per-chat dialogue state
pub mod state;
