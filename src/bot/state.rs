use serde::{Deserialize, Serialize};

/// Represents the current state of one chat dialogue.
///
/// At most one state is active per chat at any time. The confirmation
/// states carry exactly the payload their handler needs, so a confirmation
/// without pending data is unrepresentable.
#[derive(Clone, Serialize, Deserialize, Default, Debug, PartialEq, Eq)]
pub enum State {
    /// Initial and terminal state, commands are accepted
    #[default]
    Idle,
    /// Waiting for free text to extract email addresses from
    AwaitingEmailText,
    /// Waiting for free text to extract phone numbers from
    AwaitingPhoneText,
    /// Waiting for a password to rate
    AwaitingPasswordText,
    /// Waiting for a yes/no reply; carries the raw text the emails were
    /// found in, re-extracted on confirmation
    AwaitingEmailConfirm(String),
    /// Waiting for a yes/no reply; carries the phone numbers found
    AwaitingPhoneConfirm(Vec<String>),
}
