//! Call shapes shared by both API styles

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional call arguments.
///
/// `None` stands for an omitted optional parameter (JS `undefined`). It is
/// forwarded in place, so `[a, b, None]` reaches the host with arity three.
pub type Args = Vec<Option<Value>>;

/// The ordered values an operation completed with. Void operations complete
/// with an empty vector.
pub type Values = Vec<Value>;

/// Calling convention of a host namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// `chrome.*`: trailing completion callback, failures in `runtime.lastError`
    Callback,
    /// `browser.*`: the call returns a promise
    Promise,
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Callback => write!(f, "callback"),
            Style::Promise => write!(f, "promise"),
        }
    }
}
