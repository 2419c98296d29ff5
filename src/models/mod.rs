//! Data models shared by the adapter and the namespaces

pub mod call;
pub mod cookie;
pub mod notification;

pub use call::*;
pub use cookie::*;
pub use notification::*;

/// Caller-supplied options object merged into a parameter object.
pub type Options = serde_json::Map<String, serde_json::Value>;
