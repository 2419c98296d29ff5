//! Convenience functions per WebExtension namespace
//!
//! Each function only assembles arguments and decodes the result; dispatch is
//! left to [`PromiseFactory`](crate::PromiseFactory).

pub mod cookies;
pub mod notifications;

pub use cookies::Cookies;
pub use notifications::Notifications;
