//! Promise-style access to WebExtension APIs
//!
//! Chrome's `chrome.*` namespaces take a trailing callback and report
//! failures through `chrome.runtime.lastError`; Firefox's `browser.*`
//! namespaces return promises. [`PromiseFactory`] hides the difference: it is
//! built once for whichever style the browser provides and every call through
//! it returns a future that resolves with the result or fails with an
//! [`AdapterError`].
//!
//! ```ignore
//! let environment = webext_promise::wasm::detect_environment(&AdapterOptions::default())?;
//! let factory = PromiseFactory::new(environment);
//! let cookie = factory.cookies().get("https://x.test", "session", None).await?;
//! ```

pub mod adapter;
pub mod environment;
pub mod error;
pub mod host;
pub mod models;
pub mod namespaces;
pub mod utils;
pub mod wasm;

pub use adapter::{OperationBinding, Pending, PromiseFactory};
pub use environment::{AdapterOptions, Environment};
pub use error::{AdapterError, HostError};
pub use host::{
    callback_fn, promise_fn, ApiTable, CallbackApi, CallbackFn, Completion, ErrorChannel,
    LastErrorSlot, PromiseApi, PromiseFn,
};
pub use models::{Args, Style, Values};
pub use namespaces::{Cookies, Notifications};
