//! Notification shapes

use serde_json::{Map, Value};

/// `NotificationOptions`, forwarded to the host as-is.
pub type NotificationOptions = Map<String, Value>;

/// Result of `notifications.getAll`: every live notification id mapped to a
/// host-defined value (`true` in both browsers today).
pub type NotificationMap = Map<String, Value>;
