//! `notifications` namespace

use crate::adapter::{Pending, PromiseFactory};
use crate::models::{NotificationMap, NotificationOptions};
use crate::utils::{decoded, decoded_or_default};
use serde_json::Value;

const NAMESPACE: &str = "notifications";

pub struct Notifications<'a> {
    factory: &'a PromiseFactory,
}

impl<'a> Notifications<'a> {
    pub fn new(factory: &'a PromiseFactory) -> Self {
        Self { factory }
    }

    /// Create and show a notification. Without `notification_id` the host
    /// generates one. Resolves with the id of the created notification.
    pub fn create(
        &self,
        notification_id: Option<&str>,
        options: NotificationOptions,
    ) -> Pending<Option<String>> {
        let args = vec![
            notification_id.map(Value::from),
            Some(Value::Object(options)),
        ];
        decoded("notifications.create", self.factory.call(NAMESPACE, "create", args))
    }

    /// Resolves with `wasUpdated`.
    pub fn update(&self, notification_id: &str, options: NotificationOptions) -> Pending<bool> {
        let args = vec![
            Some(Value::from(notification_id)),
            Some(Value::Object(options)),
        ];
        decoded_or_default("notifications.update", self.factory.call(NAMESPACE, "update", args))
    }

    /// Resolves with `wasCleared`: whether the notification existed.
    pub fn clear(&self, notification_id: &str) -> Pending<bool> {
        let args = vec![Some(Value::from(notification_id))];
        decoded_or_default("notifications.clear", self.factory.call(NAMESPACE, "clear", args))
    }

    /// Ids of every notification this extension currently shows.
    pub fn get_all(&self) -> Pending<NotificationMap> {
        let pending = self.factory.call(NAMESPACE, "getAll", Vec::new());
        decoded_or_default("notifications.getAll", pending)
    }
}
