//! Environment capability: which calling convention is live
//!
//! The probe runs once, when the adapter is built. Call sites never branch on
//! host presence themselves.

use crate::error::AdapterError;
use crate::host::{CallbackApi, CallbackFn, ErrorChannel, PromiseApi, PromiseFn};
use crate::models::Style;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterOptions {
    /// Style to use when both hosts are present. Ignored when that style is
    /// missing.
    pub preferred_style: Option<Style>,
}

impl AdapterOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone)]
enum Capability {
    Callback {
        api: Rc<dyn CallbackApi>,
        errors: Rc<dyn ErrorChannel>,
    },
    Promise {
        api: Rc<dyn PromiseApi>,
    },
}

/// A handle for one operation under the live style.
#[derive(Clone)]
pub enum LiveHandle {
    Callback(CallbackFn),
    Promise(PromiseFn),
}

#[derive(Clone)]
pub struct Environment {
    capability: Capability,
}

impl Environment {
    pub fn callback(api: Rc<dyn CallbackApi>, errors: Rc<dyn ErrorChannel>) -> Self {
        Self {
            capability: Capability::Callback { api, errors },
        }
    }

    pub fn promise(api: Rc<dyn PromiseApi>) -> Self {
        Self {
            capability: Capability::Promise { api },
        }
    }

    /// Pick the live style from whatever hosts exist.
    ///
    /// The promise style wins unless `options.preferred_style` asks for the
    /// callback style and it is available.
    pub fn probe(
        promise: Option<Rc<dyn PromiseApi>>,
        callback: Option<(Rc<dyn CallbackApi>, Rc<dyn ErrorChannel>)>,
        options: &AdapterOptions,
    ) -> Result<Self, AdapterError> {
        let environment = match (promise, callback, options.preferred_style) {
            (_, Some((api, errors)), Some(Style::Callback)) => Self::callback(api, errors),
            (Some(api), _, _) => Self::promise(api),
            (None, Some((api, errors)), _) => Self::callback(api, errors),
            (None, None, _) => return Err(AdapterError::NoHost),
        };

        log::debug!("detected {}-style extension host", environment.style());
        Ok(environment)
    }

    pub fn style(&self) -> Style {
        match self.capability {
            Capability::Callback { .. } => Style::Callback,
            Capability::Promise { .. } => Style::Promise,
        }
    }

    /// Handle for `namespace.operation` in the live host, if it has one.
    pub fn lookup(&self, namespace: &str, operation: &str) -> Option<LiveHandle> {
        match &self.capability {
            Capability::Callback { api, .. } => {
                api.lookup(namespace, operation).map(LiveHandle::Callback)
            }
            Capability::Promise { api } => {
                api.lookup(namespace, operation).map(LiveHandle::Promise)
            }
        }
    }

    /// Error channel of the callback-style host.
    pub fn error_channel(&self) -> Option<Rc<dyn ErrorChannel>> {
        match &self.capability {
            Capability::Callback { errors, .. } => Some(Rc::clone(errors)),
            Capability::Promise { .. } => None,
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("style", &self.style())
            .finish()
    }
}
