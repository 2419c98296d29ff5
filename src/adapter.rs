//! The dual-style promise adapter
//!
//! `PromiseFactory::invoke` takes one operation in both calling conventions,
//! runs the one the environment supports, and hands back a single future.
//! Callback-style failures arrive out of band through the error channel and
//! are turned into `Err` from inside the completion, in the same turn the
//! host fires it.

use crate::environment::{Environment, LiveHandle};
use crate::error::{AdapterError, HostError};
use crate::host::{qualified_name, CallbackFn, Completion, ErrorChannel, PromiseFn};
use crate::models::{Args, Style, Values};
use crate::namespaces::{Cookies, Notifications};
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::rc::Rc;

/// A call in flight. Settles exactly once.
pub type Pending<T> = LocalBoxFuture<'static, Result<T, AdapterError>>;

/// One logical operation in both conventions.
#[derive(Clone)]
pub struct OperationBinding {
    pub operation: String,
    pub callback: Option<CallbackFn>,
    pub promise: Option<PromiseFn>,
}

impl OperationBinding {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            callback: None,
            promise: None,
        }
    }

    pub fn with_callback(mut self, handle: CallbackFn) -> Self {
        self.callback = Some(handle);
        self
    }

    pub fn with_promise(mut self, handle: PromiseFn) -> Self {
        self.promise = Some(handle);
        self
    }
}

impl std::fmt::Debug for OperationBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationBinding")
            .field("operation", &self.operation)
            .field("callback", &self.callback.is_some())
            .field("promise", &self.promise.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PromiseFactory {
    environment: Environment,
}

impl PromiseFactory {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn style(&self) -> Style {
        self.environment.style()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn cookies(&self) -> Cookies<'_> {
        Cookies::new(self)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    /// Binding for `namespace.operation` as the live host provides it.
    pub fn binding(&self, namespace: &str, operation: &str) -> OperationBinding {
        let binding = OperationBinding::new(qualified_name(namespace, operation));
        match self.environment.lookup(namespace, operation) {
            Some(LiveHandle::Callback(handle)) => binding.with_callback(handle),
            Some(LiveHandle::Promise(handle)) => binding.with_promise(handle),
            None => binding,
        }
    }

    /// Look up `namespace.operation` and invoke it.
    pub fn call(&self, namespace: &str, operation: &str, args: Args) -> Pending<Values> {
        let binding = self.binding(namespace, operation);
        self.invoke(&binding, args)
    }

    /// Run exactly one of the binding's handles, chosen by the live style.
    ///
    /// The handle is called before this returns. `args` are forwarded as
    /// given, including trailing `None`s. The resolved `Values` are whatever
    /// the host completed with; their count depends on the operation.
    pub fn invoke(&self, binding: &OperationBinding, args: Args) -> Pending<Values> {
        let style = self.style();
        log::trace!("invoking {} ({}-style)", binding.operation, style);

        match style {
            Style::Promise => match &binding.promise {
                Some(handle) => invoke_promise(handle, args),
                None => unsupported(binding, style),
            },
            Style::Callback => match (&binding.callback, self.environment.error_channel()) {
                (Some(handle), Some(errors)) => {
                    invoke_callback(&binding.operation, handle, errors, args)
                }
                _ => unsupported(binding, style),
            },
        }
    }
}

fn invoke_promise(handle: &PromiseFn, args: Args) -> Pending<Values> {
    match handle(args) {
        Ok(pending) => pending.map(|result| result.map_err(AdapterError::Rejected)).boxed_local(),
        Err(thrown) => future::ready(Err(AdapterError::Threw(thrown))).boxed_local(),
    }
}

fn invoke_callback(
    operation: &str,
    handle: &CallbackFn,
    errors: Rc<dyn ErrorChannel>,
    args: Args,
) -> Pending<Values> {
    let (tx, mut rx) = oneshot::channel();

    // Runs inside the host's callback; the slot belongs to this call only now.
    // A set slot wins over anything the glue reports.
    let completion = Completion::new(move |received: Result<Values, HostError>| {
        let outcome = match (errors.take_last_error(), received) {
            (Some(error), _) => Err(AdapterError::LastError(error)),
            (None, Ok(values)) => Ok(values),
            (None, Err(error)) => Err(AdapterError::Convert(error)),
        };
        let _ = tx.send(outcome);
    });

    if let Err(thrown) = handle(args, completion) {
        // A throw after the completion already fired does not replace its outcome.
        let outcome = match rx.try_recv() {
            Ok(Some(outcome)) => outcome,
            _ => Err(AdapterError::Threw(thrown)),
        };
        return future::ready(outcome).boxed_local();
    }

    let operation = operation.to_string();
    async move {
        match rx.await {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Err(AdapterError::Abandoned { operation }),
        }
    }
    .boxed_local()
}

fn unsupported(binding: &OperationBinding, style: Style) -> Pending<Values> {
    future::ready(Err(AdapterError::Unsupported {
        operation: binding.operation.clone(),
        style,
    }))
    .boxed_local()
}
