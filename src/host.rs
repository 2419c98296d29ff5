//! Host-side seams: operation handles, namespace lookup and the error channel

use crate::error::HostError;
use crate::models::{Args, Values};
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Completion callback handed to a callback-style handle.
///
/// The host calls [`complete`](Completion::complete) with the values its own
/// callback received. [`fail`](Completion::fail) is for glue that could not
/// turn those values into [`Values`] at all.
pub struct Completion {
    settle: Box<dyn FnOnce(Result<Values, HostError>)>,
}

impl Completion {
    pub fn new<F>(settle: F) -> Self
    where
        F: FnOnce(Result<Values, HostError>) + 'static,
    {
        Self {
            settle: Box::new(settle),
        }
    }

    pub fn complete(self, values: Values) {
        (self.settle)(Ok(values))
    }

    pub fn fail(self, error: HostError) {
        (self.settle)(Err(error))
    }
}

/// `chrome.<ns>.<op>(...args, completion)`. An `Err` return is a synchronous throw.
pub type CallbackFn = Rc<dyn Fn(Args, Completion) -> Result<(), HostError>>;

/// Future returned by a promise-style handle.
pub type HostFuture = LocalBoxFuture<'static, Result<Values, HostError>>;

/// `browser.<ns>.<op>(...args)`. An `Err` return is a synchronous throw.
pub type PromiseFn = Rc<dyn Fn(Args) -> Result<HostFuture, HostError>>;

pub fn callback_fn<F>(f: F) -> CallbackFn
where
    F: Fn(Args, Completion) -> Result<(), HostError> + 'static,
{
    Rc::new(f)
}

pub fn promise_fn<F>(f: F) -> PromiseFn
where
    F: Fn(Args) -> Result<HostFuture, HostError> + 'static,
{
    Rc::new(f)
}

/// A callback-style host namespace tree (`chrome`).
pub trait CallbackApi {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<CallbackFn>;
}

/// A promise-style host namespace tree (`browser`).
pub trait PromiseApi {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<PromiseFn>;
}

/// The host's out-of-band failure slot.
///
/// `take_last_error` reads and clears in one step. It must only be called from
/// inside the completion of the call the error belongs to.
pub trait ErrorChannel {
    fn take_last_error(&self) -> Option<HostError>;
}

/// Shared in-process last-error slot.
///
/// Clones share the same slot. A host sets it right before firing a
/// completion and the adapter takes it from inside that completion.
#[derive(Debug, Clone, Default)]
pub struct LastErrorSlot {
    slot: Rc<RefCell<Option<HostError>>>,
}

impl LastErrorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, error: HostError) {
        *self.slot.borrow_mut() = Some(error);
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl ErrorChannel for LastErrorSlot {
    fn take_last_error(&self) -> Option<HostError> {
        self.slot.borrow_mut().take()
    }
}

/// In-process namespace table keyed by `"namespace.operation"`.
pub struct ApiTable<H> {
    handles: HashMap<String, H>,
}

impl<H> Default for ApiTable<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: Clone> ApiTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, namespace: &str, operation: &str, handle: H) {
        self.handles.insert(qualified_name(namespace, operation), handle);
    }

    pub fn with(mut self, namespace: &str, operation: &str, handle: H) -> Self {
        self.register(namespace, operation, handle);
        self
    }

    pub fn get(&self, namespace: &str, operation: &str) -> Option<H> {
        self.handles.get(&qualified_name(namespace, operation)).cloned()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl CallbackApi for ApiTable<CallbackFn> {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<CallbackFn> {
        self.get(namespace, operation)
    }
}

impl PromiseApi for ApiTable<PromiseFn> {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<PromiseFn> {
        self.get(namespace, operation)
    }
}

pub fn qualified_name(namespace: &str, operation: &str) -> String {
    format!("{}.{}", namespace, operation)
}
