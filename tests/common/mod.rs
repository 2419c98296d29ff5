//! Stub hosts shared by the integration tests

#![allow(dead_code)]

use futures::future;
use futures::FutureExt;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use webext_promise::{
    callback_fn, promise_fn, ApiTable, Args, CallbackFn, Completion, Environment, HostError,
    LastErrorSlot, PromiseFactory, PromiseFn, Style, Values,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub style: Style,
    pub args: Args,
}

/// Records every handle invocation in order.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Recorded>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, style: Style) -> usize {
        self.calls.borrow().iter().filter(|c| c.style == style).count()
    }

    pub fn last_args(&self) -> Option<Args> {
        self.calls.borrow().last().map(|c| c.args.clone())
    }

    fn record(&self, style: Style, args: &Args) {
        self.calls.borrow_mut().push(Recorded {
            style,
            args: args.clone(),
        });
    }
}

/// Completions held back until a test fires them.
#[derive(Clone, Default)]
pub struct CompletionQueue {
    pending: Rc<RefCell<VecDeque<Completion>>>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire the oldest completion. Like Chrome, `error` is written to the slot
    /// right before the completion runs.
    pub fn fire(&self, slot: &LastErrorSlot, values: Values, error: Option<&str>) {
        let completion = self
            .pending
            .borrow_mut()
            .pop_front()
            .expect("no pending completion");
        if let Some(message) = error {
            slot.set(HostError::new(message));
        }
        completion.complete(values);
    }
}

/// Callback handle that completes in the same turn it is called.
pub fn completing(
    recorder: &Recorder,
    slot: &LastErrorSlot,
    values: Values,
    error: Option<&str>,
) -> CallbackFn {
    let recorder = recorder.clone();
    let slot = slot.clone();
    let error = error.map(HostError::new);
    callback_fn(move |args, done| {
        recorder.record(Style::Callback, &args);
        if let Some(error) = &error {
            slot.set(error.clone());
        }
        done.complete(values.clone());
        Ok(())
    })
}

pub fn deferred(recorder: &Recorder, queue: &CompletionQueue) -> CallbackFn {
    let recorder = recorder.clone();
    let queue = queue.clone();
    callback_fn(move |args, done| {
        recorder.record(Style::Callback, &args);
        queue.pending.borrow_mut().push_back(done);
        Ok(())
    })
}

pub fn throwing(recorder: &Recorder, message: &str) -> CallbackFn {
    let recorder = recorder.clone();
    let error = HostError::new(message);
    callback_fn(move |args, _done| {
        recorder.record(Style::Callback, &args);
        Err(error.clone())
    })
}

pub fn resolving(recorder: &Recorder, values: Values) -> PromiseFn {
    let recorder = recorder.clone();
    promise_fn(move |args| {
        recorder.record(Style::Promise, &args);
        Ok(future::ready(Ok(values.clone())).boxed_local())
    })
}

pub fn rejecting(recorder: &Recorder, error: HostError) -> PromiseFn {
    let recorder = recorder.clone();
    promise_fn(move |args| {
        recorder.record(Style::Promise, &args);
        Ok(future::ready(Err(error.clone())).boxed_local())
    })
}

pub fn callback_factory(table: ApiTable<CallbackFn>, slot: &LastErrorSlot) -> PromiseFactory {
    PromiseFactory::new(Environment::callback(Rc::new(table), Rc::new(slot.clone())))
}

pub fn promise_factory(table: ApiTable<PromiseFn>) -> PromiseFactory {
    PromiseFactory::new(Environment::promise(Rc::new(table)))
}

pub fn factory_for(style: Style, slot: &LastErrorSlot) -> PromiseFactory {
    match style {
        Style::Callback => callback_factory(ApiTable::new(), slot),
        Style::Promise => promise_factory(ApiTable::new()),
    }
}
