//! WebAssembly bindings for the real extension globals
//!
//! `globalThis.chrome` backs the callback style and `globalThis.browser` the
//! promise style. Values cross the JS boundary through `serde-wasm-bindgen`;
//! a top-level `undefined` becomes `None`.
//!
//! Nothing here is exported to JS. The crate is linked into the extension's
//! own wasm binary, which calls [`init`] from its start function.

use crate::environment::{AdapterOptions, Environment};
use crate::error::{AdapterError, HostError};
use crate::host::{
    callback_fn, promise_fn, CallbackApi, CallbackFn, Completion, ErrorChannel, HostFuture,
    PromiseApi, PromiseFn,
};
use crate::models::{Args, Values};
use futures::FutureExt;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format_args!($($t)*).to_string())))
}

// Shipped as a bundled module: extension CSPs forbid `new Function`.
#[wasm_bindgen(inline_js = r#"
export function gather(receive) {
    return function () { receive(Array.from(arguments)); };
}
"#)]
extern "C" {
    fn gather(receive: &JsValue) -> JsValue;
}

/// Initialize panic hook for better error messages in browser console
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Probe the page's globals and build the environment for whichever style
/// this browser exposes.
pub fn detect_environment(options: &AdapterOptions) -> Result<Environment, AdapterError> {
    let promise = global_object("browser")
        .map(|root| Rc::new(JsPromiseApi::new(root)) as Rc<dyn PromiseApi>);
    let callback = global_object("chrome").map(|root| {
        let errors = Rc::new(JsLastError::new(root.clone())) as Rc<dyn ErrorChannel>;
        (Rc::new(JsCallbackApi::new(root)) as Rc<dyn CallbackApi>, errors)
    });

    let environment = Environment::probe(promise, callback, options)?;
    console_log!("webext-promise: using {}-style API", environment.style());
    Ok(environment)
}

/// `chrome.<namespace>.<operation>`, called with a trailing completion.
pub struct JsCallbackApi {
    root: Object,
}

impl JsCallbackApi {
    pub fn new(root: Object) -> Self {
        Self { root }
    }
}

impl CallbackApi for JsCallbackApi {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<CallbackFn> {
        let (this, function) = resolve(&self.root, namespace, operation)?;
        Some(callback_fn(move |args: Args, completion: Completion| {
            let array = to_js_args(&args).map_err(|e| HostError::new(e.to_string()))?;
            array.push(&completion_to_js(completion));
            function.apply(&this, &array).map(|_| ()).map_err(to_host_error)
        }))
    }
}

/// `chrome.runtime.lastError`. Reading it inside the callback marks it checked.
pub struct JsLastError {
    root: Object,
}

impl JsLastError {
    pub fn new(root: Object) -> Self {
        Self { root }
    }
}

impl ErrorChannel for JsLastError {
    fn take_last_error(&self) -> Option<HostError> {
        let runtime = member(&self.root, "runtime")?;
        member(&runtime, "lastError").map(to_host_error)
    }
}

/// `browser.<namespace>.<operation>`, whose return value is awaited.
pub struct JsPromiseApi {
    root: Object,
}

impl JsPromiseApi {
    pub fn new(root: Object) -> Self {
        Self { root }
    }
}

impl PromiseApi for JsPromiseApi {
    fn lookup(&self, namespace: &str, operation: &str) -> Option<PromiseFn> {
        let (this, function) = resolve(&self.root, namespace, operation)?;
        Some(promise_fn(move |args: Args| {
            let array = to_js_args(&args).map_err(|e| HostError::new(e.to_string()))?;
            let returned = function.apply(&this, &array).map_err(to_host_error)?;
            Ok(promise_to_future(Promise::resolve(&returned)))
        }))
    }
}

fn global_object(name: &str) -> Option<Object> {
    member(&js_sys::global(), name)?.dyn_into::<Object>().ok()
}

fn member(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn resolve(root: &Object, namespace: &str, operation: &str) -> Option<(JsValue, Function)> {
    let target = member(root, namespace)?;
    let function = member(&target, operation)?.dyn_into::<Function>().ok()?;
    Some((target, function))
}

fn to_js(value: &Value) -> anyhow::Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| anyhow::anyhow!("cannot pass argument to the host: {}", e))
}

fn from_js(value: &JsValue) -> anyhow::Result<Option<Value>> {
    if value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value.clone())
        .map(Some)
        .map_err(|e| anyhow::anyhow!("cannot read host result: {}", e))
}

fn to_js_args(args: &Args) -> anyhow::Result<Array> {
    let array = Array::new();
    for arg in args {
        match arg {
            Some(value) => array.push(&to_js(value)?),
            None => array.push(&JsValue::UNDEFINED),
        };
    }
    Ok(array)
}

fn to_values(value: &JsValue) -> anyhow::Result<Values> {
    Ok(from_js(value)?.into_iter().collect())
}

fn to_host_error(value: JsValue) -> HostError {
    let message = member(&value, "message")
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    HostError::new(message)
}

/// Wrap a completion so JS can call it with any number of results.
fn completion_to_js(completion: Completion) -> JsValue {
    let receive = Closure::once_into_js(move |results: Array| {
        let values: anyhow::Result<Values> = results
            .iter()
            .map(|value| -> anyhow::Result<Value> { Ok(from_js(&value)?.unwrap_or(Value::Null)) })
            .collect();
        match values {
            Ok(values) => completion.complete(values),
            Err(e) => completion.fail(HostError::new(e.to_string())),
        }
    });
    gather(&receive)
}

fn promise_to_future(promise: Promise) -> HostFuture {
    JsFuture::from(promise)
        .map(|settled| match settled {
            Ok(value) => to_values(&value).map_err(|e| HostError::new(e.to_string())),
            Err(reason) => Err(to_host_error(reason)),
        })
        .boxed_local()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::models::Style;
    use crate::PromiseFactory;
    use serde_json::json;
    use std::cell::Cell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn set(target: &JsValue, key: &str, value: &JsValue) {
        Reflect::set(target, &JsValue::from_str(key), value).unwrap();
    }

    fn namespace(operation: &str, handle: JsValue) -> Object {
        let object = Object::new();
        set(&object, operation, &handle);
        object
    }

    fn callback_factory(root: &Object) -> PromiseFactory {
        PromiseFactory::new(Environment::callback(
            Rc::new(JsCallbackApi::new(root.clone())),
            Rc::new(JsLastError::new(root.clone())),
        ))
    }

    fn promise_factory(root: &Object) -> PromiseFactory {
        PromiseFactory::new(Environment::promise(Rc::new(JsPromiseApi::new(root.clone()))))
    }

    #[wasm_bindgen_test]
    async fn test_last_error_rejects_callback_call() {
        let root = Object::new();
        let runtime = Object::new();
        set(&root, "runtime", &runtime);
        let create = Closure::<dyn FnMut(JsValue, JsValue, Function)>::new(
            move |_id: JsValue, _options: JsValue, done: Function| {
                let error = Object::new();
                set(&error, "message", &JsValue::from_str("icon missing"));
                set(&runtime, "lastError", &error);
                let _ = done.call1(&JsValue::NULL, &JsValue::from_str("n1"));
                let _ = Reflect::delete_property(&runtime, &JsValue::from_str("lastError"));
            },
        );
        set(&root, "notifications", &namespace("create", create.into_js_value()));

        let mut options = serde_json::Map::new();
        options.insert("title".to_string(), json!("Hi"));
        let err = callback_factory(&root)
            .notifications()
            .create(None, options)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::LastError(_)));
        assert_eq!(err.to_string(), "icon missing");
    }

    #[wasm_bindgen_test]
    async fn test_callback_receives_every_result() {
        let root = Object::new();
        let get = Closure::<dyn FnMut(JsValue, Function)>::new(|_details: JsValue, done: Function| {
            let cookie = to_js(&json!({ "name": "session", "value": "abc" })).unwrap();
            let _ = done.call2(&JsValue::NULL, &cookie, &JsValue::from_str("second"));
        });
        set(&root, "cookies", &namespace("get", get.into_js_value()));

        let values = callback_factory(&root)
            .call("cookies", "get", vec![Some(json!({ "url": "https://x.test" }))])
            .await
            .unwrap();

        assert_eq!(values, vec![json!({ "name": "session", "value": "abc" }), json!("second")]);
    }

    #[wasm_bindgen_test]
    async fn test_undefined_argument_keeps_its_position() {
        let root = Object::new();
        let positions = Rc::new(Cell::new(false));
        let seen = Rc::clone(&positions);
        let op = Closure::<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>::new(
            move |_a: JsValue, _b: JsValue, c: JsValue, done: JsValue| {
                seen.set(c.is_undefined() && done.is_function());
                if let Some(done) = done.dyn_ref::<Function>() {
                    let _ = done.call0(&JsValue::NULL);
                }
            },
        );
        set(&root, "test", &namespace("op", op.into_js_value()));

        let args = vec![Some(json!("a")), Some(json!("b")), None];
        let values = callback_factory(&root).call("test", "op", args).await.unwrap();

        assert!(values.is_empty());
        assert!(positions.get());
    }

    #[wasm_bindgen_test]
    async fn test_unreadable_callback_result_fails() {
        let root = Object::new();
        let get = Closure::<dyn FnMut(JsValue, Function)>::new(|_details: JsValue, done: Function| {
            let _ = done.call1(&JsValue::NULL, &js_sys::Symbol::for_("webext").into());
        });
        set(&root, "cookies", &namespace("get", get.into_js_value()));

        let result = callback_factory(&root).cookies().get("https://x.test", "session", None).await;

        assert!(matches!(result, Err(AdapterError::Convert(_))));
    }

    #[wasm_bindgen_test]
    async fn test_throwing_handle_is_a_rejection() {
        let root = Object::new();
        let get = Closure::<dyn FnMut(JsValue, Function)>::new(
            |_details: JsValue, _done: Function| {
                wasm_bindgen::throw_str("Invalid invocation");
            },
        );
        set(&root, "cookies", &namespace("get", get.into_js_value()));

        let err = callback_factory(&root)
            .cookies()
            .get("https://x.test", "session", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Threw(_)));
        assert_eq!(err.to_string(), "Invalid invocation");
    }

    #[wasm_bindgen_test]
    async fn test_native_rejection_keeps_message() {
        let root = Object::new();
        let remove = Closure::<dyn FnMut(JsValue) -> Promise>::new(|_details: JsValue| {
            Promise::reject(&js_sys::Error::new("not found").into())
        });
        set(&root, "cookies", &namespace("remove", remove.into_js_value()));

        let err = promise_factory(&root)
            .cookies()
            .remove("https://x.test", "session", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Rejected(ref e) if *e == HostError::new("not found")));
    }

    #[wasm_bindgen_test]
    async fn test_plain_string_rejection() {
        let root = Object::new();
        let clear = Closure::<dyn FnMut(JsValue) -> Promise>::new(|_id: JsValue| {
            Promise::reject(&JsValue::from_str("plain"))
        });
        set(&root, "notifications", &namespace("clear", clear.into_js_value()));

        let err = promise_factory(&root).notifications().clear("n1").await.unwrap_err();

        assert_eq!(err.to_string(), "plain");
    }

    #[wasm_bindgen_test]
    async fn test_promise_resolution_is_decoded() {
        let root = Object::new();
        let get_all = Closure::<dyn FnMut() -> Promise>::new(|| {
            Promise::resolve(&to_js(&json!({ "n1": true })).unwrap())
        });
        set(&root, "notifications", &namespace("getAll", get_all.into_js_value()));

        let all = promise_factory(&root).notifications().get_all().await.unwrap();

        assert_eq!(all.get("n1"), Some(&json!(true)));
    }

    #[wasm_bindgen_test]
    async fn test_unreadable_promise_result_fails() {
        let root = Object::new();
        let get = Closure::<dyn FnMut(JsValue) -> Promise>::new(|_details: JsValue| {
            Promise::resolve(&js_sys::Symbol::for_("webext").into())
        });
        set(&root, "cookies", &namespace("get", get.into_js_value()));

        let result = promise_factory(&root).cookies().get("https://x.test", "session", None).await;

        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_detects_browser_global() {
        let global = js_sys::global();
        set(&global, "browser", &Object::new());

        let environment = detect_environment(&AdapterOptions::default()).unwrap();
        let _ = Reflect::delete_property(&global, &JsValue::from_str("browser"));

        assert_eq!(environment.style(), Style::Promise);
    }
}
