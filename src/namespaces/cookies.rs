//! `cookies` namespace
//!
//! Every operation takes a single parameter object and completes with a
//! single result value.

use crate::adapter::{Pending, PromiseFactory};
use crate::models::{Cookie, CookieStore, Options, RemovedCookie};
use crate::utils::{decoded, decoded_or_default, params};
use serde_json::Value;

const NAMESPACE: &str = "cookies";

pub struct Cookies<'a> {
    factory: &'a PromiseFactory,
}

impl<'a> Cookies<'a> {
    pub fn new(factory: &'a PromiseFactory) -> Self {
        Self { factory }
    }

    /// Get a cookie by name for `url`. Resolves with `None` when there is no
    /// such cookie. `store_id` defaults to the current context's store.
    pub fn get(&self, url: &str, name: &str, store_id: Option<&str>) -> Pending<Option<Cookie>> {
        let details = params(
            [
                ("url", Some(Value::from(url))),
                ("name", Some(Value::from(name))),
                ("storeId", store_id.map(Value::from)),
            ],
            None,
        );
        let pending = self.factory.call(NAMESPACE, "get", vec![Some(details)]);
        decoded("cookies.get", pending)
    }

    /// Set a cookie. `options` carries the remaining `cookies.set` details
    /// (`domain`, `path`, `secure`, ...) and wins over the named inputs.
    pub fn set(
        &self,
        url: &str,
        name: &str,
        value: &str,
        options: Option<Options>,
    ) -> Pending<Option<Cookie>> {
        let details = params(
            [
                ("url", Some(Value::from(url))),
                ("name", Some(Value::from(name))),
                ("value", Some(Value::from(value))),
            ],
            options,
        );
        let pending = self.factory.call(NAMESPACE, "set", vec![Some(details)]);
        decoded("cookies.set", pending)
    }

    /// All cookies matching the filter, possibly none.
    pub fn get_all(
        &self,
        url: Option<&str>,
        name: Option<&str>,
        options: Option<Options>,
    ) -> Pending<Vec<Cookie>> {
        let details = params(
            [("url", url.map(Value::from)), ("name", name.map(Value::from))],
            options,
        );
        let pending = self.factory.call(NAMESPACE, "getAll", vec![Some(details)]);
        decoded_or_default("cookies.getAll", pending)
    }

    /// Remove a cookie. Resolves with the removed cookie's details, or `None`
    /// when nothing was removed.
    pub fn remove(
        &self,
        url: &str,
        name: &str,
        store_id: Option<&str>,
    ) -> Pending<Option<RemovedCookie>> {
        let details = params(
            [
                ("url", Some(Value::from(url))),
                ("name", Some(Value::from(name))),
                ("storeId", store_id.map(Value::from)),
            ],
            None,
        );
        let pending = self.factory.call(NAMESPACE, "remove", vec![Some(details)]);
        decoded("cookies.remove", pending)
    }

    pub fn get_all_cookie_stores(&self) -> Pending<Vec<CookieStore>> {
        let pending = self.factory.call(NAMESPACE, "getAllCookieStores", Vec::new());
        decoded_or_default("cookies.getAllCookieStores", pending)
    }
}
