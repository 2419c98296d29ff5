//! Helper utility functions

use crate::adapter::Pending;
use crate::error::AdapterError;
use crate::models::{Options, Values};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Build a parameter object from named inputs, then merge `options` over it.
///
/// `None` inputs are left out. On a key collision the options value wins.
pub fn params<I>(named: I, options: Option<Options>) -> Value
where
    I: IntoIterator<Item = (&'static str, Option<Value>)>,
{
    let mut object: Map<String, Value> = named
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect();

    if let Some(options) = options {
        object.extend(options);
    }

    Value::Object(object)
}

/// Decode the first result value. A missing value decodes from `null`.
pub fn decode_first<T: DeserializeOwned>(
    operation: &str,
    values: Values,
) -> Result<T, AdapterError> {
    let value = values.into_iter().next().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| AdapterError::Decode {
        operation: operation.to_string(),
        source,
    })
}

/// Like [`decode_first`], but an absent or `null` value becomes `T::default()`.
pub fn decode_first_or_default<T>(operation: &str, values: Values) -> Result<T, AdapterError>
where
    T: DeserializeOwned + Default,
{
    decode_first::<Option<T>>(operation, values).map(Option::unwrap_or_default)
}

/// Decode the first value of a pending call once it resolves.
pub fn decoded<T>(operation: &'static str, pending: Pending<Values>) -> Pending<T>
where
    T: DeserializeOwned + 'static,
{
    pending
        .map(move |result| result.and_then(|values| decode_first(operation, values)))
        .boxed_local()
}

/// [`decoded`], with absent values turned into `T::default()`.
pub fn decoded_or_default<T>(operation: &'static str, pending: Pending<Values>) -> Pending<T>
where
    T: DeserializeOwned + Default + 'static,
{
    pending
        .map(move |result| result.and_then(|values| decode_first_or_default(operation, values)))
        .boxed_local()
}
