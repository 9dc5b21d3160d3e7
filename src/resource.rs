use std::cell::OnceCell;
use std::fmt;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::NeonClient;
use crate::error::{NeonError, Result};

/// A schema type a [`Resource`] can be viewed as.
///
/// Implemented for every model in [`crate::models`].
pub trait Schema: DeserializeOwned + Serialize + Default + fmt::Debug {}

impl<T> Schema for T where T: DeserializeOwned + Serialize + Default + fmt::Debug {}

/// A read-only view over one decoded API response.
///
/// The raw JSON is kept as received. The typed view `T` is built from it on
/// first access and cached for the lifetime of the resource. Field access
/// falls through to the typed view via `Deref`, so `key.name` reads the
/// `name` field of the schema.
///
/// A resource borrows the client that fetched it and is not `Sync`.
pub struct Resource<'a, T> {
    client: &'a NeonClient,
    raw: Value,
    view: OnceCell<T>,
}

impl<'a, T: Schema> Resource<'a, T> {
    /// Wrap a raw response. Nothing is validated until the view is needed.
    pub fn new(client: &'a NeonClient, raw: Value) -> Self {
        Self {
            client,
            raw,
            view: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &'a NeonClient {
        self.client
    }

    /// The response exactly as decoded.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Whether the typed view has been built yet.
    pub fn is_materialized(&self) -> bool {
        self.view.get().is_some()
    }

    /// The typed view, built on first call.
    ///
    /// Missing fields stay `None`, unknown keys are ignored, and a field of
    /// the wrong type reads as `None` without affecting its siblings. A
    /// payload that is not an object at all yields `T::default()`; its values
    /// remain reachable through [`get`](Self::get).
    pub fn obj(&self) -> &T {
        self.view.get_or_init(|| match <T as Deserialize<'_>>::deserialize(&self.raw) {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(
                    schema = std::any::type_name::<T>(),
                    error = %e,
                    "response does not match schema, using an empty view"
                );
                T::default()
            }
        })
    }

    /// The typed view as a JSON object, for name-based lookups.
    fn view_fields(&self) -> serde_json::Map<String, Value> {
        match serde_json::to_value(self.obj()) {
            Ok(Value::Object(fields)) => fields,
            _ => serde_json::Map::new(),
        }
    }

    /// Look up a field by name: schema fields first, then the raw mapping.
    ///
    /// A schema field missing from the response resolves to `Value::Null`.
    pub fn attr(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.view_fields().remove(name) {
            if !value.is_null() {
                return Ok(value);
            }
            return Ok(self.raw.get(name).cloned().unwrap_or(Value::Null));
        }
        self.raw
            .get(name)
            .cloned()
            .ok_or_else(|| NeonError::AttributeNotFound(name.to_string()))
    }

    /// [`attr`](Self::attr) as an `Option`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.attr(name).ok()
    }

    /// Index by key: a value present in the typed view, else the raw mapping.
    ///
    /// Presence is literal, so `false`, `0` and `""` are returned as-is.
    pub fn item(&self, key: &str) -> Result<Value> {
        match self.view_fields().remove(key) {
            Some(value) if !value.is_null() => Ok(value),
            _ => self
                .raw
                .get(key)
                .cloned()
                .ok_or_else(|| NeonError::KeyNotFound(key.to_string())),
        }
    }
}

impl<T: Schema> Deref for Resource<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.obj()
    }
}

impl<T: Schema> fmt::Debug for Resource<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.obj(), f)
    }
}

impl<T: Schema> fmt::Display for Resource<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.obj())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiKeysListResponseItem, Branch, CurrentUserInfoResponse};
    use serde_json::json;

    fn client() -> NeonClient {
        NeonClient::new("test-key", Some("http://127.0.0.1:9/")).unwrap()
    }

    #[test]
    fn view_is_lazy_and_memoized() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> =
            Resource::new(&c, json!({"id": 7, "name": "ci"}));
        assert!(!r.is_materialized());

        let before = r.raw()["name"].clone();
        let first = r.obj() as *const _;
        assert!(r.is_materialized());
        let second = r.obj() as *const _;
        assert_eq!(first, second);
        assert_eq!(r.get("name"), Some(before));
        assert_eq!(r.name.as_deref(), Some("ci"));
    }

    #[test]
    fn partial_and_extra_fields_are_tolerated() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> =
            Resource::new(&c, json!({"id": 1, "brand_new_field": [1, 2]}));
        assert_eq!(r.id, Some(1));
        assert_eq!(r.name, None);
        assert_eq!(r.get("brand_new_field"), Some(json!([1, 2])));
    }

    #[test]
    fn mistyped_field_keeps_its_siblings() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> =
            Resource::new(&c, json!({"id": "k-1", "name": "ci", "created_at": "2024"}));
        assert_eq!(r.id, None);
        assert_eq!(r.name.as_deref(), Some("ci"));
        assert_eq!(r.created_at.as_deref(), Some("2024"));
        assert_eq!(r.get("id"), Some(json!("k-1")));
        assert!(r.to_string().contains("\"ci\""));
    }

    #[test]
    fn mistyped_nested_field_keeps_the_record() {
        let c = client();
        let r: Resource<'_, CurrentUserInfoResponse> = Resource::new(
            &c,
            json!({
                "email": "a@b",
                "billing_account": {"name": 5, "subscription_type": "free_v2"},
                "auth_accounts": [{"provider": "github"}, "garbage"]
            }),
        );
        assert_eq!(r.email.as_deref(), Some("a@b"));
        let billing = r.billing_account.as_ref().unwrap();
        assert_eq!(billing.name, None);
        assert_eq!(billing.subscription_type.as_deref(), Some("free_v2"));
        assert_eq!(r.auth_accounts.len(), 1);
    }

    #[test]
    fn non_object_payload_falls_back_to_default_view() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> = Resource::new(&c, json!([1, 2]));
        assert_eq!(r.id, None);
        assert!(matches!(r.attr("id"), Ok(Value::Null)));
    }

    #[test]
    fn attr_resolves_schema_then_raw() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> =
            Resource::new(&c, json!({"id": 3, "extra": true}));
        assert_eq!(r.attr("id").unwrap(), json!(3));
        // Declared by the schema but absent from the response.
        assert_eq!(r.attr("last_used_at").unwrap(), Value::Null);
        assert_eq!(r.attr("extra").unwrap(), json!(true));
        assert!(matches!(
            r.attr("nope"),
            Err(NeonError::AttributeNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn item_treats_falsy_values_as_present() {
        let c = client();
        let r: Resource<'_, Branch> = Resource::new(
            &c,
            json!({"id": "br-1", "protected": false, "logical_size": 0, "name": ""}),
        );
        assert_eq!(r.item("protected").unwrap(), json!(false));
        assert_eq!(r.item("logical_size").unwrap(), json!(0));
        assert_eq!(r.item("name").unwrap(), json!(""));
        assert!(matches!(r.item("parent_id"), Err(NeonError::KeyNotFound(_))));
    }

    #[test]
    fn display_delegates_to_view() {
        let c = client();
        let r: Resource<'_, ApiKeysListResponseItem> = Resource::new(&c, json!({"id": 5}));
        assert_eq!(r.to_string(), format!("{:?}", r.obj()));
        assert_eq!(format!("{r:?}"), r.to_string());
    }
}
