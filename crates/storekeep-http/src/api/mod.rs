//! Typed wrappers over the backend's REST resources.
//!
//! Every wrapper owns a cheap clone of the [`ApiClient`] and goes through
//! the same interceptor pipeline, so token refresh and CSRF handling apply
//! uniformly.

mod auth;
mod categories;
mod collection;
mod connection;
mod coupons;
mod customers;
mod orders;
mod products;
mod reports;
mod settings;
mod users;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{ListQuery, Page};

use crate::client::ApiClient;

pub use auth::{AuthApi, AuthSession, LogoutOutcome};
pub use categories::CategoriesApi;
pub use collection::fetch_collection;
pub use connection::{ConnectionReport, test_connection};
pub use coupons::CouponsApi;
pub use customers::CustomersApi;
pub use orders::OrdersApi;
pub use products::{ProductsApi, VariationsApi};
pub use reports::ReportsApi;
pub use settings::SettingsApi;
pub use users::UsersApi;

/// List/get/create/update/delete over one collection.
#[async_trait]
pub trait CrudResource: Send + Sync {
    type Item: DeserializeOwned + Send;
    type Input: Serialize + Send + Sync;

    async fn list(&self, query: ListQuery) -> Result<Page<Self::Item>>;

    async fn get(&self, id: u64) -> Result<Self::Item>;

    async fn create(&self, input: Self::Input) -> Result<Self::Item>;

    async fn update(&self, id: u64, input: Self::Input) -> Result<Self::Item>;

    /// Delete an item, returning whatever the backend echoes back.
    async fn delete(&self, id: u64) -> Result<Value>;

    /// Total number of items, read from a one-item page.
    async fn count(&self) -> Result<u64> {
        Ok(self.list(ListQuery::new().page(1).per_page(1)).await?.total)
    }
}

/// Route bookkeeping shared by the collection wrappers.
#[derive(Debug, Clone)]
pub(crate) struct Resource {
    client: ApiClient,
    route: String,
    items_key: &'static str,
}

impl Resource {
    pub(crate) fn new(client: &ApiClient, route: impl Into<String>, items_key: &'static str) -> Self {
        Self {
            client: client.clone(),
            route: route.into(),
            items_key,
        }
    }

    fn item_route(&self, id: u64) -> String {
        format!("{}/{}", self.route, id)
    }

    pub(crate) async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>> {
        fetch_collection(&self.client, &self.route, self.items_key, query).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, id: u64) -> Result<T> {
        self.client.get(&self.item_route(id)).await?.json()
    }

    pub(crate) async fn create<B, T>(&self, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.post(&self.route, body).await?.json()
    }

    pub(crate) async fn update<B, T>(&self, id: u64, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.put(&self.item_route(id), body).await?.json()
    }

    pub(crate) async fn delete(&self, id: u64) -> Result<Value> {
        self.client.delete(&self.item_route(id)).await?.value()
    }
}

/// `body[key]` when present and non-null, otherwise the body itself.
pub(crate) fn unwrap_key(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) if !inner.is_null() => inner,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}
