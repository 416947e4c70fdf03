//! Discount coupons.

use async_trait::async_trait;
use serde_json::Value;

use storekeep_core::Result;
use storekeep_core::resources::{Coupon, CouponInput, ListQuery, Page};

use super::{CrudResource, Resource};
use crate::client::ApiClient;

/// `/coupons`. Inputs are sanitised before they are sent.
#[derive(Debug, Clone)]
pub struct CouponsApi {
    resource: Resource,
}

impl CouponsApi {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            resource: Resource::new(client, "/coupons", "coupons"),
        }
    }
}

#[async_trait]
impl CrudResource for CouponsApi {
    type Item = Coupon;
    type Input = CouponInput;

    async fn list(&self, query: ListQuery) -> Result<Page<Coupon>> {
        self.resource.list(&query).await
    }

    async fn get(&self, id: u64) -> Result<Coupon> {
        self.resource.get(id).await
    }

    async fn create(&self, input: CouponInput) -> Result<Coupon> {
        self.resource.create(&input.sanitized()).await
    }

    async fn update(&self, id: u64, input: CouponInput) -> Result<Coupon> {
        self.resource.update(id, &input.sanitized()).await
    }

    async fn delete(&self, id: u64) -> Result<Value> {
        self.resource.delete(id).await
    }
}
