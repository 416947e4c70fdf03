//! Resource models exchanged with the admin backend.
//!
//! Every model keeps the fields the client reasons about as typed members
//! and carries the rest of the WooCommerce payload in `extra`, so nothing
//! the backend sends is lost on a read-modify-write.

mod category;
mod coupon;
mod customer;
mod order;
mod page;
mod product;
mod report;
mod settings;
mod user;

pub use category::{Category, CategoryInput};
pub use coupon::{Coupon, CouponInput};
pub use customer::{Customer, CustomerInput};
pub use order::{Order, OrderUpdate};
pub use page::{DEFAULT_PER_PAGE, ListQuery, Page};
pub use product::{Product, ProductInput, ProductQuery, Variation};
pub use report::{SalesPeriod, TopSeller};
pub use settings::{SettingsPayload, SettingsUpdate, StoreSettings};
pub use user::User;

/// Unknown fields preserved from the backend payload.
pub type Extra = serde_json::Map<String, serde_json::Value>;
