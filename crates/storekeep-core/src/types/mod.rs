//! Validated value types.

mod api_url;
mod environment;

pub use api_url::ApiUrl;
pub use environment::Environment;
