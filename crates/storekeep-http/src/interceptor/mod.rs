//! The two stages every request passes through.

mod request;
mod response;

pub(crate) use request::{RequestInterceptor, bearer_header};
pub(crate) use response::{REFRESH_ROUTE, ResponseInterceptor, should_refresh};

/// Header carrying the anti-forgery token in both directions.
pub(crate) const CSRF_HEADER: &str = "x-csrf-token";
