//! Outgoing request decoration.

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::{Method, Request};
use tracing::{trace, warn};

use storekeep_core::error::InvalidInputError;
use storekeep_core::{AccessToken, AuthStateStore, Environment, Result};

use super::{CSRF_HEADER, REFRESH_ROUTE};
use crate::jar::SharedCookieJar;

/// Adds the bearer token and, on mutating verbs, the CSRF header.
pub(crate) struct RequestInterceptor<'a> {
    pub(crate) auth: &'a AuthStateStore,
    pub(crate) jar: &'a SharedCookieJar,
    pub(crate) environment: Environment,
}

impl RequestInterceptor<'_> {
    pub(crate) fn intercept(&self, request: &mut Request, route: &str) -> Result<()> {
        if let Some(token) = self.auth.token() {
            if !request.headers().contains_key(AUTHORIZATION) {
                request
                    .headers_mut()
                    .insert(AUTHORIZATION, bearer_header(&token)?);
            }
        }

        if !is_mutating(request.method()) || route == REFRESH_ROUTE {
            return Ok(());
        }

        match self.jar.csrf_token(request.url()) {
            Some(csrf) => {
                let value = HeaderValue::from_str(csrf.as_str()).map_err(|_| {
                    InvalidInputError::HeaderValue {
                        name: CSRF_HEADER.to_string(),
                    }
                })?;
                request
                    .headers_mut()
                    .insert(HeaderName::from_static(CSRF_HEADER), value);
                trace!(route, "attached CSRF header");
            }
            None if !self.environment.is_production() => {
                warn!(route, method = %request.method(), "no CSRF cookie for state-changing request");
            }
            None => {}
        }

        Ok(())
    }
}

/// `Authorization: Bearer <token>`, marked sensitive so it never shows up
/// in `reqwest` debug output.
pub(crate) fn bearer_header(token: &AccessToken) -> Result<HeaderValue> {
    let mut value =
        HeaderValue::from_str(&token.bearer()).map_err(|_| InvalidInputError::HeaderValue {
            name: AUTHORIZATION.as_str().to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

fn is_mutating(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekeep_core::cookie::CSRF_COOKIE;
    use storekeep_core::Cookie;
    use url::Url;

    fn request(method: Method, path: &str) -> Request {
        Request::new(
            method,
            Url::parse(&format!("http://localhost:3000/api{}", path)).unwrap(),
        )
    }

    fn jar_with_csrf(value: &str) -> SharedCookieJar {
        let jar = SharedCookieJar::new();
        jar.add(Cookie::new(CSRF_COOKIE, value, "localhost"));
        jar
    }

    #[test]
    fn injects_bearer_when_token_present() {
        let auth = AuthStateStore::with_token(AccessToken::new("tokA"));
        let jar = SharedCookieJar::new();
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Development,
        };

        let mut req = request(Method::GET, "/products");
        interceptor.intercept(&mut req, "/products").unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer tokA");
    }

    #[test]
    fn keeps_explicit_authorization() {
        let auth = AuthStateStore::with_token(AccessToken::new("tokA"));
        let jar = SharedCookieJar::new();
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Development,
        };

        let mut req = request(Method::GET, "/products");
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        interceptor.intercept(&mut req, "/products").unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer other");
    }

    #[test]
    fn no_token_no_header() {
        let auth = AuthStateStore::new();
        let jar = SharedCookieJar::new();
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Development,
        };

        let mut req = request(Method::GET, "/products");
        interceptor.intercept(&mut req, "/products").unwrap();
        assert!(!req.headers().contains_key(AUTHORIZATION));
    }

    #[test]
    fn csrf_only_on_mutations() {
        let auth = AuthStateStore::new();
        let jar = jar_with_csrf("csrf-1");
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Production,
        };

        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            let mut req = request(method, "/products");
            interceptor.intercept(&mut req, "/products").unwrap();
            assert!(!req.headers().contains_key(CSRF_HEADER));
        }

        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let mut req = request(method, "/products/1");
            interceptor.intercept(&mut req, "/products/1").unwrap();
            assert_eq!(req.headers()[CSRF_HEADER], "csrf-1");
        }
    }

    #[test]
    fn refresh_call_never_carries_csrf() {
        let auth = AuthStateStore::new();
        let jar = jar_with_csrf("csrf-1");
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Development,
        };

        let mut req = request(Method::POST, REFRESH_ROUTE);
        interceptor.intercept(&mut req, REFRESH_ROUTE).unwrap();
        assert!(!req.headers().contains_key(CSRF_HEADER));
    }

    #[test]
    fn missing_csrf_cookie_is_not_fatal() {
        let auth = AuthStateStore::new();
        let jar = SharedCookieJar::new();
        let interceptor = RequestInterceptor {
            auth: &auth,
            jar: &jar,
            environment: Environment::Development,
        };

        let mut req = request(Method::POST, "/coupons");
        assert!(interceptor.intercept(&mut req, "/coupons").is_ok());
        assert!(!req.headers().contains_key(CSRF_HEADER));
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer_header(&AccessToken::new("tokA")).unwrap();
        assert!(value.is_sensitive());
        assert!(bearer_header(&AccessToken::new("bad\ntoken")).is_err());
    }
}
