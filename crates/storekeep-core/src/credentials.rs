//! Login and registration input types.

use std::fmt;

use crate::sanitize::sanitize_input;

/// Email/password credentials for `/auth/login`.
///
/// # Security
///
/// The password is never exposed in Debug output and is never sanitised,
/// so special characters survive intact.
///
/// # Example
///
/// ```
/// use storekeep_core::Credentials;
///
/// let creds = Credentials::new(" owner@example.com ", "p<ss>word");
/// assert_eq!(creds.email(), "owner@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create new credentials. The email is sanitised; the password is not.
    pub fn new(email: impl AsRef<str>, password: impl Into<String>) -> Self {
        Self {
            email: sanitize_input(email.as_ref()),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sign-up input for `/auth/register`.
#[derive(Clone)]
pub struct Registration {
    credentials: Credentials,
    name: String,
}

impl Registration {
    pub fn new(email: impl AsRef<str>, password: impl Into<String>, name: impl AsRef<str>) -> Self {
        Self {
            credentials: Credentials::new(email, password),
            name: sanitize_input(name.as_ref()),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("credentials", &self.credentials)
            .field("name", &self.name)
            .finish()
    }
}
