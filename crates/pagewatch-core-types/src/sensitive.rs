//! Redaction wrapper for credentials
//!
//! Webhook ids and tokens end up inside the request URL, so anything that
//! carries them (settings, the webhook sink itself) holds them in
//! [`Sensitive`] to keep them out of `Debug` output and log lines.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use pagewatch_core_types::Sensitive;
///
/// let token = Sensitive::new("webhook-token");
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(format!("{}", token), "***REDACTED***");
/// assert_eq!(token.expose(), &"webhook-token");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value, e.g. to build the webhook URL
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Derive a new secret from this one without exposing it in between
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sensitive<U> {
        Sensitive(f(self.0))
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
