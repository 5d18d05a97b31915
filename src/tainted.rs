use std::fmt;

/// A raw request value that has not passed schema validation.
///
/// `Tainted<T>` marks data that arrived from the client. Its value can only be
/// read by the schema validator inside this crate; everything downstream of
/// admission sees [`ValidatedArgs`](crate::ValidatedArgs) instead.
///
/// # Security Properties
///
/// - Does NOT implement `Deref`, `AsRef` or any implicit conversion
/// - `Debug` shows only the length, never the content, so raw values do not
///   end up in logs
///
/// # Examples
///
/// ```
/// use admission_core::Tainted;
///
/// let value = Tainted::new("not-an-id!".to_string());
/// assert_eq!(format!("{:?}", value), "Tainted(<10 bytes>)");
/// ```
// Clone is required: adapters hand out independent copies of raw inputs.
#[derive(Clone, PartialEq, Eq)]
pub struct Tainted<T> {
    // Must remain private. Access goes through the validator only.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the raw value for validation.
    ///
    /// Restricted to the crate so only the schema validator can look inside.
    pub(crate) fn peek(&self) -> &T {
        &self.inner
    }
}

impl fmt::Debug for Tainted<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tainted(<{} bytes>)", self.inner.len())
    }
}
