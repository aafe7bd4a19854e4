//! Values from lookups that substitute a fallback instead of failing.

/// Outcome of an external lookup that never fails.
///
/// Callers only need to know whether the service produced the value or the
/// fixed fallback was substituted, never why.
///
/// # Examples
///
/// ```
/// use bilim_core::Sourced;
///
/// let url = Sourced::Fallback("https://example.com/default.jpeg".to_string());
/// assert!(url.is_fallback());
/// assert_eq!(url.into_inner(), "https://example.com/default.jpeg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    /// Produced by the external service.
    Service(T),
    /// Fixed fallback value.
    Fallback(T),
}

impl<T> Sourced<T> {
    /// Whether the fallback was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Borrows the value regardless of where it came from.
    pub fn value(&self) -> &T {
        match self {
            Self::Service(value) | Self::Fallback(value) => value,
        }
    }

    /// Takes the value regardless of where it came from.
    pub fn into_inner(self) -> T {
        match self {
            Self::Service(value) | Self::Fallback(value) => value,
        }
    }
}
