//! Best-effort values.
//!
//! Some steps of the card generation are cosmetic (animated background, time
//! label, accent colors). When they fail the card is still produced with a
//! documented default. `Degradable` carries either the real value or that
//! default together with the error that caused it, so callers cannot ignore
//! the fallback path.

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Degradable<T> {
    /// The operation succeeded
    Resolved(T),
    /// The operation failed and `value` is the documented default
    Fallback { value: T, cause: Error },
}

impl<T> Degradable<T> {
    /// Turns a result into a degradable value using the given default on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ytcard::error::Error;
    /// use ytcard::fallback::Degradable;
    ///
    /// let ok: Degradable<u8> = Degradable::or_else(Ok(1), || 0);
    /// assert!(ok.is_resolved());
    ///
    /// let ko = Degradable::or_else(Err(Error::Msg("boom".into())), || 0u8);
    /// assert_eq!(ko.into_value(), 0);
    /// ```
    pub fn or_else<F>(result: Result<T>, fallback: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(value) => Degradable::Resolved(value),
            Err(cause) => Degradable::Fallback {
                value: fallback(),
                cause,
            },
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Degradable::Resolved(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Degradable::Resolved(value) | Degradable::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Degradable::Resolved(value) | Degradable::Fallback { value, .. } => value,
        }
    }

    /// Retrieves the error that triggered the fallback (if any)
    pub fn cause(&self) -> Option<&Error> {
        match self {
            Degradable::Resolved(_) => None,
            Degradable::Fallback { cause, .. } => Some(cause),
        }
    }
}
