//! The item contract.
//!
//! Anything the scheduler persists implements [`Item`]. The scheduler never
//! looks inside an item; it only asks it to identify itself for diagnostics
//! and to confirm it may be submitted.

use std::fmt;

/// Reason an item was refused at the enqueue boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRejection {
    reason: String,
}

impl ItemRejection {
    /// Create a rejection with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The rejection reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ItemRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ItemRejection {}

/// A domain object that can be submitted for persistence.
///
/// # Example
/// ```
/// use save_throttle::{Item, ItemRejection};
///
/// struct Invoice {
///     number: String,
/// }
///
/// impl Item for Invoice {
///     fn kind(&self) -> &str {
///         "Invoice"
///     }
///
///     fn id(&self) -> Option<&str> {
///         Some(&self.number)
///     }
///
///     fn validate(&self) -> Result<(), ItemRejection> {
///         if self.number.is_empty() {
///             return Err(ItemRejection::new("invoice number is empty"));
///         }
///         Ok(())
///     }
/// }
///
/// let invoice = Invoice { number: "INV-1".into() };
/// assert!(invoice.validate().is_ok());
/// assert_eq!(invoice.describe(), "Invoice(INV-1)");
/// ```
pub trait Item: Send + Sync + 'static {
    /// Class or collection the item belongs to.
    fn kind(&self) -> &str;

    /// Backend identity, if the item has been persisted before.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Check that the item may be submitted.
    ///
    /// The default accepts any item with a non-empty kind.
    fn validate(&self) -> Result<(), ItemRejection> {
        if self.kind().is_empty() {
            return Err(ItemRejection::new("item kind is empty"));
        }
        Ok(())
    }

    /// Short description used in logs and error messages.
    fn describe(&self) -> String {
        match self.id() {
            Some(id) => format!("{}({})", self.kind(), id),
            None => format!("{}(new)", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(&'static str, Option<&'static str>);

    impl Item for Plain {
        fn kind(&self) -> &str {
            self.0
        }

        fn id(&self) -> Option<&str> {
            self.1
        }
    }

    #[test]
    fn test_default_validation_requires_kind() {
        assert!(Plain("Note", None).validate().is_ok());

        let err = Plain("", None).validate().unwrap_err();
        assert_eq!(err.reason(), "item kind is empty");
    }

    #[test]
    fn test_describe() {
        assert_eq!(Plain("Note", Some("n1")).describe(), "Note(n1)");
        assert_eq!(Plain("Note", None).describe(), "Note(new)");
    }
}
