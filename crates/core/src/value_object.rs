//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable**, **self-validating** and **compared by
/// value**. Constructors return `DomainResult<Self>` and never coerce invalid
/// input into a valid value; "changing" a value object means building a new
/// one.
///
/// ```ignore
/// let a = EmailAddress::new("alice@example.com")?;
/// let b = EmailAddress::new("alice@example.com")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
