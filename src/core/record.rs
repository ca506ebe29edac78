//! Named field access over arbitrary record types
//!
//! The engine never sees a concrete schema. Each record type implements
//! [`Record`] (usually through [`impl_record!`](crate::impl_record) or
//! [`impl_data_entity!`](crate::impl_data_entity)) and the engine reads
//! fields through [`resolve`].

use crate::core::error::{FieldContext, ListError};
use crate::core::field::FieldValue;
use std::borrow::Cow;

/// Field access capability every listable record provides.
///
/// All records handed to one engine call are expected to expose the same
/// field set.
///
/// # Manual Implementation
///
/// ```
/// use listing::core::{FieldValue, Record};
///
/// struct Product {
///     name: String,
///     price: f64,
/// }
///
/// impl Record for Product {
///     fn field_value(&self, field: &str) -> Option<FieldValue> {
///         match field {
///             "name" => Some(FieldValue::from(self.name.clone())),
///             "price" => Some(FieldValue::from(self.price)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Get the value of a field by name.
    ///
    /// `None` means the field is not part of this record shape.
    /// A field that exists but holds no value returns `Some(FieldValue::Null)`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Fields searched when a search request names none
    fn searchable_fields() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Resolve a field on a record, trying the exact name first and then its
/// canonical snake_case alias (`Active` -> `active`, `createdAt` -> `created_at`).
pub fn resolve<R: Record + ?Sized>(
    record: &R,
    field: &str,
    context: FieldContext,
) -> Result<FieldValue, ListError> {
    if let Some(value) = record.field_value(field) {
        return Ok(value);
    }

    match canonical_field_name(field) {
        Cow::Owned(alias) => record
            .field_value(&alias)
            .ok_or_else(|| ListError::field_not_found(field, context)),
        Cow::Borrowed(_) => Err(ListError::field_not_found(field, context)),
    }
}

/// Convert a field name to snake_case.
///
/// Returns the input unchanged (borrowed) when it already is canonical.
pub fn canonical_field_name(name: &str) -> Cow<'_, str> {
    let needs_change = name
        .chars()
        .any(|c| c.is_uppercase() || c == '-' || c == ' ');
    if !needs_change {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
        } else if c.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    Cow::Owned(out)
}
