//! Macros for reducing boilerplate when defining listable entities
//!
//! These macros generate the repetitive trait implementations needed
//! for each entity type: [`Entity`](crate::core::Entity),
//! [`Data`](crate::core::Data) and the named field access of
//! [`Record`](crate::core::Record) the list engine reads through.
//!
//! Every field exposed to the engine must convert into a
//! [`FieldValue`](crate::core::FieldValue) with `From` (strings, integers,
//! floats, booleans, `Uuid`, `DateTime<Utc>` and `Option`s of those).

/// Implement [`Record`](crate::core::Record) for an existing struct
///
/// Each listed field is exposed under its own name.
///
/// # Example
///
/// ```rust
/// use listing::prelude::*;
///
/// #[derive(Clone)]
/// struct Room {
///     name: String,
///     floor: i64,
///     wing: Option<String>,
/// }
///
/// impl_record!(Room, ["name"], { name, floor, wing });
///
/// let room = Room { name: "Lab".into(), floor: 2, wing: None };
/// assert_eq!(room.field_value("floor"), Some(FieldValue::Integer(2)));
/// assert_eq!(room.field_value("wing"), Some(FieldValue::Null));
/// assert_eq!(Room::searchable_fields(), &["name"]);
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident,
        [ $( $searchable_field:expr ),* $(,)? ],
        { $( $field:ident ),* $(,)? }
    ) => {
        impl $crate::core::record::Record for $type {
            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                $(
                    if field == stringify!($field) {
                        return Some($crate::core::field::FieldValue::from(self.$field.clone()));
                    }
                )*
                None
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( $searchable_field ),* ]
            }
        }
    };
}

/// Complete macro to create a Data entity with automatic trait implementations
///
/// The generated struct carries the base fields (`id`, `entity_type`,
/// `created_at`, `updated_at`, `deleted_at`, `status`, `name`) followed by
/// the specific fields. All of them are reachable by name for filter, sort
/// and search; the bracketed list names the default search fields.
///
/// # Example
///
/// ```rust,ignore
/// use listing::prelude::*;
///
/// impl_data_entity!(
///     Product,
///     "product",
///     ["name", "sku"],
///     {
///         sku: String,
///         price: f64,
///         stock: i64,
///     }
/// );
///
/// // Usage
/// let product = Product::new(
///     "Desk lamp".to_string(),
///     "active".to_string(),
///     "LMP-001".to_string(),
///     24.5,
///     12,
/// );
/// ```
#[macro_export]
macro_rules! impl_data_entity {
    (
        $type:ident,
        $type_name:expr,
        [ $( $searchable_field:expr ),* $(,)? ],
        {
            $( $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this entity
            pub id: ::uuid::Uuid,

            /// Type of the entity
            #[serde(rename = "type")]
            pub entity_type: String,

            /// When this entity was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this entity was soft-deleted (if applicable)
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,

            /// Current status of the entity
            pub status: String,

            /// Name of this data entity
            pub name: String,
            $( pub $specific_field : $specific_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn type_name() -> &'static str {
                $type_name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }

            fn status(&self) -> &str {
                &self.status
            }
        }

        impl $crate::core::record::Record for $type {
            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::FieldValue;
                match field {
                    "id" => return Some(FieldValue::Uuid(self.id)),
                    "entity_type" | "type" => {
                        return Some(FieldValue::String(self.entity_type.clone()));
                    }
                    "created_at" => return Some(FieldValue::DateTime(self.created_at)),
                    "updated_at" => return Some(FieldValue::DateTime(self.updated_at)),
                    "deleted_at" => return Some(FieldValue::from(self.deleted_at)),
                    "status" => return Some(FieldValue::String(self.status.clone())),
                    "name" => return Some(FieldValue::String(self.name.clone())),
                    _ => {}
                }
                $(
                    if field == stringify!($specific_field) {
                        return Some(FieldValue::from(self.$specific_field.clone()));
                    }
                )*
                None
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( $searchable_field ),* ]
            }
        }

        impl $crate::core::entity::Data for $type {
            fn name(&self) -> &str {
                &self.name
            }
        }

        // Utility methods
        impl $type {
            /// Create a new instance of this entity
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                name: String,
                status: String,
                $( $specific_field: $specific_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    entity_type: $type_name.to_string(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                    status,
                    name,
                    $( $specific_field ),*
                }
            }

            /// Soft delete this entity (sets deleted_at timestamp)
            #[allow(dead_code)]
            pub fn soft_delete(&mut self) {
                self.deleted_at = Some(::chrono::Utc::now());
                self.updated_at = ::chrono::Utc::now();
            }

            /// Restore a soft-deleted entity (clears deleted_at timestamp)
            #[allow(dead_code)]
            pub fn restore(&mut self) {
                self.deleted_at = None;
                self.updated_at = ::chrono::Utc::now();
            }

            /// Update the updated_at timestamp to now
            #[allow(dead_code)]
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }

            /// Change the entity status
            #[allow(dead_code)]
            pub fn set_status(&mut self, status: String) {
                self.status = status;
                self.touch();
            }
        }
    };
}
