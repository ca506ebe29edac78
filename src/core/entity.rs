//! Entity traits for the business records the engine lists

use crate::core::record::Record;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities in the system.
///
/// All entities have:
/// - id: Unique identifier
/// - type: Entity type name (e.g., "admin", "product")
/// - created_at / updated_at: audit timestamps
/// - deleted_at: Soft deletion timestamp (optional)
/// - status: Current status of the entity
pub trait Entity: Clone + Send + Sync + 'static {
    /// The entity type name, also the key for per-entity list configuration
    fn type_name() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Get the deletion timestamp (soft delete)
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Get the entity status
    fn status(&self) -> &str;

    /// Check if the entity has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Check if the entity is active (status == "active" and not deleted)
    fn is_active(&self) -> bool {
        self.status() == "active" && !self.is_deleted()
    }
}

/// Data entities: concrete domain objects with a human-readable name whose
/// fields are reachable by name for list queries.
pub trait Data: Entity + Record {
    /// Get the name of this data entity
    fn name(&self) -> &str;
}
