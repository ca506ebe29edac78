//! Core module containing fundamental traits and types for the engine

pub mod entity;
pub mod error;
pub mod field;
pub mod query;
pub mod record;
pub mod service;

pub use entity::{Data, Entity};
pub use error::{ConfigError, FieldContext, ListError};
pub use field::{FieldKind, FieldValue};
pub use query::QueryParams;
pub use record::{Record, canonical_field_name, resolve};
pub use service::DataService;
