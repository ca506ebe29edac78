//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::list::pagination::DEFAULT_PAGE_SIZE;
use crate::list::processor::ListProcessor;
use crate::list::search::{DEFAULT_HIGHLIGHT_LENGTH, DEFAULT_MAX_SEARCH_RESULTS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// List settings for one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityListConfig {
    /// Entity type name (e.g., "product", "order")
    pub name: String,

    /// Overrides the engine default page size for this entity
    #[serde(default)]
    pub default_page_size: Option<usize>,

    /// Fields searched when a search request names none
    #[serde(default)]
    pub search_fields: Vec<String>,
}

/// Complete configuration for the list engine
///
/// # Example
///
/// ```yaml
/// default_page_size: 20
/// max_page_size: 100
/// entities:
///   - name: product
///     default_page_size: 50
///     search_fields: [name, description]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size used when a request asks for zero rows
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on page sizes and cursor limits; larger requests are clamped
    #[serde(default)]
    pub max_page_size: Option<usize>,

    /// Maximum excerpt length of a search highlight, in characters
    #[serde(default = "default_highlight_length")]
    pub highlight_length: usize,

    /// Maximum number of records a search may keep
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Per-entity overrides
    #[serde(default)]
    pub entities: Vec<EntityListConfig>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_highlight_length() -> usize {
    DEFAULT_HIGHLIGHT_LENGTH
}

fn default_max_search_results() -> usize {
    DEFAULT_MAX_SEARCH_RESULTS
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
            highlight_length: default_highlight_length(),
            max_search_results: default_max_search_results(),
            entities: Vec::new(),
        }
    }
}

impl ListingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        tracing::debug!(
            default_page_size = config.default_page_size,
            entities = config.entities.len(),
            "listing config loaded"
        );
        Ok(config)
    }

    /// Check value ranges and entity name uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(invalid("default_page_size", "must be greater than 0"));
        }
        if let Some(max) = self.max_page_size {
            if max == 0 {
                return Err(invalid("max_page_size", "must be greater than 0"));
            }
            if max < self.default_page_size {
                return Err(invalid(
                    "max_page_size",
                    format!(
                        "must not be smaller than default_page_size ({})",
                        self.default_page_size
                    ),
                ));
            }
        }
        if self.highlight_length == 0 {
            return Err(invalid("highlight_length", "must be greater than 0"));
        }
        if self.max_search_results == 0 {
            return Err(invalid("max_search_results", "must be greater than 0"));
        }

        for (index, entity) in self.entities.iter().enumerate() {
            let field = |name: &str| format!("entities[{}].{}", index, name);
            if entity.name.trim().is_empty() {
                return Err(invalid(field("name"), "must not be empty"));
            }
            if self.entities[..index].iter().any(|e| e.name == entity.name) {
                return Err(invalid(
                    field("name"),
                    format!("duplicate entity '{}'", entity.name),
                ));
            }
            if entity.default_page_size == Some(0) {
                return Err(invalid(field("default_page_size"), "must be greater than 0"));
            }
            if entity.search_fields.iter().any(|f| f.trim().is_empty()) {
                return Err(invalid(field("search_fields"), "must not contain blank names"));
            }
        }
        Ok(())
    }

    /// Find the overrides for an entity type
    pub fn for_entity(&self, name: &str) -> Option<&EntityListConfig> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Build a processor for an entity type, applying its overrides.
    pub fn processor_for(&self, name: &str) -> ListProcessor {
        let processor = ListProcessor::with_config(self);
        match self.for_entity(name) {
            Some(entity) => {
                let processor = match entity.default_page_size {
                    Some(size) => processor.with_default_page_size(size),
                    None => processor,
                };
                processor.with_default_search_fields(entity.search_fields.iter().cloned())
            }
            None => processor,
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}
