//! Schema compilation.
//!
//! - `json`: JSON Schema validators with dialect selection and custom formats
//! - `yaml`: whole-file schema checks for single-document YAML files

pub mod json;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// One raw schema failure, before a pipeline turns it into an `ErrorDetail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON pointer to the failing instance (`""` for the document root).
    pub instance_path: String,
    pub message: String,
}

/// Supported JSON Schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaDraft {
    Draft04,
    #[default]
    Draft07,
    Draft201909,
    Draft202012,
}

impl SchemaDraft {
    /// Select a dialect by name, falling back to `draft-07` with a warning.
    #[must_use]
    pub fn select(name: &str) -> Self {
        name.parse().unwrap_or_else(|()| {
            let fallback = Self::default();
            warn!("json_schema_version '{name}' is not supported. Defaulting to '{fallback}'");
            fallback
        })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft04 => "draft-04",
            Self::Draft07 => "draft-07",
            Self::Draft201909 => "draft-2019-09",
            Self::Draft202012 => "draft-2020-12",
        }
    }

    #[must_use]
    pub fn to_jsonschema(self) -> jsonschema::Draft {
        match self {
            Self::Draft04 => jsonschema::Draft::Draft4,
            Self::Draft07 => jsonschema::Draft::Draft7,
            Self::Draft201909 => jsonschema::Draft::Draft201909,
            Self::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

impl FromStr for SchemaDraft {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft-04" => Ok(Self::Draft04),
            "draft-07" => Ok(Self::Draft07),
            "draft-2019-09" => Ok(Self::Draft201909),
            "draft-2020-12" => Ok(Self::Draft202012),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
