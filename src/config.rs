//! Configuration file.
//!
//! A TOML file maps tables and columns to transform specs:
//!
//! ```toml
//! view_suffix = "anonymized"
//!
//! [tables.users.columns.email]
//! kind = "email"
//! hash_length = 12
//!
//! [tables.users.columns.name]
//! kind = "static"
//! value = "anonymous"
//! data_type = "TEXT"
//! ```

use crate::error::ShroudError;
use crate::generator::{DEFAULT_VIEW_SUFFIX, Generator};
use crate::postgres::{
    Condition, Email, Null, Operator, Overlay, PostgresQueryBuilder, RegexReplace, RemoveJsonKeys,
    Sha256, TextScramble, When,
};
use crate::postgres::email::DEFAULT_HASH_LENGTH;
use crate::table::Table;
use crate::transform::{Noop, Static, Transform};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Suffix of the generated view names.
    #[serde(default = "default_view_suffix")]
    pub view_suffix: String,

    /// Database connection URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Column transforms, per table.
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,
}

fn default_view_suffix() -> String {
    DEFAULT_VIEW_SUFFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view_suffix: default_view_suffix(),
            database_url: None,
            tables: BTreeMap::new(),
        }
    }
}

/// Column transforms of one table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default)]
    pub columns: BTreeMap<String, TransformSpec>,
}

/// Declarative form of a transform, selected by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TransformSpec {
    Noop,
    Static {
        value: String,
        data_type: String,
    },
    Null,
    Overlay {
        pattern: String,
        start: u32,
        count: usize,
    },
    RegexReplace {
        pattern: String,
        replacement: String,
    },
    RemoveJsonKeys {
        keys: Vec<String>,
    },
    Sha256 {
        length: usize,
    },
    Email {
        #[serde(default = "default_hash_length")]
        hash_length: usize,
        #[serde(default)]
        anonymize_domain: bool,
    },
    TextScramble,
    Condition {
        data_type: String,
        default: Box<TransformSpec>,
        #[serde(default)]
        conditions: Vec<WhenSpec>,
    },
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

/// Declarative form of a [`When`] branch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhenSpec {
    pub column: String,
    pub operator: Operator,
    pub value: String,
    pub data_type: String,
    pub transform: TransformSpec,
}

impl TransformSpec {
    /// Instantiate the transform.
    ///
    /// Text scrambles draw their permutation here, once per call.
    pub fn build(&self) -> Box<dyn Transform> {
        match self {
            TransformSpec::Noop => Box::new(Noop),
            TransformSpec::Static { value, data_type } => Box::new(Static::new(value, data_type)),
            TransformSpec::Null => Box::new(Null),
            TransformSpec::Overlay {
                pattern,
                start,
                count,
            } => Box::new(Overlay::new(pattern, *start, *count)),
            TransformSpec::RegexReplace {
                pattern,
                replacement,
            } => Box::new(RegexReplace::new(pattern, replacement)),
            TransformSpec::RemoveJsonKeys { keys } => Box::new(RemoveJsonKeys::new(keys.clone())),
            TransformSpec::Sha256 { length } => Box::new(Sha256::new(*length)),
            TransformSpec::Email {
                hash_length,
                anonymize_domain,
            } => Box::new(
                Email::builder()
                    .hash_length(*hash_length)
                    .anonymize_domain(*anonymize_domain)
                    .build(),
            ),
            TransformSpec::TextScramble => Box::new(TextScramble::new()),
            TransformSpec::Condition {
                data_type,
                default,
                conditions,
            } => {
                let conditions = conditions.iter().map(WhenSpec::build).collect();
                Box::new(Condition::new(data_type, default.build(), conditions))
            }
        }
    }

    /// Short name of the transform, as written in `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformSpec::Noop => "noop",
            TransformSpec::Static { .. } => "static",
            TransformSpec::Null => "null",
            TransformSpec::Overlay { .. } => "overlay",
            TransformSpec::RegexReplace { .. } => "regex_replace",
            TransformSpec::RemoveJsonKeys { .. } => "remove_json_keys",
            TransformSpec::Sha256 { .. } => "sha256",
            TransformSpec::Email { .. } => "email",
            TransformSpec::TextScramble => "text_scramble",
            TransformSpec::Condition { .. } => "condition",
        }
    }
}

impl WhenSpec {
    fn build(&self) -> When {
        When::new(
            &self.column,
            self.operator,
            &self.value,
            &self.data_type,
            self.transform.build(),
        )
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ShroudError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ShroudError::Config(format!("Failed to parse configuration: {}", e)))?;
        if config.view_suffix.is_empty() {
            return Err(ShroudError::Config("view_suffix must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShroudError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded configuration for {} table(s) from {}",
            config.tables.len(),
            path.display()
        );
        Ok(config)
    }

    /// `<config dir>/shroud/shroud.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shroud").join("shroud.toml"))
    }

    /// A PostgreSQL generator holding this configuration.
    pub fn to_generator(&self) -> Generator {
        let mut builder = Generator::builder(PostgresQueryBuilder).view_suffix(&self.view_suffix);
        for (name, table) in &self.tables {
            builder = builder.table(name, table.build());
        }
        builder.build()
    }
}

impl TableConfig {
    pub fn build(&self) -> Table {
        self.columns
            .iter()
            .fold(Table::builder(), |builder, (column, spec)| {
                builder.boxed(column, spec.build())
            })
            .build()
    }
}
