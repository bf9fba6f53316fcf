//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the alias
//! table and sheet layout from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::catalog::{AliasCatalog, SheetLayout};
use super::types::{FieldsConfig, LayoutConfig};

const BUILTIN_FIELDS: &str = include_str!("../../config/payroll/fields.yaml");
const BUILTIN_LAYOUT: &str = include_str!("../../config/payroll/layout.yaml");

/// Loads and provides access to ingestion configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── fields.yaml   # Canonical field aliases
/// └── layout.yaml   # Section markers, header search depth, title template
/// ```
///
/// The same two files are compiled into the crate and available through
/// [`ConfigLoader::builtin`].
///
/// # Example
///
/// ```no_run
/// use payroll_ingest::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/payroll")?;
/// println!("Header search depth: {}", config.layout().header_scan_limit());
/// # Ok::<(), payroll_ingest::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    catalog: AliasCatalog,
    layout: SheetLayout,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, is not valid YAML, or
    /// describes an inconsistent alias table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let fields = Self::load_yaml::<FieldsConfig>(&path.join("fields.yaml"))?;
        let layout = Self::load_yaml::<LayoutConfig>(&path.join("layout.yaml"))?;

        let loader = Self::from_parts(&fields, &layout)?;
        info!(path = %path.display(), "Loaded ingestion configuration");
        Ok(loader)
    }

    /// Returns the configuration compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        let fields = Self::parse_yaml::<FieldsConfig>(BUILTIN_FIELDS, "<builtin>/fields.yaml")?;
        let layout = Self::parse_yaml::<LayoutConfig>(BUILTIN_LAYOUT, "<builtin>/layout.yaml")?;
        Self::from_parts(&fields, &layout)
    }

    /// Compiles already parsed configuration.
    pub fn from_parts(fields: &FieldsConfig, layout: &LayoutConfig) -> EngineResult<Self> {
        Ok(Self {
            catalog: AliasCatalog::compile(&fields.fields)?,
            layout: SheetLayout::compile(layout)?,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the alias catalog.
    pub fn catalog(&self) -> &AliasCatalog {
        &self.catalog
    }

    /// Returns the sheet layout.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }
}

impl AliasCatalog {
    /// Returns the alias catalog compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        ConfigLoader::builtin().map(|loader| loader.catalog)
    }
}
