//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read environment variables or files; they
//! work from the `CoreConfig` they were given.

use crate::guidelines::{GuidelineRegistry, GuidelineTable};
use crate::region::{RegionDirectory, RegionResolver};
use crate::CoreResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    guideline_table: Arc<GuidelineTable>,
    region_directory: Arc<RegionDirectory>,
}

impl CoreConfig {
    pub fn new(guideline_table: GuidelineTable, region_directory: RegionDirectory) -> Self {
        Self {
            guideline_table: Arc::new(guideline_table),
            region_directory: Arc::new(region_directory),
        }
    }

    /// Resolve configuration from optional file overrides.
    ///
    /// Without a guideline file the built-in table is used; without a region-name file the
    /// region directory is empty and every detected region uses the guideline fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read or does not validate.
    pub fn from_overrides(
        guidelines_file: Option<PathBuf>,
        region_names_file: Option<PathBuf>,
    ) -> CoreResult<Self> {
        let guideline_table = match guidelines_file {
            Some(path) => load_guideline_table(&path)?,
            None => GuidelineTable::builtin(),
        };

        let region_directory = match region_names_file {
            Some(path) => RegionDirectory::from_path(&path)?,
            None => {
                tracing::warn!(
                    "no region name directory configured; detected regions will use the global guideline fallback"
                );
                RegionDirectory::new()
            }
        };

        Ok(Self::new(guideline_table, region_directory))
    }

    pub fn guideline_registry(&self) -> GuidelineRegistry {
        GuidelineRegistry::new(self.guideline_table.clone())
    }

    pub fn region_directory(&self) -> &RegionDirectory {
        &self.region_directory
    }

    pub fn region_resolver(&self) -> RegionResolver {
        RegionResolver::new()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(GuidelineTable::builtin(), RegionDirectory::new())
    }
}

fn load_guideline_table(path: &Path) -> CoreResult<GuidelineTable> {
    let table = GuidelineTable::from_path(path)?;
    tracing::info!(
        path = %path.display(),
        regions = table.regions().count(),
        "loaded guideline table"
    );
    Ok(table)
}
