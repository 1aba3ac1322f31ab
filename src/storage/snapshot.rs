//! Column snapshots: JSON persistence of a sediment column between runs.
//!
//! A [`ColumnSnapshot`] stores the format version, the path of the constants
//! file the column was built from (if any), the constants themselves, the
//! measurement type, and the ordered layer records (bottom first). Restoring
//! rebuilds and validates the bundle, then checks that the layers stack
//! contiguously.
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    accretion::{
        core::{params::ParameterBundle, units::Measurement},
        models::{column::SedimentCore, layer::Layer},
    },
    storage::{
        constants::ConstantsFile,
        errors::{StorageError, StorageResult},
    },
};

/// Current snapshot layout version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub format_version: u32,
    pub source: Option<PathBuf>,
    pub constants: ConstantsFile,
    pub measurement: Measurement,
    pub layers: Vec<Layer>,
}

impl ColumnSnapshot {
    /// Record `core`, remembering the constants file it came from.
    pub fn capture(core: &SedimentCore, source: Option<PathBuf>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            source,
            constants: ConstantsFile::from_bundle(core.params()),
            measurement: core.measurement(),
            layers: core.layers().to_vec(),
        }
    }

    /// Rebuild the column.
    ///
    /// Errors
    /// ------
    /// - `StorageError::UnsupportedFormat` for another format version.
    /// - `StorageError::Param` for invalid stored constants.
    /// - `StorageError::Accretion` for an empty or non-contiguous stack.
    pub fn restore(self) -> StorageResult<SedimentCore> {
        if self.format_version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedFormat {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let params = ParameterBundle::try_from(&self.constants)?;
        Ok(SedimentCore::from_layers(Arc::new(params), self.measurement, self.layers)?)
    }

    /// Read a snapshot file.
    pub fn read(path: &Path) -> StorageResult<Self> {
        let file = File::open(path)
            .map_err(|e| StorageError::Io { path: path.to_path_buf(), message: e.to_string() })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Json { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> StorageResult<()> {
        let file = File::create(path)
            .map_err(|e| StorageError::Io { path: path.to_path_buf(), message: e.to_string() })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| StorageError::Json { path: path.to_path_buf(), message: e.to_string() })
    }
}

/// Save `core` to `path`.
pub fn save(core: &SedimentCore, source: Option<PathBuf>, path: &Path) -> StorageResult<()> {
    ColumnSnapshot::capture(core, source).write(path)
}

/// Load a column from `path`.
pub fn load(path: &Path) -> StorageResult<SedimentCore> {
    ColumnSnapshot::read(path)?.restore()
}
