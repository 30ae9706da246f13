//! Level files: a TOML list of `[[levels]]` tables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use edge_runner_core::{LevelDefinition, LevelError};
use edge_runner_world::World;
use serde::Deserialize;
use thiserror::Error;

/// Top-level layout of a level file.
#[derive(Debug, Deserialize)]
struct LevelFile {
    levels: Vec<LevelDefinition>,
}

/// Errors raised while loading a level file.
#[derive(Debug, Error)]
pub(crate) enum LevelFileError {
    /// The file could not be read.
    #[error("failed to read level file {}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the level layout.
    #[error("malformed level file")]
    Parse(#[from] toml::de::Error),
    /// The file lists no levels.
    #[error("level file contains no levels")]
    Empty,
    /// One of the levels fails validation.
    #[error("level {name} is invalid")]
    Invalid {
        /// Name of the offending level.
        name: String,
        /// Validation failure.
        #[source]
        source: LevelError,
    },
}

/// Parses and validates the levels contained in a TOML document.
pub(crate) fn parse_level_file(text: &str) -> Result<Vec<LevelDefinition>, LevelFileError> {
    let file: LevelFile = toml::from_str(text)?;
    if file.levels.is_empty() {
        return Err(LevelFileError::Empty);
    }

    for level in &file.levels {
        if let Err(source) = World::new(level) {
            return Err(LevelFileError::Invalid {
                name: level.name.clone(),
                source,
            });
        }
    }

    Ok(file.levels)
}

/// Reads, parses and validates a level file from disk.
pub(crate) fn load_level_file(path: &Path) -> Result<Vec<LevelDefinition>, LevelFileError> {
    let text = fs::read_to_string(path).map_err(|source| LevelFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = parse_level_file(&text)?;
    log::info!("loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}
