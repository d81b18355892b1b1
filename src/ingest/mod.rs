//! Discovery and decoding of compiled artifacts.
//!
//! The [`ArtifactLocator`] finds class files and archive containers under a
//! set of roots, and the [`ClassBuilder`] decodes everything it finds into a
//! [`ClassDataset`](crate::model::ClassDataset). Failures on individual files
//! or entries are collected as [`IngestError`]s; they never stop a run.

mod classfile;
mod decoder;
mod locator;
mod pipeline;

pub use classfile::ClassFileDecoder;
pub use decoder::{ArtifactDecoder, CountingDecoder, DecodeError};
pub use locator::{ARTIFACT_SUFFIX, ArtifactLocator, CONTAINER_SUFFIXES};
pub use pipeline::{ClassBuilder, Ingested, MAX_CONTAINER_DEPTH};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A registered root is neither a directory nor an archive container.
    #[error("Invalid directory or archive: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("Failed to decode {location}: {source}")]
    DecodeFailure {
        location: String,
        #[source]
        source: DecodeError,
    },

    /// The container could not be opened or enumerated; its unread entries
    /// were skipped.
    #[error("Failed to read container {location}: {source}")]
    ContainerReadFailure {
        location: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Skipped {location}: containers are only read one level deep")]
    NestedContainerSkipped { location: String },
}

impl IngestError {
    /// The file or archive entry the error refers to, for display.
    pub fn location(&self) -> String {
        match self {
            IngestError::InvalidInput(path) => path.display().to_string(),
            IngestError::DecodeFailure { location, .. }
            | IngestError::ContainerReadFailure { location, .. }
            | IngestError::NestedContainerSkipped { location } => location.clone(),
        }
    }
}
