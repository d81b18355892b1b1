use crate::model::Class;
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read artifact: {0}")]
    Io(#[from] io::Error),
    #[error("Not a class file (magic 0x{0:08X})")]
    BadMagic(u32),
    #[error("Truncated class file")]
    Truncated,
    #[error("Malformed class file: {0}")]
    Malformed(String),
}

/// Turns one compiled-artifact byte stream into a [`Class`].
///
/// `Ok(None)` means the artifact was deliberately skipped and is not an error.
pub trait ArtifactDecoder: Send + Sync {
    fn decode(&self, reader: &mut dyn Read) -> Result<Option<Class>, DecodeError>;
}

/// Decoder that only counts the artifacts it is handed.
#[derive(Debug, Default)]
pub struct CountingDecoder {
    count: AtomicUsize,
}

impl CountingDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl ArtifactDecoder for CountingDecoder {
    fn decode(&self, _reader: &mut dyn Read) -> Result<Option<Class>, DecodeError> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }
}
