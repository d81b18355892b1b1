use crate::ingest::{ArtifactDecoder, ArtifactLocator, CountingDecoder, IngestError};
use crate::model::{Class, ClassDataset};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// How many levels of containers-inside-containers are read. Containers found
/// below this depth are reported as skipped.
pub const MAX_CONTAINER_DEPTH: usize = 1;

/// Result of one ingestion run: everything that decoded, plus every failure.
#[derive(Debug, Default)]
pub struct Ingested {
    pub dataset: ClassDataset,
    pub errors: Vec<IngestError>,
}

#[derive(Default)]
struct PathOutcome {
    classes: Vec<Class>,
    errors: Vec<IngestError>,
}

/// Decodes every artifact the locator finds into a [`ClassDataset`].
pub struct ClassBuilder<'a> {
    decoder: &'a dyn ArtifactDecoder,
    locator: &'a ArtifactLocator,
}

impl<'a> ClassBuilder<'a> {
    pub fn new(decoder: &'a dyn ArtifactDecoder, locator: &'a ArtifactLocator) -> Self {
        Self { decoder, locator }
    }

    pub fn build(&self) -> Ingested {
        let mut dataset = ClassDataset::new();
        let errors = self.build_into(&mut dataset);
        Ingested { dataset, errors }
    }

    /// Populate `dataset` and return the failures encountered.
    ///
    /// Paths are decoded in parallel but merged in locator order, so a class
    /// name seen twice resolves to the later path and errors keep their order.
    pub fn build_into(&self, dataset: &mut ClassDataset) -> Vec<IngestError> {
        let paths: Vec<PathBuf> = self.locator.locate().into_iter().collect();

        let outcomes: Vec<PathOutcome> = paths
            .par_iter()
            .map(|path| self.build_path(path))
            .collect();

        let mut errors = Vec::new();
        for outcome in outcomes {
            for class in outcome.classes {
                dataset.add_class(class);
            }
            for error in outcome.errors {
                tracing::warn!(location = %error.location(), "{}", error);
                errors.push(error);
            }
        }

        tracing::debug!(
            paths = paths.len(),
            classes = dataset.len(),
            failures = errors.len(),
            "ingestion finished"
        );
        errors
    }

    /// Number of acceptable artifact entries under `locator`, without
    /// building any classes.
    pub fn count_classes(locator: &ArtifactLocator) -> usize {
        let counter = CountingDecoder::new();
        ClassBuilder::new(&counter, locator).build();
        counter.count()
    }

    fn build_path(&self, path: &Path) -> PathOutcome {
        let mut outcome = PathOutcome::default();
        let location = self.locator.relative_path(path).display().to_string();

        if self.locator.accepts_artifact(path) {
            match File::open(path) {
                Ok(file) => self.decode_entry(&mut BufReader::new(file), location, &mut outcome),
                Err(e) => outcome.errors.push(IngestError::DecodeFailure {
                    location,
                    source: e.into(),
                }),
            }
        } else if self.locator.accepts_container(path) {
            let archive = File::open(path)
                .map_err(ZipError::from)
                .and_then(|file| ZipArchive::new(BufReader::new(file)));
            match archive {
                Ok(mut archive) => self.read_container(&mut archive, 0, &location, &mut outcome),
                Err(source) => outcome
                    .errors
                    .push(IngestError::ContainerReadFailure { location, source }),
            }
        } else {
            outcome
                .errors
                .push(IngestError::InvalidInput(path.to_path_buf()));
        }

        outcome
    }

    fn decode_entry(&self, reader: &mut dyn Read, location: String, outcome: &mut PathOutcome) {
        match self.decoder.decode(reader) {
            Ok(Some(class)) => outcome.classes.push(class),
            Ok(None) => {}
            Err(source) => outcome
                .errors
                .push(IngestError::DecodeFailure { location, source }),
        }
    }

    /// Enumerate a container once, in entry order. `depth` is 0 for a
    /// container on disk and grows by one per level of nesting.
    fn read_container<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        depth: usize,
        location: &str,
        outcome: &mut PathOutcome,
    ) {
        for index in 0..archive.len() {
            let name = match archive.name_for_index(index) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let entry_location = format!("{}!/{}", location, name);

            // A bad entry only loses itself.
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(source) => {
                    outcome.errors.push(IngestError::ContainerReadFailure {
                        location: entry_location,
                        source,
                    });
                    continue;
                }
            };

            if self.locator.accepts_artifact_name(&name) {
                self.decode_entry(&mut entry, entry_location, outcome);
            } else if self.locator.accepts_container_name(&name) {
                if depth >= MAX_CONTAINER_DEPTH {
                    outcome.errors.push(IngestError::NestedContainerSkipped {
                        location: entry_location,
                    });
                    continue;
                }

                // Nested containers are buffered so entries written with a
                // trailing data descriptor can still be enumerated.
                let mut bytes = Vec::new();
                let nested = entry
                    .read_to_end(&mut bytes)
                    .map_err(ZipError::from)
                    .and_then(|_| ZipArchive::new(Cursor::new(bytes)));
                match nested {
                    Ok(mut nested) => {
                        self.read_container(&mut nested, depth + 1, &entry_location, outcome)
                    }
                    Err(source) => outcome.errors.push(IngestError::ContainerReadFailure {
                        location: entry_location,
                        source,
                    }),
                }
            }
        }
    }
}
