//! Translation of whole controller files.
//!
//! The [`Generator`] asks a [`DescriptorSource`] for the descriptor JSON of each file,
//! synthesizes one client class per descriptor and formats the result. Several files
//! can be translated at once; their results always come back in input order.

use crate::class::synthesize_class;
use crate::config::GeneratorConfig;
use crate::descriptor::{parse_descriptors, ClassDescriptor};
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::error::{Error, Result};
use crate::external::DescriptorSource;
use crate::formatter::format_source;
use log::{debug, info, warn};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Generated source for a set of class descriptors.
#[derive(Debug, Default)]
pub struct Translation {
    /// Formatted source of every class that could be generated
    pub source: String,
    /// Names of the generated classes, in input order
    pub classes: Vec<String>,
    /// Classes that could not be generated
    pub failures: Vec<Error>,
}

/// What translating one file produced.
#[derive(Debug)]
pub enum FileOutcome {
    Translated(Translation),
    /// The parser found no classes; not an error
    NoClasses,
}

/// Result of one file of a batch.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<FileOutcome>,
}

/// How a batch reacts to a failing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Report every file; failures do not affect the others
    #[default]
    Partial,
    /// The first failing file (in input order) fails the whole batch
    FailFast,
}

/// Drives the translation of controller files.
pub struct Generator {
    source: Box<dyn DescriptorSource>,
    config: GeneratorConfig,
    sink: Box<dyn DiagnosticSink>,
    max_workers: usize,
}

impl Generator {
    /// Create a generator with the default configuration and a sink that drops diagnostics
    pub fn new(source: impl DescriptorSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            config: GeneratorConfig::default(),
            sink: Box::new(NoopSink),
            max_workers: default_workers(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Route diagnostics to `sink`
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run at most `workers` parser processes at a time in [`translate_files`](Self::translate_files)
    ///
    /// Zero is treated as one.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Generate and format the client classes for already parsed descriptors.
    ///
    /// A class without a base route is recorded in [`Translation::failures`] and
    /// skipped; the remaining classes are still generated. Only the first generated
    /// class carries the import preamble.
    pub fn translate_descriptors(&self, classes: &[ClassDescriptor]) -> Translation {
        self.synthesize(classes, true)
    }

    fn synthesize(&self, classes: &[ClassDescriptor], include_preamble: bool) -> Translation {
        let mut translation = Translation::default();
        let mut blocks = Vec::new();

        for class in classes {
            match synthesize_class(class, &self.config, include_preamble && blocks.is_empty()) {
                Ok(synthesized) => {
                    for diagnostic in synthesized.diagnostics {
                        self.sink.report(diagnostic);
                    }
                    translation.classes.push(synthesized.name);
                    blocks.push(synthesized.text);
                }
                Err(e) => {
                    warn!("Skipping class {}: {}", class.name, e);
                    translation.failures.push(e);
                }
            }
        }

        if !blocks.is_empty() {
            translation.source = format_source(&blocks.join("\n\n"), &self.config.format);
        }
        translation
    }

    /// Run the parser on one file and translate what it reports.
    ///
    /// # Errors
    ///
    /// Parser failures and malformed parser output are returned unchanged; they are
    /// never retried.
    pub fn translate_file(&self, path: &Path) -> Result<FileOutcome> {
        self.translate_one(path, true)
    }

    fn translate_one(&self, path: &Path, include_preamble: bool) -> Result<FileOutcome> {
        info!("Parsing: {}", path.display());
        let json = self.source.descriptors_json(path)?;
        let classes = parse_descriptors(&json)?;

        if classes.is_empty() {
            info!("No classes found in {}", path.display());
            return Ok(FileOutcome::NoClasses);
        }

        let translation = self.synthesize(&classes, include_preamble);
        info!(
            "Generated {} {} from {}",
            translation.classes.len(),
            if translation.classes.len() == 1 { "class" } else { "classes" },
            path.display()
        );
        Ok(FileOutcome::Translated(translation))
    }

    /// Translate several files concurrently, one parser process per file.
    ///
    /// At most [`with_max_workers`](Self::with_max_workers) parsers run at once.
    /// Reports are returned in the order of `paths`, whatever order the parsers finish
    /// in. The batch is one output unit: only the first generated class of the whole
    /// batch carries the import preamble.
    ///
    /// # Errors
    ///
    /// With [`BatchPolicy::FailFast`], the first failing file in input order is returned
    /// as [`Error::File`] and all other results are discarded. With
    /// [`BatchPolicy::Partial`] this never fails.
    pub fn translate_files(&self, paths: &[PathBuf], policy: BatchPolicy) -> Result<Vec<FileReport>> {
        let workers = self.max_workers.min(paths.len()).max(1);
        debug!(
            "Translating {} files with {} workers ({:?})",
            paths.len(),
            workers,
            policy
        );

        let next = AtomicUsize::new(0);
        let mut outcomes: Vec<Option<Result<FileOutcome>>> = paths.iter().map(|_| None).collect();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(path) = paths.get(index) else {
                                break;
                            };
                            done.push((index, self.translate_one(path, false)));
                        }
                        done
                    })
                })
                .collect();

            for handle in handles {
                let done = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                for (index, outcome) in done {
                    outcomes[index] = Some(outcome);
                }
            }
        });

        let mut reports: Vec<FileReport> = paths
            .iter()
            .zip(outcomes)
            .filter_map(|(path, outcome)| {
                outcome.map(|outcome| FileReport {
                    path: path.clone(),
                    outcome,
                })
            })
            .collect();
        self.attach_preamble(&mut reports);

        match policy {
            BatchPolicy::Partial => Ok(reports),
            BatchPolicy::FailFast => {
                let mut checked = Vec::with_capacity(reports.len());
                for report in reports {
                    match report.outcome {
                        Err(e) => return Err(e.in_file(&report.path)),
                        Ok(outcome) => checked.push(FileReport {
                            path: report.path,
                            outcome: Ok(outcome),
                        }),
                    }
                }
                Ok(checked)
            }
        }
    }

    /// Put the import preamble in front of the first report that generated a class
    fn attach_preamble(&self, reports: &mut [FileReport]) {
        let first = reports.iter_mut().find_map(|report| match &mut report.outcome {
            Ok(FileOutcome::Translated(translation)) if !translation.classes.is_empty() => {
                Some(translation)
            }
            _ => None,
        });
        if let Some(translation) = first {
            let text = format!("{}\n\n{}", self.config.preamble(), translation.source);
            translation.source = format_source(&text, &self.config.format);
        }
    }
}

/// Parser processes a batch may run at once by default
fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
