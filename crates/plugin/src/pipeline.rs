//! Minimal host driver: runs files through stages one at a time.
//!
//! A failing file is reported on the error list and is not forwarded; files
//! that succeed (or are skipped) come out in input order.

use crate::extractor::{FrontMatterExtractor, Outcome};
use crate::file::SourceFile;
use log::debug;
use serde::Serialize;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type shared by all stages.
pub type StageError = Box<dyn StdError + Send + Sync>;

/// One processing step applied to every file.
pub trait Stage {
    /// Process `file` in place.
    fn process(&self, file: &mut SourceFile) -> Result<Outcome, StageError>;
}

impl<F> Stage for F
where
    F: Fn(&mut SourceFile) -> Result<Outcome, StageError>,
{
    fn process(&self, file: &mut SourceFile) -> Result<Outcome, StageError> {
        (self)(file)
    }
}

impl Stage for FrontMatterExtractor {
    fn process(&self, file: &mut SourceFile) -> Result<Outcome, StageError> {
        Ok(self.transform(file)?)
    }
}

/// A file that failed in some stage.
#[derive(Debug, Error)]
#[error("{}: {error}", .path.display())]
pub struct PipelineError {
    /// Path of the failed file.
    pub path: PathBuf,
    /// Error raised by the stage.
    #[source]
    pub error: StageError,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Files that entered the pipeline.
    pub total: usize,
    /// Files changed by at least one stage.
    pub transformed: usize,
    /// Files every stage passed through.
    pub skipped: usize,
    /// Files dropped because a stage failed.
    pub failed: usize,
}

/// Output of [`Pipeline::run`].
#[derive(Debug, Default)]
pub struct PipelineRun {
    /// Forwarded files, in input order.
    pub files: Vec<SourceFile>,
    /// Errors for dropped files.
    pub errors: Vec<PipelineError>,
    /// Counters.
    pub stats: RunStats,
}

impl PipelineRun {
    /// True when no file failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Ordered list of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    continue_on_error: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates an empty pipeline that keeps going after failures.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            continue_on_error: true,
        }
    }

    /// Appends a stage.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    /// Appends a stage, builder style.
    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.add_stage(stage);
        self
    }

    /// When false, the first failure ends the run and later files are not read.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Runs every file through every stage.
    pub fn run<I>(&self, files: I) -> PipelineRun
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut run = PipelineRun::default();

        for mut file in files {
            run.stats.total += 1;
            match self.process(&mut file) {
                Ok(Outcome::Transformed) => {
                    run.stats.transformed += 1;
                    run.files.push(file);
                }
                Ok(Outcome::Skipped) => {
                    run.stats.skipped += 1;
                    run.files.push(file);
                }
                Err(error) => {
                    debug!("{}: dropped after error: {error}", file.path.display());
                    run.stats.failed += 1;
                    run.errors.push(PipelineError {
                        path: file.path,
                        error,
                    });
                    if !self.continue_on_error {
                        break;
                    }
                }
            }
        }

        run
    }

    fn process(&self, file: &mut SourceFile) -> Result<Outcome, StageError> {
        let mut outcome = Outcome::Skipped;
        for stage in &self.stages {
            if stage.process(file)? == Outcome::Transformed {
                outcome = Outcome::Transformed;
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(file: &mut SourceFile) -> Result<Outcome, StageError> {
        file.set_contents("touched");
        Ok(Outcome::Transformed)
    }

    fn reject(file: &mut SourceFile) -> Result<Outcome, StageError> {
        Err(format!("cannot handle {}", file.path.display()).into())
    }

    fn files(names: &[&str]) -> Vec<SourceFile> {
        names.iter().map(|name| SourceFile::new(*name, "x")).collect()
    }

    #[test]
    fn empty_pipeline_skips_everything() {
        let run = Pipeline::new().run(files(&["a", "b"]));
        assert!(run.is_ok());
        assert_eq!(run.files.len(), 2);
        assert_eq!(
            run.stats,
            RunStats {
                total: 2,
                transformed: 0,
                skipped: 2,
                failed: 0
            }
        );
    }

    #[test]
    fn closures_are_stages() {
        let run = Pipeline::new().with_stage(touch).run(files(&["a"]));
        assert_eq!(run.files[0].text().as_deref(), Some("touched"));
        assert_eq!(run.stats.transformed, 1);
    }

    #[test]
    fn failure_stops_later_stages_for_that_file() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(reject);
        pipeline.add_stage(touch);
        let run = pipeline.run(files(&["a"]));
        assert!(run.files.is_empty());
        assert_eq!(run.errors.len(), 1);
        assert_eq!(run.errors[0].to_string(), "a: cannot handle a");
    }

    #[test]
    fn stop_on_first_error() {
        let only_b = |file: &mut SourceFile| -> Result<Outcome, StageError> {
            if file.path.ends_with("b") {
                reject(file)
            } else {
                touch(file)
            }
        };
        let run = Pipeline::new()
            .with_stage(only_b)
            .continue_on_error(false)
            .run(files(&["a", "b", "c"]));
        assert_eq!(run.stats.total, 2);
        assert_eq!(run.stats.failed, 1);
        assert_eq!(run.files.len(), 1);
    }
}
