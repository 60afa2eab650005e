//! Multi-file conversion.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Error;

use super::{ConvertReport, Converter};

const LISTED_SUCCESSES: usize = 5;
const LISTED_FAILURES: usize = 3;

/// Options for [`convert_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Convert files on the rayon thread pool
    pub parallel: bool,

    /// Set to stop before the next file starts
    pub cancel: Option<Arc<AtomicBool>>,
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable parallel conversion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Written successfully
    Converted(ConvertReport),
    /// Conversion or persistence failed
    Failed(Error),
    /// Not started because the batch was cancelled
    Skipped,
}

/// Outcome for one input, in input order.
#[derive(Debug)]
pub struct FileResult {
    /// Input PDF
    pub input: PathBuf,
    /// Outcome
    pub outcome: FileOutcome,
}

impl FileResult {
    /// Check if the file was converted.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Converted(_))
    }

    /// Check if the file failed.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed(_))
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

/// Per-file outcomes of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcomes in input order
    pub results: Vec<FileResult>,
}

impl BatchReport {
    /// Successful conversions.
    pub fn succeeded(&self) -> impl Iterator<Item = &ConvertReport> {
        self.results.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Converted(report) => Some(report),
            _ => None,
        })
    }

    /// Failed inputs with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Failed(err) => Some((r.input.as_path(), err)),
            _ => None,
        })
    }

    /// Number of successful conversions.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of failed conversions.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of inputs skipped by cancellation.
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Skipped))
            .count()
    }

    /// Check if every attempted file succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Multi-line listing of converted output names and failure causes.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        let succeeded: Vec<_> = self.succeeded().collect();
        if !succeeded.is_empty() {
            let _ = writeln!(out, "Successfully converted {} file(s):", succeeded.len());
            for report in succeeded.iter().take(LISTED_SUCCESSES) {
                let _ = writeln!(out, "  - {}", FileResult::file_name(&report.output));
            }
            if succeeded.len() > LISTED_SUCCESSES {
                let _ = writeln!(out, "  ... and {} more", succeeded.len() - LISTED_SUCCESSES);
            }
        }

        let failed: Vec<_> = self.failed().collect();
        if !failed.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "Failed to convert {} file(s):", failed.len());
            for (input, err) in failed.iter().take(LISTED_FAILURES) {
                let _ = writeln!(out, "  - {}: {}", FileResult::file_name(input), err);
            }
            if failed.len() > LISTED_FAILURES {
                let _ = writeln!(
                    out,
                    "  ... and {} more errors",
                    failed.len() - LISTED_FAILURES
                );
            }
        }

        let skipped = self.skipped_count();
        if skipped > 0 {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "Skipped {} file(s) after cancellation", skipped);
        }

        out
    }

    /// One-line verdict for the whole batch.
    pub fn status_line(&self) -> String {
        match (self.success_count(), self.failure_count()) {
            (0, 0) => "No files converted".to_string(),
            (ok, 0) => format!("All {ok} files converted successfully"),
            (0, _) => "All conversions failed".to_string(),
            (ok, failed) => format!("{ok} successful, {failed} failed"),
        }
    }
}

/// Convert each input independently; one failure never stops the others.
pub fn convert_batch<P>(converter: &Converter, inputs: &[P], options: &BatchOptions) -> BatchReport
where
    P: AsRef<Path> + Sync,
{
    convert_batch_with_progress(converter, inputs, options, |_| {})
}

/// Like [`convert_batch`], calling `on_done` after each file finishes.
pub fn convert_batch_with_progress<P, F>(
    converter: &Converter,
    inputs: &[P],
    options: &BatchOptions,
    on_done: F,
) -> BatchReport
where
    P: AsRef<Path> + Sync,
    F: Fn(&FileResult) + Sync,
{
    let run_one = |input: &P| {
        let input = input.as_ref();
        let outcome = if options.cancelled() {
            FileOutcome::Skipped
        } else {
            match converter.convert_path(input) {
                Ok(report) => FileOutcome::Converted(report),
                Err(err) => {
                    log::warn!("Failed to convert {}: {}", input.display(), err);
                    FileOutcome::Failed(err)
                }
            }
        };

        let result = FileResult {
            input: input.to_path_buf(),
            outcome,
        };
        on_done(&result);
        result
    };

    let results = if options.parallel {
        inputs.par_iter().map(run_one).collect()
    } else {
        inputs.iter().map(run_one).collect()
    };

    BatchReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertStats;

    fn converted(name: &str) -> FileResult {
        FileResult {
            input: PathBuf::from(format!("{name}.pdf")),
            outcome: FileOutcome::Converted(ConvertReport {
                input: PathBuf::from(format!("{name}.pdf")),
                output: PathBuf::from(format!("{name}.docx")),
                stats: ConvertStats::default(),
            }),
        }
    }

    fn failed(name: &str) -> FileResult {
        FileResult {
            input: PathBuf::from(format!("/in/{name}.pdf")),
            outcome: FileOutcome::Failed(Error::UnknownFormat),
        }
    }

    #[test]
    fn test_summary_truncates_lists() {
        let mut report = BatchReport::default();
        report
            .results
            .extend((0..7).map(|i| converted(&format!("ok{i}"))));
        report
            .results
            .extend((0..4).map(|i| failed(&format!("bad{i}"))));

        let summary = report.summary();
        assert!(summary.contains("Successfully converted 7 file(s):"));
        assert!(summary.contains("ok4.docx"));
        assert!(!summary.contains("ok5.docx"));
        assert!(summary.contains("... and 2 more\n"));
        assert!(summary.contains("Failed to convert 4 file(s):"));
        assert!(summary.contains("bad2.pdf: Unknown file format"));
        assert!(!summary.contains("bad3.pdf"));
        assert!(summary.contains("... and 1 more errors"));
    }

    #[test]
    fn test_status_line() {
        let mut report = BatchReport::default();
        report.results.push(converted("a"));
        report.results.push(converted("b"));
        assert_eq!(report.status_line(), "All 2 files converted successfully");

        report.results.push(failed("c"));
        assert_eq!(report.status_line(), "2 successful, 1 failed");

        let mut report = BatchReport::default();
        report.results.push(failed("c"));
        assert_eq!(report.status_line(), "All conversions failed");
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let not_pdf = dir.path().join("notes.pdf");
        std::fs::write(&not_pdf, b"plain text").unwrap();
        let missing = dir.path().join("missing.pdf");

        let report = convert_batch(
            &Converter::default(),
            &[not_pdf.clone(), missing.clone()],
            &BatchOptions::default(),
        );
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.results[0].input, not_pdf);
        assert_eq!(report.results[1].input, missing);
    }

    #[test]
    fn test_cancelled_batch_skips_everything() {
        let flag = Arc::new(AtomicBool::new(true));
        let options = BatchOptions::new().with_cancel(flag);
        let report = convert_batch(&Converter::default(), &["a.pdf", "b.pdf"], &options);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.failure_count(), 0);
        assert!(report.summary().contains("Skipped 2 file(s)"));
    }
}
