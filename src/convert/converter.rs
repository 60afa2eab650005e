//! Conversion engine.

use std::path::Path;

use crate::classify::{ClassifiedLine, LineClassifier, Role};
use crate::error::{Error, Result};
use crate::model::{DocumentBuilder, OutputDocument};
use crate::parser::{ErrorMode, LopdfSource, PageSource};
use crate::render::{DocumentWriter, DocxWriter};

use super::{output_path_for, output_path_in, ConvertOptions, ConvertReport, ConvertStats};

/// Converts PDF pages into a structured Word document.
///
/// A converter holds no per-conversion state and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    classifier: LineClassifier,
    writer: DocxWriter,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            classifier: LineClassifier::new(options.rules.clone()),
            writer: DocxWriter::new(options.style.clone()),
            options,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Classifier in use.
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Convert every page of `source` into a document.
    ///
    /// The source is closed before returning, on success and on failure.
    pub fn convert<S: PageSource>(&self, source: S) -> Result<OutputDocument> {
        self.convert_with_stats(source).map(|(doc, _)| doc)
    }

    /// Like [`convert`](Self::convert), also returning conversion counters.
    pub fn convert_with_stats<S: PageSource>(
        &self,
        source: S,
    ) -> Result<(OutputDocument, ConvertStats)> {
        let result = self.run(&source);
        source.close();
        result
    }

    /// Convert `input` and write the document to `output`.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConvertReport> {
        let (input, output) = (input.as_ref(), output.as_ref());

        let source = LopdfSource::open_with_layout(input, self.options.layout_options.clone())?;
        let (doc, stats) = self.convert_with_stats(source)?;
        self.writer.write(&doc, output)?;

        log::info!(
            "Converted {} -> {} ({} elements{})",
            input.display(),
            output.display(),
            doc.len(),
            if stats.fallback_used { ", raw text" } else { "" }
        );

        Ok(ConvertReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            stats,
        })
    }

    /// Convert `input`, deriving the output path from it.
    ///
    /// The output goes next to the input unless an output directory is set.
    pub fn convert_path<P: AsRef<Path>>(&self, input: P) -> Result<ConvertReport> {
        let input = input.as_ref();
        let output = match &self.options.output_dir {
            Some(dir) => output_path_in(input, dir),
            None => output_path_for(input),
        };
        self.convert_file(input, output)
    }

    /// Classify every line of `source` without building a document.
    ///
    /// Lines are grouped by page. Page errors, the raw-text fallback and
    /// closing the source behave exactly as in [`convert`](Self::convert);
    /// fallback lines are all [`Role::Paragraph`].
    pub fn classify<S: PageSource>(&self, source: S) -> Result<Vec<Vec<ClassifiedLine>>> {
        let result = self.classify_pages(&source);
        source.close();
        result
    }

    /// Open `input` and [`classify`](Self::classify) it.
    pub fn classify_path<P: AsRef<Path>>(&self, input: P) -> Result<Vec<Vec<ClassifiedLine>>> {
        let source =
            LopdfSource::open_with_layout(input.as_ref(), self.options.layout_options.clone())?;
        self.classify(source)
    }

    fn classify_pages<S: PageSource>(&self, source: &S) -> Result<Vec<Vec<ClassifiedLine>>> {
        let mut stats = ConvertStats {
            pages: source.page_count(),
            ..Default::default()
        };
        let mut pages = Vec::with_capacity(stats.pages);
        for page in 0..stats.pages {
            let blocks = self
                .recover(page, source.text_blocks(page), &mut stats)?
                .unwrap_or_default();
            let lines: Vec<ClassifiedLine> = blocks
                .iter()
                .flat_map(|block| self.classifier.classify_block(&block.text))
                .collect();
            pages.push(lines);
        }
        check_readable(&stats)?;

        if pages.iter().any(|lines| !lines.is_empty()) || !self.options.fallback || stats.pages == 0
        {
            return Ok(pages);
        }

        let mut stats = ConvertStats {
            pages: stats.pages,
            fallback_used: true,
            ..Default::default()
        };
        let mut pages = Vec::with_capacity(stats.pages);
        for page in 0..stats.pages {
            let raw = self
                .recover(page, source.raw_text(page), &mut stats)?
                .unwrap_or_default();
            let lines: Vec<ClassifiedLine> = raw
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| ClassifiedLine {
                    text: l.to_string(),
                    role: Role::Paragraph,
                })
                .collect();
            pages.push(lines);
        }
        check_readable(&stats)?;
        Ok(pages)
    }

    fn run<S: PageSource>(&self, source: &S) -> Result<(OutputDocument, ConvertStats)> {
        let (doc, stats) = self.structured_pass(source)?;
        if doc.content_count() > 0 || !self.options.fallback || stats.pages == 0 {
            return Ok((doc, stats));
        }

        log::warn!(
            "No text blocks found in {} pages, rebuilding from raw page text",
            stats.pages
        );
        self.fallback_pass(source)
    }

    fn structured_pass<S: PageSource>(&self, source: &S) -> Result<(OutputDocument, ConvertStats)> {
        let mut builder = DocumentBuilder::new(self.options.layout);
        let mut stats = ConvertStats {
            pages: source.page_count(),
            ..Default::default()
        };

        for page in 0..stats.pages {
            if page > 0 {
                builder.append_page_break();
            }

            let Some(blocks) = self.recover(page, source.text_blocks(page), &mut stats)? else {
                continue;
            };

            let before = stats.lines;
            for block in &blocks {
                self.append_block(&mut builder, &block.text, &mut stats);
            }
            log::debug!(
                "Page {}: {} blocks, {} lines",
                page,
                blocks.len(),
                stats.lines - before
            );
        }

        self.finish(builder, stats)
    }

    fn append_block(&self, builder: &mut DocumentBuilder, text: &str, stats: &mut ConvertStats) {
        let lines = self.classifier.classify_block(text);
        if lines.is_empty() {
            return;
        }
        stats.blocks += 1;

        for line in &lines {
            match line.role {
                Role::Heading => builder.append_heading(&line.text, 1),
                Role::Subheading => builder.append_heading(&line.text, 2),
                Role::CodeOrList => builder.append_paragraph(&line.text, true, true),
                Role::Paragraph => builder.append_paragraph(&line.text, false, false),
            }
            stats.record(line.role);
        }

        if lines.len() > 1 {
            builder.append_blank_separator();
            stats.separators += 1;
        }
    }

    fn fallback_pass<S: PageSource>(&self, source: &S) -> Result<(OutputDocument, ConvertStats)> {
        let mut builder = DocumentBuilder::fallback(self.options.layout);
        let mut stats = ConvertStats {
            pages: source.page_count(),
            fallback_used: true,
            ..Default::default()
        };

        for page in 0..stats.pages {
            let Some(raw) = self.recover(page, source.raw_text(page), &mut stats)? else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }

            if page > 0 {
                builder.append_page_break();
            }
            for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
                builder.append_paragraph(line, false, false);
                stats.record(Role::Paragraph);
            }
        }

        self.finish(builder, stats)
    }

    fn finish(
        &self,
        builder: DocumentBuilder,
        mut stats: ConvertStats,
    ) -> Result<(OutputDocument, ConvertStats)> {
        check_readable(&stats)?;

        let doc = builder.finish();
        stats.page_breaks = doc.page_break_count();
        log::debug!("{:?}", stats);
        Ok((doc, stats))
    }

    /// Apply the error mode to one page read.
    fn recover<T>(
        &self,
        page: usize,
        result: Result<T>,
        stats: &mut ConvertStats,
    ) -> Result<Option<T>> {
        let err = match result {
            Ok(value) => return Ok(Some(value)),
            Err(Error::PageRead { page, reason }) => Error::PageRead { page, reason },
            Err(e) => Error::PageRead {
                page,
                reason: e.to_string(),
            },
        };

        match self.options.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => {
                log::warn!("{}, treating page as empty", err);
                stats.failed_pages += 1;
                Ok(None)
            }
        }
    }
}

fn check_readable(stats: &ConvertStats) -> Result<()> {
    if stats.pages > 0 && stats.failed_pages == stats.pages {
        return Err(Error::NoReadablePages(stats.pages));
    }
    Ok(())
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}
