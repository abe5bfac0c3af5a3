//! `rw enhance` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rw_config::{CliSettings, Config};
use rw_enhance::{BlockEnhancer, DiagramRenderer, ScriptRenderer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the enhance command.
#[derive(Args)]
pub(crate) struct EnhanceArgs {
    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with built HTML pages (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Write enhanced pages here instead of rewriting them in place.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Leave diagram targets inert instead of emitting the renderer bootstrap.
    #[arg(long)]
    no_diagrams: bool,

    /// Enable verbose output (show per-page diagram hand-off logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl EnhanceArgs {
    /// Execute the enhance command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page pattern is invalid,
    /// or any page could not be enhanced.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            diagrams_enabled: self.no_diagrams.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.location("Source", &config.enhance_resolved.source_dir);
        output.location("Output", config.enhance_resolved.target_dir());

        let report = enhance_site(&config)?;

        for (path, err) in &report.failed {
            output.skipped(path, err);
        }

        if report.failed.is_empty() {
            output.summary(report.pages, report.blocks, report.diagrams);
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} of {} pages failed",
                report.failed.len(),
                report.pages + report.failed.len()
            )))
        }
    }
}

/// Totals from one enhancement run.
#[derive(Debug, Default)]
pub(crate) struct EnhanceReport {
    /// Pages written successfully.
    pub pages: usize,
    /// Code blocks that received a toolbar.
    pub blocks: usize,
    /// Diagram targets extracted.
    pub diagrams: usize,
    /// Pages that could not be enhanced.
    pub failed: Vec<(PathBuf, CliError)>,
}

/// Enhance every page matching the configured pattern.
///
/// A failing page is recorded in the report and does not stop the others.
pub(crate) fn enhance_site(config: &Config) -> Result<EnhanceReport, CliError> {
    let settings = &config.enhance_resolved;
    let source_dir = settings.source_dir.as_path();
    let target_dir = settings.target_dir();

    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "Source directory not found: {}",
            source_dir.display()
        )));
    }

    let enhancer = BlockEnhancer::new();
    let script_url = config
        .diagrams
        .enabled
        .then_some(config.diagrams.script_url.as_str());

    let mut report = EnhanceReport::default();
    for page in collect_pages(source_dir, &settings.pattern)? {
        let (path, outcome) = match page {
            Ok(source) => {
                let outcome = source
                    .strip_prefix(source_dir)
                    .map_err(|_| {
                        CliError::Validation(format!(
                            "{} is outside the source directory",
                            source.display()
                        ))
                    })
                    .and_then(|relative| {
                        enhance_file(&enhancer, &source, &target_dir.join(relative), script_url)
                    });
                (source, outcome)
            }
            Err(err) => (
                err.path().to_path_buf(),
                Err(std::io::Error::from(err).into()),
            ),
        };

        match outcome {
            Ok(stats) => {
                report.pages += 1;
                report.blocks += stats.blocks;
                report.diagrams += stats.diagrams;
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to enhance page");
                report.failed.push((path, err));
            }
        }
    }

    Ok(report)
}

/// Find pages under `source_dir` matching `pattern`, in path order.
fn collect_pages(
    source_dir: &Path,
    pattern: &str,
) -> Result<Vec<Result<PathBuf, glob::GlobError>>, CliError> {
    let escaped = glob::Pattern::escape(&source_dir.to_string_lossy());
    let pages = glob::glob(&format!("{escaped}/{pattern}"))?
        .filter(|entry| entry.as_ref().map_or(true, |path| path.is_file()))
        .collect();
    Ok(pages)
}

/// Counts for a single enhanced page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageStats {
    pub blocks: usize,
    pub diagrams: usize,
}

/// Enhance one page and write it to `target`.
fn enhance_file(
    enhancer: &BlockEnhancer,
    source: &Path,
    target: &Path,
    script_url: Option<&str>,
) -> Result<PageStats, CliError> {
    let html = std::fs::read_to_string(source)?;

    let mut renderer = script_url.map(ScriptRenderer::new);
    let page = enhancer.enhance_html(
        &html,
        renderer.as_mut().map(|r| r as &mut dyn DiagramRenderer),
    )?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, page.to_html())?;

    let stats = PageStats {
        blocks: page.controls().len(),
        diagrams: page.diagrams().len(),
    };
    tracing::debug!(
        path = %source.display(),
        blocks = stats.blocks,
        diagrams = stats.diagrams,
        "Enhanced page"
    );
    Ok(stats)
}
