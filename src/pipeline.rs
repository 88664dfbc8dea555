//! Phase orchestration
//!
//! A full run goes: extract pages, segment pages into panels, stitch panels
//! into color strips, convert strips to grayscale, resize them, and package
//! the books. Each phase snapshots its input directory when it starts.
//! Pool phases run through [`run_phase`]; stitching runs on the calling
//! thread.

use std::path::{Path, PathBuf};

use crate::config::ComicConfig;
use crate::error::PipelineError;
use crate::external::{CommandExecutor, Job, jobs};
use crate::panels::{self, Panel};
use crate::parallel::{ProgressSink, available_parallelism, run_phase};
use crate::stitch::{self, StitchDecision, StitchExecutor, StitchLayout, StitchSummary};
use crate::workspace::{self, Workspace};

/// Archives written by [`Pipeline::build_books`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Books {
    pub color: PathBuf,
    pub bw: PathBuf,
    pub panels: PathBuf,
}

pub struct Pipeline<'a, E: CommandExecutor + ?Sized> {
    config: &'a ComicConfig,
    workspace: Workspace,
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> Pipeline<'a, E> {
    pub fn new(config: &'a ComicConfig, executor: &'a E) -> Self {
        Self {
            config,
            workspace: Workspace::new(&config.general.data_dir),
            executor,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn image_extension(&self) -> &str {
        &self.config.general.image_extension
    }

    /// Unpack the book's pages into `extracted_pages/`
    pub fn extract_pages(&self, book: &Path) -> Result<(), PipelineError> {
        tracing::info!("extracting pages from {}", book.display());
        let job = jobs::extract_book(&self.config.tools, book, &self.workspace.extracted_pages());
        self.executor.execute(&job)?;
        Ok(())
    }

    /// Cut every extracted page into panels, one job per page
    pub fn segment_pages(&self, progress: &dyn ProgressSink) -> Result<usize, PipelineError> {
        let pages_dir = self.workspace.extracted_pages();
        let panels_dir = self.workspace.panels();
        let pages = workspace::snapshot(&pages_dir, self.image_extension())?;

        let jobs: Vec<Job> = pages
            .iter()
            .map(|page| jobs::segment_page(&self.config.tools, &pages_dir.join(page), &panels_dir))
            .collect();

        self.pool_phase("segment", jobs, progress)
    }

    /// Probe every panel and plan the strips without writing anything
    pub fn plan_dir(&self, dir: &Path) -> Result<Vec<StitchDecision>, PipelineError> {
        let thresholds = self.config.stitch.thresholds();
        thresholds.validate()?;

        let names = workspace::snapshot(dir, self.image_extension())?;
        tracing::info!("probing {} panels in {}", names.len(), dir.display());

        let probed: Vec<Panel> =
            panels::probe_panels(self.executor, &self.config.tools, dir, &names)?;
        Ok(stitch::plan(&probed, &thresholds))
    }

    /// Plan the panels in `panels/` and write the strips to `stitched_color/`
    pub fn stitch(&self, progress: &dyn ProgressSink) -> Result<StitchSummary, PipelineError> {
        let source_dir = self.workspace.panels();
        let decisions = self.plan_dir(&source_dir)?;

        let layout = StitchLayout {
            source_dir,
            output_dir: self.workspace.stitched_color(),
            spacer: self.config.spacer_image(),
            geometry: self.config.stitch.montage_geometry.clone(),
        };

        let summary = StitchExecutor::new(self.executor, &self.config.tools, layout)
            .execute(&decisions, progress)?;

        tracing::info!(
            "stitched {} strips ({} kept, {} merged)",
            summary.strips(),
            summary.kept,
            summary.merged
        );
        Ok(summary)
    }

    /// Write a grayscale copy of every color strip into `stitched_bw/`
    pub fn convert_grayscale(&self, progress: &dyn ProgressSink) -> Result<usize, PipelineError> {
        let color_dir = self.workspace.stitched_color();
        let bw_dir = self.workspace.stitched_bw();
        let strips = workspace::snapshot(&color_dir, self.image_extension())?;
        let quality = self.config.grayscale.quality;

        let jobs: Vec<Job> = strips
            .iter()
            .map(|strip| jobs::grayscale(&self.config.tools, &color_dir.join(strip), &bw_dir, quality))
            .collect();

        self.pool_phase("grayscale", jobs, progress)
    }

    /// Resize every black & white strip in place for the target device
    pub fn resize_bw(&self, progress: &dyn ProgressSink) -> Result<usize, PipelineError> {
        let bw_dir = self.workspace.stitched_bw();
        let strips = workspace::snapshot(&bw_dir, self.image_extension())?;
        let resize = &self.config.resize;

        let jobs: Vec<Job> = strips
            .iter()
            .map(|strip| {
                jobs::resize(&self.config.tools, &bw_dir.join(strip), resize.width, resize.height)
            })
            .collect();

        self.pool_phase("resize", jobs, progress)
    }

    /// Package the color strips, the b/w strips and the raw panels
    pub fn build_books(&self, book_name: &str) -> Result<Books, PipelineError> {
        let assets = self.workspace.assets();
        let book_ext = &self.config.general.book_extension;
        let books = Books {
            color: assets.join(format!("{book_name}_color.{book_ext}")),
            bw: assets.join(format!("{book_name}_bw.{book_ext}")),
            panels: assets.join(format!("{book_name}_panels.zip")),
        };

        self.package(&books.color, &self.workspace.stitched_color())?;
        self.package(&books.bw, &self.workspace.stitched_bw())?;
        self.package(&books.panels, &self.workspace.panels())?;

        Ok(books)
    }

    fn package(&self, archive: &Path, dir: &Path) -> Result<(), PipelineError> {
        let files: Vec<PathBuf> = workspace::snapshot(dir, self.image_extension())?
            .iter()
            .map(|name| dir.join(name))
            .collect();

        tracing::info!("packaging {} files into {}", files.len(), archive.display());
        self.executor
            .execute(&jobs::package(&self.config.tools, archive, &files))?;
        Ok(())
    }

    fn pool_phase(
        &self,
        phase: &str,
        jobs: Vec<Job>,
        progress: &dyn ProgressSink,
    ) -> Result<usize, PipelineError> {
        // Sampled once per phase
        let parallelism = available_parallelism(&self.config.parallel);
        run_phase(phase, jobs, parallelism, self.executor, progress)
    }
}
