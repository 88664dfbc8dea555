//! Job builders for the external tools
//!
//! ImageMagick does the pixel work, kumiko cuts pages into panels, and
//! zip/unzip handle the book archives. Program names come from
//! [`ToolsConfig`] so a different install location is a config change.

use std::path::Path;

use super::command::Job;
use crate::config::ToolsConfig;

/// Prints the pixel width of an image as its only output
pub fn width_probe(tools: &ToolsConfig, image: &Path) -> Job {
    Job::new(&tools.magick)
        .args(["identify", "-format", "%w"])
        .arg(image)
}

/// Lays out `first`, the spacer and `second` side by side into `output`
pub fn merge(
    tools: &ToolsConfig,
    first: &Path,
    spacer: &Path,
    second: &Path,
    geometry: &str,
    output: &Path,
) -> Job {
    Job::new(&tools.magick)
        .arg("montage")
        .arg(first)
        .arg(spacer)
        .arg(second)
        .args(["-geometry", geometry])
        .arg(output)
}

/// Copies a panel unchanged into `output_dir`
pub fn keep(tools: &ToolsConfig, panel: &Path, output_dir: &Path) -> Job {
    Job::new(&tools.copy).arg(panel).arg(output_dir)
}

/// Cuts one page into panel images inside `panels_dir`
pub fn segment_page(tools: &ToolsConfig, page: &Path, panels_dir: &Path) -> Job {
    Job::new(&tools.segmenter)
        .arg("-i")
        .arg(page)
        .arg("-s")
        .arg(panels_dir)
}

/// Writes a grayscale copy of `image` into `output_dir`
pub fn grayscale(tools: &ToolsConfig, image: &Path, output_dir: &Path, quality: u8) -> Job {
    Job::new(&tools.magick)
        .args(["mogrify", "-path"])
        .arg(output_dir)
        .args([
            "-intensity",
            "average",
            "-colorspace",
            "gray",
            "-strip",
            "-interlace",
            "Plane",
            "-quality",
        ])
        .arg(format!("{quality}%"))
        .arg(image)
}

/// Resizes `image` in place to fit within `width`x`height`
pub fn resize(tools: &ToolsConfig, image: &Path, width: u32, height: u32) -> Job {
    Job::new(&tools.magick)
        .args(["mogrify", "-resize"])
        .arg(format!("{width}x{height}"))
        .arg(image)
}

/// Extracts every page of a book archive, flattened, into `pages_dir`
pub fn extract_book(tools: &ToolsConfig, book: &Path, pages_dir: &Path) -> Job {
    Job::new(&tools.unzip)
        .arg("-j")
        .arg(book)
        .arg("-d")
        .arg(pages_dir)
}

/// Packs `files` into `archive`, flattened
pub fn package<P: AsRef<Path>>(tools: &ToolsConfig, archive: &Path, files: &[P]) -> Job {
    Job::new(&tools.zip)
        .arg("-j")
        .arg(archive)
        .args(files.iter().map(|f| f.as_ref().as_os_str()))
}
