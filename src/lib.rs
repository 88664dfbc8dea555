//! # Comic-San - comic books for small e-book readers
//!
//! Comic-San cuts the pages of a comic book into panels, stitches narrow
//! panels into strips that fit a small screen, and packages color and
//! black & white books from the strips. Image work is delegated to external
//! tools (ImageMagick, a panel segmenter, zip); Comic-San plans the work and
//! runs it across a pool of worker threads.
//!
//! ## Quick Start
//!
//! ```bash
//! # Put one .cbz book into the data directory, then
//! comic-san run --data-dir ./data
//!
//! # Preview how the extracted panels would be stitched
//! comic-san plan ./data/panels
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod panels;
pub mod parallel;
pub mod pipeline;
pub mod stitch;
pub mod workspace;

pub use cli::{Cli, Output};
pub use config::ComicConfig;
pub use error::PipelineError;
pub use pipeline::Pipeline;
