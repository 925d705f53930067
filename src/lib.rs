//! # goodpdf
//!
//! The core of the "Good PDF" viewer: everything the viewer does that is not
//! PDF parsing or pixel pushing.
//!
//! ## What this crate does
//!
//! 1. **Open a document**: parses the file with `lopdf` and checks it has a
//!    catalog and at least one page.
//! 2. **Collect attachments**: walks the `/EmbeddedFiles` name tree and every
//!    `/FileAttachment` annotation, merges both into one deduplicated list
//!    sorted by name.
//! 3. **Navigate and zoom**: keeps the page cursor and the zoom level, and
//!    computes fit-page and fill-width zoom factors for a given viewport.
//! 4. **Hand attachments out**: saves them to disk or opens them with the
//!    system's default application.
//!
//! ## Quick example
//!
//! ```no_run
//! use goodpdf::{Viewport, ViewerSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = ViewerSession::open("invoice.pdf")?;
//!
//! println!("{}", session.cursor().label());
//! session.fit_page(Viewport::new(800.0, 600.0))?;
//! println!("{}", session.status());
//!
//! for attachment in session.attachments() {
//!     println!("  {}", attachment.display_label());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod attachment;
mod collector;
mod launcher;
mod navigation;
mod session;
mod sources;
mod zoom;

pub use attachment::{find_attachment, Attachment};
pub use collector::{
    collect, collect_from_sources, AttachmentSource, Candidate, DuplicatePolicy,
    CONTENT_PREFIX_LEN, UNNAMED,
};
pub use launcher::open_with_system;
pub use navigation::PageCursor;
pub use session::ViewerSession;
pub use sources::{AnnotationSource, EmbeddedFileSource};
pub use zoom::{DisplayMode, PageSize, Viewport, ZoomState};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`ViewerSession`].
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Zoom factor applied when a document is first opened.
    pub initial_zoom: f64,

    /// Amount added or removed by a single zoom-in / zoom-out step.
    pub zoom_step: f64,

    /// Lower bound for stepped zooming.
    pub min_zoom: f64,

    /// Upper bound for stepped zooming.
    pub max_zoom: f64,

    /// Directory for the temporary copies created by
    /// [`ViewerSession::open_attachment`]. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Program used to open attachments instead of the platform default
    /// (`xdg-open`, `open` or `start`).
    pub opener: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 2.0,
            zoom_step: 0.5,
            min_zoom: 0.5,
            max_zoom: 5.0,
            temp_dir: None,
            opener: None,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A filesystem I/O error occurred (loading a PDF, saving an attachment).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    /// The document parsed but cannot be displayed.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// A single attachment could not be read. The collector consumes these
    /// and never returns them.
    #[error("Failed to extract attachment '{0}': {1}")]
    ExtractionError(String, String),

    /// No attachment with the requested name exists in the open document.
    #[error("No attachment named '{0}'")]
    AttachmentNotFound(String),

    /// An attachment name that does not reduce to a plain file name.
    #[error("Attachment name '{0}' has no usable file name")]
    UnsafeName(String),

    /// A page index past the end of the document was requested.
    #[error("Page {index} is out of range (document has {total} pages)")]
    PageOutOfRange { index: usize, total: usize },

    /// A page or viewport with a zero or negative dimension was supplied.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The external application could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
