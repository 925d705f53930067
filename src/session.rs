use crate::attachment::find_attachment;
use crate::launcher::open_with_system;
use crate::zoom::{PageSize, Viewport, ZoomState};
use crate::{collector, Attachment, PageCursor, Result, ViewerConfig, ViewerError};
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ── ViewerSession ────────────────────────────────────────────────────────────

/// One opened document and everything the viewer knows about it.
///
/// The attachment list is computed once when the document is opened and lives
/// as long as the session. Closing the document means dropping the session;
/// opening another one means creating a new session.
///
/// # Opening a document
///
/// ```no_run
/// use goodpdf::{ViewerConfig, ViewerSession};
///
/// // From a file path
/// let s = ViewerSession::open("report.pdf").unwrap();
///
/// // From an in-memory buffer
/// let bytes = std::fs::read("report.pdf").unwrap();
/// let s = ViewerSession::from_bytes(&bytes).unwrap();
///
/// // With custom configuration
/// let cfg = ViewerConfig {
///     initial_zoom: 1.0,
///     max_zoom: 8.0,
///     ..Default::default()
/// };
/// let s = ViewerSession::open_with_config("report.pdf", cfg).unwrap();
/// ```
pub struct ViewerSession {
    document: Document,
    path: Option<PathBuf>,
    config: ViewerConfig,
    attachments: Vec<Attachment>,
    cursor: PageCursor,
    zoom: ZoomState,
}

impl ViewerSession {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Open a PDF from the file system with the default configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, ViewerConfig::default())
    }

    /// Open a PDF from the file system with a custom [`ViewerConfig`].
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: ViewerConfig) -> Result<Self> {
        let path = path.as_ref();
        let document = Document::load(path)?;
        let mut session = Self::from_document(document, config)?;
        session.path = Some(path.to_path_buf());
        info!(path = %path.display(), pages = session.page_count(), "opened document");
        Ok(session)
    }

    /// Open a PDF held in memory with the default configuration.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_config(data, ViewerConfig::default())
    }

    pub fn from_bytes_with_config(data: &[u8], config: ViewerConfig) -> Result<Self> {
        Self::from_document(Document::load_mem(data)?, config)
    }

    /// Wrap an already parsed document.
    ///
    /// Fails with [`ViewerError::InvalidPdf`] when the document has no catalog
    /// or no pages, since there would be nothing to show.
    pub fn from_document(document: Document, config: ViewerConfig) -> Result<Self> {
        document
            .catalog()
            .map_err(|e| ViewerError::InvalidPdf(format!("missing or invalid catalog: {e}")))?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(ViewerError::InvalidPdf("document has no pages".into()));
        }

        let attachments = collector::collect(&document);
        if attachments.is_empty() {
            info!("No attachments found");
        } else {
            info!("Found {} attachments", attachments.len());
        }

        Ok(Self {
            zoom: ZoomState::new(&config),
            cursor: PageCursor::new(page_count),
            document,
            path: None,
            config,
            attachments,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// File the document was loaded from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Deduplicated attachments, sorted case-insensitively by name.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn page_count(&self) -> usize {
        self.cursor.total()
    }

    /// Status-bar text for the current zoom.
    pub fn status(&self) -> String {
        self.zoom.status_message()
    }

    // ── Pages ────────────────────────────────────────────────────────────────

    /// Size in points of the zero-based page `index`, from its `/MediaBox`
    /// (inherited from the page tree when the page has none).
    pub fn page_size(&self, index: usize) -> Result<PageSize> {
        let page_id = self.page_id(index)?;
        let media_box = inherited_entry(&self.document, page_id, b"MediaBox")
            .ok_or_else(|| ViewerError::InvalidPdf(format!("page {} has no /MediaBox", index + 1)))?;
        media_box_size(&self.document, media_box)
    }

    pub fn current_page_size(&self) -> Result<PageSize> {
        self.page_size(self.cursor.current())
    }

    pub fn next_page(&mut self) -> bool {
        self.cursor.forward()
    }

    pub fn previous_page(&mut self) -> bool {
        self.cursor.back()
    }

    pub fn go_to_page(&mut self, index: usize) -> Result<()> {
        self.cursor.go_to(index)
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        let total = self.page_count();
        // get_pages() is keyed by 1-based page number
        self.document
            .get_pages()
            .get(&(index as u32 + 1))
            .copied()
            .ok_or(ViewerError::PageOutOfRange { index, total })
    }

    // ── Zoom ─────────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    /// Zoom so the current page's width fills `viewport`.
    pub fn fill_page(&mut self, viewport: Viewport) -> Result<f64> {
        let page = self.current_page_size()?;
        self.zoom.fill(page, viewport)
    }

    /// Zoom so the whole current page fits inside `viewport`.
    pub fn fit_page(&mut self, viewport: Viewport) -> Result<f64> {
        let page = self.current_page_size()?;
        self.zoom.fit(page, viewport)
    }

    /// Pixel size the current page renders at.
    pub fn rendered_size(&self) -> Result<(u32, u32)> {
        Ok(self.zoom.scaled(self.current_page_size()?))
    }

    // ── Attachments ──────────────────────────────────────────────────────────

    pub fn attachment(&self, name: &str) -> Result<&Attachment> {
        find_attachment(&self.attachments, name)
            .ok_or_else(|| ViewerError::AttachmentNotFound(name.to_string()))
    }

    /// Write the attachment called `name` to `dest`.
    pub fn save_attachment<P: AsRef<Path>>(&self, name: &str, dest: P) -> Result<()> {
        let dest = dest.as_ref();
        self.attachment(name)?.save_as(dest)?;
        info!(%name, dest = %dest.display(), "saved attachment");
        Ok(())
    }

    /// Open the attachment called `name` with the system's default
    /// application. Returns the temporary copy handed to it.
    pub fn open_attachment(&self, name: &str) -> Result<PathBuf> {
        open_with_system(self.attachment(name)?, &self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────────

/// Look `key` up on the page, then on its `/Parent` chain.
fn inherited_entry<'a>(document: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = page_id;
    // bounded so a cyclic /Parent chain cannot loop forever
    for _ in 0..64 {
        let dict = document.get_object(current).and_then(Object::as_dict).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    debug!(?page_id, "page tree too deep while resolving inherited entry");
    None
}

fn media_box_size(document: &Document, media_box: &Object) -> Result<PageSize> {
    let media_box = match media_box {
        Object::Reference(id) => document.get_object(*id)?,
        other => other,
    };
    let coords = media_box
        .as_array()
        .map_err(|_| ViewerError::InvalidPdf("/MediaBox is not an array".into()))?;
    if coords.len() != 4 {
        return Err(ViewerError::InvalidPdf(format!(
            "/MediaBox has {} entries, expected 4",
            coords.len()
        )));
    }

    let mut values = [0.0_f64; 4];
    for (slot, obj) in values.iter_mut().zip(coords) {
        *slot = number(obj)
            .ok_or_else(|| ViewerError::InvalidPdf(format!("non-numeric /MediaBox entry {obj:?}")))?;
    }
    let [x0, y0, x1, y1] = values;
    Ok(PageSize::new((x1 - x0).abs(), (y1 - y0).abs()))
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}
