use crate::{Result, ViewerError};
use std::path::{Path, PathBuf};

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

// ── Attachment ───────────────────────────────────────────────────────────────

/// A file attached to a PDF document, either through the document-level
/// `/EmbeddedFiles` name tree or through a `/FileAttachment` annotation.
///
/// Returned by [`crate::collect`] and [`crate::ViewerSession::attachments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The name-tree key for embedded files, or the declared filename of an
    /// annotation's file specification.
    pub name: String,

    /// The raw, decompressed file content.
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Human-readable size: kilobytes below one megabyte, megabytes above.
    ///
    /// ```
    /// # use goodpdf::Attachment;
    /// assert_eq!(Attachment::new("a.bin", vec![0u8; 1536]).size_label(), "1.5 KB");
    /// assert_eq!(Attachment::new("b.bin", vec![0u8; 3 * 1024 * 1024]).size_label(), "3.0 MB");
    /// ```
    pub fn size_label(&self) -> String {
        let size = self.len();
        if size < MIB {
            format!("{:.1} KB", size as f64 / KIB as f64)
        } else {
            format!("{:.1} MB", size as f64 / MIB as f64)
        }
    }

    /// The line shown for this attachment in a list: `"name (size)"`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.size_label())
    }

    /// Returns the file extension as written, or `None` if the name has no
    /// extension.
    ///
    /// ```
    /// # use goodpdf::Attachment;
    /// assert_eq!(Attachment::new("factur-x.xml", vec![]).extension(), Some("xml"));
    /// assert_eq!(Attachment::new("README", vec![]).extension(), None);
    /// ```
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }

    /// Write the content to `path`, replacing any existing file.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, &self.content)
    }

    /// Write this attachment into `output_dir`, creating the directory if
    /// necessary, and return the path written.
    ///
    /// Only the last component of the name is used, so a name such as
    /// `../x` or `/etc/x` still lands inside `output_dir`. Names without a
    /// usable file name (empty, `..`, a bare root) are rejected.
    ///
    /// ```no_run
    /// use goodpdf::ViewerSession;
    ///
    /// let session = ViewerSession::open("invoice.pdf").unwrap();
    /// for attachment in session.attachments() {
    ///     attachment.save_to_dir("./extracted").unwrap();
    /// }
    /// ```
    pub fn save_to_dir<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        let file_name = Path::new(&self.name)
            .file_name()
            .ok_or_else(|| ViewerError::UnsafeName(self.name.clone()))?;

        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(file_name);
        std::fs::write(&dest, &self.content)?;
        Ok(dest)
    }
}

/// First attachment in `attachments` whose name equals `name` exactly.
pub fn find_attachment<'a>(attachments: &'a [Attachment], name: &str) -> Option<&'a Attachment> {
    attachments.iter().find(|a| a.name == name)
}
