// Integration tests for goodpdf.
//
// Every document is built in memory with lopdf, saved to bytes and opened
// through the public API, so no fixture files are needed.

use goodpdf::{
    collect, Attachment, DisplayMode, ViewerConfig, ViewerError, ViewerSession, Viewport, UNNAMED,
};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use pretty_assertions::assert_eq;

// ── Fixture builder ──────────────────────────────────────────────────────────

struct PdfBuilder {
    doc: Document,
    pages: Vec<ObjectId>,
    pages_id: ObjectId,
    embedded: Vec<Object>,
}

impl PdfBuilder {
    fn new(page_count: usize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let pages = (0..page_count)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                })
            })
            .collect();
        Self {
            doc,
            pages,
            pages_id,
            embedded: Vec::new(),
        }
    }

    fn spec(&mut self, filename: Option<&str>, data: &[u8]) -> ObjectId {
        let stream_id = self.doc.add_object(Stream::new(
            dictionary! { "Type" => "EmbeddedFile" },
            data.to_vec(),
        ));
        let mut spec = dictionary! {
            "Type" => "Filespec",
            "EF" => dictionary! { "F" => stream_id },
        };
        if let Some(filename) = filename {
            spec.set("UF", Object::string_literal(filename));
        }
        self.doc.add_object(spec)
    }

    fn embed(mut self, name: &str, data: &[u8]) -> Self {
        let spec = self.spec(Some(name), data);
        self.embedded.push(Object::string_literal(name));
        self.embedded.push(spec.into());
        self
    }

    /// Name-tree entry whose file specification has no /EF.
    fn embed_broken(mut self, name: &str) -> Self {
        let spec = self.doc.add_object(dictionary! { "Type" => "Filespec" });
        self.embedded.push(Object::string_literal(name));
        self.embedded.push(spec.into());
        self
    }

    fn annotate(mut self, page: usize, filename: Option<&str>, data: &[u8]) -> Self {
        let spec = self.spec(filename, data);
        let annot = self.doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "FileAttachment",
            "Rect" => vec![0.into(), 0.into(), 20.into(), 20.into()],
            "FS" => spec,
        });
        let page = self
            .doc
            .get_object_mut(self.pages[page])
            .and_then(Object::as_dict_mut)
            .unwrap();
        let mut annots = page
            .get(b"Annots")
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default();
        annots.push(annot.into());
        page.set("Annots", annots);
        self
    }

    fn build(mut self) -> Vec<u8> {
        let kids: Vec<Object> = self.pages.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        if !self.embedded.is_empty() {
            let tree = self.doc.add_object(dictionary! { "Names" => self.embedded });
            catalog.set("Names", dictionary! { "EmbeddedFiles" => tree });
        }
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

fn open(bytes: &[u8]) -> ViewerSession {
    ViewerSession::from_bytes(bytes).expect("test PDF should open")
}

fn names(session: &ViewerSession) -> Vec<&str> {
    session.attachments().iter().map(|a| a.name.as_str()).collect()
}

// ── Attachment collection ────────────────────────────────────────────────────

#[test]
fn document_without_attachments_yields_empty_list() {
    let session = open(&PdfBuilder::new(1).build());
    assert!(session.attachments().is_empty());
    assert!(!session.has_attachments());
}

#[test]
fn embedded_files_are_sorted_case_insensitively() {
    let bytes = PdfBuilder::new(1)
        .embed("b.txt", b"bee")
        .embed("A.txt", b"ay")
        .embed("c.TXT", b"sea")
        .build();
    assert_eq!(names(&open(&bytes)), vec!["A.txt", "b.txt", "c.TXT"]);
}

#[test]
fn embedded_file_wins_a_name_collision() {
    let bytes = PdfBuilder::new(1)
        .embed("Invoice.pdf", b"embedded copy")
        .annotate(0, Some("Invoice.pdf"), b"annotation copy")
        .build();
    let session = open(&bytes);
    assert_eq!(
        session.attachments(),
        &[Attachment::new("Invoice.pdf", b"embedded copy".to_vec())]
    );
}

#[test]
fn annotation_with_same_content_under_other_name_is_dropped() {
    let payload = vec![42u8; 300];
    let bytes = PdfBuilder::new(2)
        .embed("data.bin", &payload)
        .annotate(1, Some("copy-of-data.bin"), &payload)
        .build();
    assert_eq!(names(&open(&bytes)), vec!["data.bin"]);
}

#[test]
fn broken_embedded_file_is_skipped() {
    let bytes = PdfBuilder::new(1)
        .embed("one.txt", b"1")
        .embed_broken("two.txt")
        .embed("three.txt", b"3")
        .build();
    assert_eq!(names(&open(&bytes)), vec!["one.txt", "three.txt"]);
}

#[test]
fn annotation_without_filename_is_unnamed() {
    let bytes = PdfBuilder::new(1).annotate(0, None, b"anonymous").build();
    assert_eq!(names(&open(&bytes)), vec![UNNAMED]);
}

#[test]
fn annotations_from_all_pages_are_merged() {
    let bytes = PdfBuilder::new(3)
        .embed("Zeta.csv", b"z")
        .annotate(0, Some("alpha.png"), b"png bytes")
        .annotate(2, Some("Mid.doc"), b"doc bytes")
        .build();
    assert_eq!(names(&open(&bytes)), vec!["alpha.png", "Mid.doc", "Zeta.csv"]);
}

#[test]
fn collect_works_on_a_bare_document() {
    let bytes = PdfBuilder::new(1).embed("x.xml", b"<x/>").build();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(collect(&doc), vec![Attachment::new("x.xml", b"<x/>".to_vec())]);
}

// ── Session ──────────────────────────────────────────────────────────────────

#[test]
fn from_bytes_rejects_non_pdf() {
    assert!(ViewerSession::from_bytes(&[]).is_err());
    assert!(ViewerSession::from_bytes(b"not a pdf").is_err());
}

#[test]
fn navigation_and_zoom_through_session() {
    let mut session = open(&PdfBuilder::new(3).build());
    assert_eq!(session.cursor().label(), "Page 1 of 3");
    assert_eq!(session.status(), "Zoom: 2.0x");

    assert!(session.next_page());
    assert!(session.next_page());
    assert!(!session.next_page());
    assert_eq!(session.cursor().label(), "Page 3 of 3");

    let level = session.fit_page(Viewport::new(306.0, 792.0)).unwrap();
    assert_eq!(level, 0.5);
    assert_eq!(session.zoom().mode(), DisplayMode::Fit);
    assert_eq!(session.rendered_size().unwrap(), (306, 396));

    assert_eq!(session.zoom_in(), 1.0);
    assert_eq!(session.status(), "Zoom: 1.0x");
}

#[test]
fn custom_config_sets_initial_zoom() {
    let config = ViewerConfig {
        initial_zoom: 1.0,
        max_zoom: 1.5,
        ..Default::default()
    };
    let mut session =
        ViewerSession::from_bytes_with_config(&PdfBuilder::new(1).build(), config).unwrap();
    assert_eq!(session.zoom().level(), 1.0);
    session.zoom_in();
    assert_eq!(session.zoom_in(), 1.5);
}

#[test]
fn save_attachment_writes_file() {
    let bytes = PdfBuilder::new(1).embed("notes.txt", b"hello world").build();
    let session = open(&bytes);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("saved.txt");

    session.save_attachment("notes.txt", &dest).unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");

    assert!(matches!(
        session.save_attachment("missing.txt", &dest),
        Err(ViewerError::AttachmentNotFound(_))
    ));
}

#[test]
fn open_from_path_remembers_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, PdfBuilder::new(1).build()).unwrap();

    let session = ViewerSession::open(&path).unwrap();
    assert_eq!(session.path(), Some(path.as_path()));
    assert_eq!(session.page_count(), 1);
}

#[test]
fn error_display_is_non_empty() {
    let errors: &[ViewerError] = &[
        ViewerError::InvalidPdf("test".into()),
        ViewerError::ExtractionError("f".into(), "reason".into()),
        ViewerError::AttachmentNotFound("f".into()),
        ViewerError::PageOutOfRange { index: 4, total: 2 },
        ViewerError::InvalidGeometry("zero".into()),
    ];
    for e in errors {
        assert!(!e.to_string().is_empty(), "empty display for {e:?}");
    }
}
