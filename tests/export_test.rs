//! Integration tests for writing the export order to PDF.

mod common;

use common::{file_widths, page_widths, write_pdf};
use lopdf::{Document, Object};
use pdfsplice::{merge_files, Error, ExportOptions, LoadMode, PdfExporter, Session};
use tempfile::tempdir;

#[test]
fn test_merge_files_concatenates_in_order() {
    let dir = tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", &[300, 301]);
    let b = write_pdf(dir.path(), "b.pdf", &[400]);
    let c = write_pdf(dir.path(), "c.pdf", &[500, 501, 502]);
    let output = dir.path().join("merged.pdf");

    let summary = merge_files(&[&a, &b, &c], &output).unwrap();

    assert_eq!(summary.pages, 6);
    assert_eq!(summary.sources, 3);
    assert_eq!(file_widths(&output), vec![300, 301, 400, 500, 501, 502]);
}

#[test]
fn test_export_follows_edits() {
    let dir = tempdir().unwrap();
    let table = write_pdf(dir.path(), "table.pdf", &[300, 310, 320]);
    let paper = write_pdf(dir.path(), "paper.pdf", &[400, 410]);

    let mut session = Session::new();
    let grouped = session.add_source(&table, LoadMode::Grouped).unwrap();
    let flat = session.add_source(&paper, LoadMode::Flat).unwrap();

    // paper p.1, table p.2, table p.0+p.1 merged, paper p.0 excluded
    let singles = session.expand(grouped[0].id());
    session.move_element(flat[1].id(), 0).unwrap();
    session.move_element(singles[2].id(), 1).unwrap();
    session.collapse(&[singles[0].id(), singles[1].id()]).unwrap();
    session.toggle_exclude(flat[0].id());

    let doc = PdfExporter::new(&session, ExportOptions::default())
        .build()
        .unwrap();
    assert_eq!(page_widths(&doc), vec![410, 320, 300, 310]);
}

#[test]
fn test_excluded_sources_are_not_written() {
    let dir = tempdir().unwrap();
    let keep = write_pdf(dir.path(), "keep.pdf", &[300]);
    let drop = write_pdf(dir.path(), "drop.pdf", &[400, 401]);

    let mut session = Session::new();
    session.add_source(&keep, LoadMode::Grouped).unwrap();
    let dropped = session.add_source(&drop, LoadMode::Grouped).unwrap();
    session.toggle_exclude(dropped[0].id());

    let mut bytes = Vec::new();
    let summary = PdfExporter::new(&session, ExportOptions::default())
        .write_to(&mut bytes)
        .unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.sources, 1);

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(page_widths(&doc), vec![300]);
}

#[test]
fn test_everything_excluded() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "only.pdf", &[300, 301]);
    let output = dir.path().join("out.pdf");

    let mut session = Session::new();
    let added = session.add_source(&path, LoadMode::Flat).unwrap();
    for element in &added {
        session.toggle_exclude(element.id());
    }

    let result = PdfExporter::new(&session, ExportOptions::default()).save(&output);
    assert!(matches!(result, Err(Error::NothingToExport)));
    assert!(!output.exists());
}

#[test]
fn test_same_file_loaded_twice() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "twice.pdf", &[300, 301]);

    let mut session = Session::new();
    session.add_source(&path, LoadMode::Flat).unwrap();
    let second = session.add_source(&path, LoadMode::Flat).unwrap();
    session.move_element(second[1].id(), 0).unwrap();

    let doc = PdfExporter::new(&session, ExportOptions::default())
        .build()
        .unwrap();
    assert_eq!(page_widths(&doc), vec![301, 300, 301, 300]);
}

#[test]
fn test_inherited_resources_survive() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "fonts.pdf", &[300, 301]);

    let mut session = Session::new();
    session.add_source(&path, LoadMode::Flat).unwrap();

    let doc = PdfExporter::new(&session, ExportOptions::new().with_compression(false))
        .build()
        .unwrap();
    for id in doc.get_pages().into_values() {
        let page = doc.get_dictionary(id).unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"Contents"));
    }
}

#[test]
fn test_document_info() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "info.pdf", &[300]);

    let mut session = Session::new();
    session.add_source(&path, LoadMode::Grouped).unwrap();

    let options = ExportOptions::new()
        .with_title("Combined")
        .with_producer("pdfsplice tests");
    let doc = PdfExporter::new(&session, options).build().unwrap();

    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    match info.get(b"Title").unwrap() {
        Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Combined"),
        other => panic!("unexpected title {:?}", other),
    }
    match info.get(b"Producer").unwrap() {
        Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"pdfsplice tests"),
        other => panic!("unexpected producer {:?}", other),
    }
    assert!(info.has(b"CreationDate"));
}

#[test]
fn test_unused_pages_are_pruned() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "big.pdf", &[300, 301, 302, 303, 304]);

    let mut session = Session::new();
    let added = session.add_source(&path, LoadMode::Flat).unwrap();
    for element in added.iter().skip(1) {
        session.toggle_exclude(element.id());
    }

    let pruned = PdfExporter::new(&session, ExportOptions::default())
        .build()
        .unwrap();
    let unpruned = PdfExporter::new(&session, ExportOptions::new().with_prune(false))
        .build()
        .unwrap();

    assert_eq!(page_widths(&pruned), vec![300]);
    assert!(pruned.objects.len() < unpruned.objects.len());
}
