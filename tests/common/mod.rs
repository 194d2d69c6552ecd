//! Shared fixtures: small PDFs generated with lopdf.
//!
//! Every page's MediaBox width is its tag, so tests can follow pages through
//! a load/edit/export cycle by reading widths back.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{dictionary, Document, Object, Stream};

/// Write a PDF named `name` into `dir` with one page per entry of `widths`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.join(name);
    build_pdf(widths).save(&path).unwrap();
    path
}

/// Build a PDF in memory. Resources live on the page tree root and are
/// inherited by the pages.
pub fn build_pdf(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (number, &width) in widths.iter().enumerate() {
        let text = format!("BT /F1 12 Tf 20 20 Td (page {}) Tj ET", number);
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// MediaBox widths of `doc`'s pages, in page order.
pub fn page_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

/// MediaBox widths of the PDF at `path`.
pub fn file_widths(path: &Path) -> Vec<i64> {
    page_widths(&Document::load(path).unwrap())
}
