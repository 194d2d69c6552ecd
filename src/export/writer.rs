//! Assembles the export order into a new PDF with lopdf.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use lopdf::{dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{PageRef, SourceId};
use crate::session::Session;
use crate::source::{inherited_attribute, LopdfSource, SourceProvider, INHERITABLE_KEYS};

use super::ExportOptions;

/// Summary of a completed export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Pages written
    pub pages: usize,
    /// Source documents that contributed at least one page
    pub sources: usize,
}

/// Writes a session's export order to PDF.
pub struct PdfExporter<'a, P>
where
    P: SourceProvider<Source = LopdfSource>,
{
    session: &'a Session<P>,
    options: ExportOptions,
}

impl<'a, P> PdfExporter<'a, P>
where
    P: SourceProvider<Source = LopdfSource>,
{
    /// Create an exporter for `session`.
    pub fn new(session: &'a Session<P>, options: ExportOptions) -> Self {
        Self { session, options }
    }

    /// Build the output document in memory.
    pub fn build(&self) -> Result<LopdfDocument> {
        Ok(self.assemble()?.0)
    }

    /// Build the output and write it to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<ExportSummary> {
        let (mut doc, summary) = self.assemble()?;
        doc.save_to(writer)?;
        Ok(summary)
    }

    /// Build the output and save it to `path`.
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<ExportSummary> {
        let (mut doc, summary) = self.assemble()?;
        doc.save(path.as_ref())?;
        log::info!(
            "exported {} page(s) from {} source(s) to {}",
            summary.pages,
            summary.sources,
            path.as_ref().display()
        );
        Ok(summary)
    }

    fn assemble(&self) -> Result<(LopdfDocument, ExportSummary)> {
        let order = self.session.export_order();
        if order.is_empty() {
            return Err(Error::NothingToExport);
        }

        let used: BTreeSet<SourceId> = order.iter().map(|page| page.source).collect();
        let mut output = LopdfDocument::with_version(self.output_version(&used)?);

        // (source, original page number) -> page object id in `output`
        let mut page_map: HashMap<(SourceId, u32), ObjectId> = HashMap::new();
        for &source_id in &used {
            let source = self
                .session
                .source_document(source_id)
                .ok_or(Error::UnknownSource(source_id))?;
            let mut doc = source.raw_doc().clone();
            doc.renumber_objects_with(output.max_id + 1);
            output.max_id = doc.max_id;

            let pages = doc.get_pages();
            flatten_inherited_attributes(&mut doc, pages.values().copied());
            for (number, id) in pages {
                // get_pages numbers from 1; page refs from 0
                page_map.insert((source_id, number - 1), id);
            }

            for (id, object) in doc.objects {
                if !is_tree_node(&object) {
                    output.objects.insert(id, object);
                }
            }
        }

        let pages_id = output.new_object_id();
        let kids = self.link_pages(&mut output, &order, &page_map, pages_id)?;
        let count = kids.len();
        output.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );

        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(self.options.producer.as_str()),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        };
        if let Some(title) = &self.options.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = output.add_object(info);
        output.trailer.set("Info", info_id);

        if self.options.prune {
            let pruned = output.prune_objects();
            log::debug!("pruned {} unreachable object(s)", pruned.len());
            output.renumber_objects();
        }
        if self.options.compress {
            output.compress();
        }

        Ok((
            output,
            ExportSummary {
                pages: count,
                sources: used.len(),
            },
        ))
    }

    fn link_pages(
        &self,
        output: &mut LopdfDocument,
        order: &[PageRef],
        page_map: &HashMap<(SourceId, u32), ObjectId>,
        pages_id: ObjectId,
    ) -> Result<Vec<Object>> {
        let mut kids = Vec::with_capacity(order.len());
        for page in order {
            let id = page_map
                .get(&(page.source, page.original_page_number))
                .copied()
                .ok_or_else(|| {
                    Error::Export(format!("page {} has no counterpart in its source", page))
                })?;
            let dict = output
                .objects
                .get_mut(&id)
                .and_then(|object| object.as_dict_mut().ok())
                .ok_or_else(|| Error::Export(format!("page object {:?} is not a dictionary", id)))?;
            dict.set("Parent", pages_id);
            kids.push(Object::Reference(id));
        }
        Ok(kids)
    }

    fn output_version(&self, used: &BTreeSet<SourceId>) -> Result<String> {
        let mut version = String::from("1.5");
        for &id in used {
            let source = self
                .session
                .source_document(id)
                .ok_or(Error::UnknownSource(id))?;
            if source.raw_doc().version > version {
                version = source.raw_doc().version.clone();
            }
        }
        Ok(version)
    }
}

/// Catalog and page-tree nodes are rebuilt for the output.
fn is_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Catalog") | Ok(b"Pages")
        ),
        _ => false,
    }
}

/// Copy attributes inherited from the page tree onto each page, since the
/// original tree nodes do not survive the export.
fn flatten_inherited_attributes(doc: &mut LopdfDocument, pages: impl Iterator<Item = ObjectId>) {
    let mut updates: BTreeMap<ObjectId, Vec<(&'static [u8], Object)>> = BTreeMap::new();
    for page_id in pages {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(doc, page_id, key) {
                updates
                    .entry(page_id)
                    .or_default()
                    .push((key, value.clone()));
            }
        }
    }

    for (page_id, values) in updates {
        if let Some(page) = doc
            .objects
            .get_mut(&page_id)
            .and_then(|object| object.as_dict_mut().ok())
        {
            for (key, value) in values {
                page.set(key, value);
            }
        }
    }
}
