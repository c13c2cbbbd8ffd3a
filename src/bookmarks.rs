//! Section outline support built on top of `lopdf`.
//!
//! Only available with the `bookmarks` feature.  The outline is added after
//! rendering by reopening the finished bytes, so the layout and rendering
//! passes stay unaware of it.

use lopdf::{dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::composer::SectionStart;

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("failed to process PDF bytes: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("PDF trailer has no catalog reference")]
    MissingCatalog,
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// `page_number` is one-based, as shown by PDF viewers.
    #[error("section '{title}' starts on missing page {page_number}")]
    MissingPage { title: String, page_number: usize },
}

/// Adds a flat outline with one `/Fit` destination per report section and
/// asks viewers to open with the outline panel visible.
///
/// Documents without sections are returned unchanged.
pub fn apply_section_bookmarks(
    pdf_bytes: &[u8],
    sections: &[SectionStart],
) -> Result<Vec<u8>, BookmarkError> {
    if sections.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let targets = resolve_targets(&document, sections)?;
    let root_id = document.new_object_id();
    let item_ids: Vec<ObjectId> = targets.iter().map(|_| document.new_object_id()).collect();

    for (index, (title, page_ref)) in targets.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => Object::string_literal(title.as_str()),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(*page_ref), "Fit".into()],
        };
        if let Some(prev) = index.checked_sub(1).map(|i| item_ids[i]) {
            item.set("Prev", prev);
        }
        if let Some(next) = item_ids.get(index + 1) {
            item.set("Next", *next);
        }
        document.objects.insert(item_ids[index], Object::Dictionary(item));
    }

    let mut root = dictionary! {
        "Type" => "Outlines",
        "Count" => item_ids.len() as i64,
    };
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        root.set("First", *first);
        root.set("Last", *last);
    }
    document.objects.insert(root_id, Object::Dictionary(root));

    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;
    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", root_id);
    catalog.set("PageMode", "UseOutlines");

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(lopdf::Error::from)?;
    Ok(buffer)
}

/// Pairs every section title with the object id of its first page.
fn resolve_targets(
    document: &Document,
    sections: &[SectionStart],
) -> Result<Vec<(String, ObjectId)>, BookmarkError> {
    let pages = document.get_pages();
    sections
        .iter()
        .map(|section| {
            let page_number = section.page + 1;
            u32::try_from(page_number)
                .ok()
                .and_then(|number| pages.get(&number))
                .map(|page_ref| (section.title.clone(), *page_ref))
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: section.title.clone(),
                    page_number,
                })
        })
        .collect()
}
