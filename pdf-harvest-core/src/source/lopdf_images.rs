//! Image enumeration backed by lopdf
//!
//! Images are listed from each page's `/Resources /XObject` dictionary,
//! following inherited resources and descending into form XObjects. The
//! stored stream bytes are handed out as-is for image codecs; streams that are
//! only transport-encoded are inflated back to their raw samples.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::{EmbeddedImage, ImageSource};
use crate::error::Result;

/// Filters that mark a complete image encoding. The stream bytes are a
/// standalone file in that format.
const CODEC_EXTENSIONS: &[(&str, &str)] = &[
    ("DCTDecode", "jpg"),
    ("JPXDecode", "jp2"),
    ("JBIG2Decode", "jb2"),
    ("CCITTFaxDecode", "ccitt"),
];

/// Filters lopdf can undo without touching the image encoding.
const TRANSPORT_FILTERS: &[&str] = &["FlateDecode", "LZWDecode", "ASCII85Decode"];

/// Extension for raw sample data.
const RAW_EXTENSION: &str = "raw";

/// Extension for filter chains that are written untouched.
const OPAQUE_EXTENSION: &str = "bin";

/// Image source over [`lopdf::Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfImageSource;

impl ImageSource for LopdfImageSource {
    fn visit_images(
        &self,
        pdf_path: &Path,
        visit: &mut dyn FnMut(EmbeddedImage) -> Result<()>,
    ) -> Result<usize> {
        let mut document = Document::load(pdf_path)?;
        if document.is_encrypted() {
            document.decrypt("")?;
        }

        let pages = document.get_pages();
        for (&page, &page_id) in &pages {
            let streams = page_image_streams(&document, page_id);
            tracing::debug!(page, images = streams.len(), "listed page images");

            for (position, stream) in streams.into_iter().enumerate() {
                let (extension, data) = image_bytes(stream);
                visit(EmbeddedImage {
                    page,
                    index: position as u32 + 1,
                    extension: extension.to_string(),
                    data,
                })?;
            }
        }

        Ok(pages.len())
    }
}

/// Extension for an image stream with the given filter chain.
pub fn extension_for_filters<S: AsRef<str>>(filters: &[S]) -> &'static str {
    match filters {
        [] => RAW_EXTENSION,
        [only] => codec_extension(only.as_ref()).unwrap_or_else(|| {
            if is_transport(only.as_ref()) {
                RAW_EXTENSION
            } else {
                OPAQUE_EXTENSION
            }
        }),
        chain if chain.iter().all(|f| is_transport(f.as_ref())) => RAW_EXTENSION,
        _ => OPAQUE_EXTENSION,
    }
}

fn codec_extension(filter: &str) -> Option<&'static str> {
    CODEC_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == filter)
        .map(|(_, ext)| *ext)
}

fn is_transport(filter: &str) -> bool {
    TRANSPORT_FILTERS.contains(&filter)
}

/// Image streams of one page, in resource order, each object once.
fn page_image_streams(document: &Document, page_id: ObjectId) -> Vec<&Stream> {
    let mut streams = Vec::new();
    let mut seen = HashSet::new();

    if let Some(resources) = inherited_resources(document, page_id) {
        collect_images(document, resources, &mut seen, &mut streams);
    }
    streams
}

/// The page's `/Resources`, or the nearest ancestor's when the page has none.
fn inherited_resources(document: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = document.get_dictionary(page_id).ok()?;
    let mut visited = HashSet::from([page_id]);

    loop {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve_dict(document, resources);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        if !visited.insert(parent_id) {
            tracing::warn!(?page_id, "page tree cycle while resolving resources");
            return None;
        }
        node = document.get_dictionary(parent_id).ok()?;
    }
}

fn resolve_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    document
        .dereference(object)
        .ok()
        .and_then(|(_, object)| object.as_dict().ok())
}

fn collect_images<'a>(
    document: &'a Document,
    resources: &'a Dictionary,
    seen: &mut HashSet<ObjectId>,
    streams: &mut Vec<&'a Stream>,
) {
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|xobjects| resolve_dict(document, xobjects))
    else {
        return;
    };

    for (name, value) in xobjects.iter() {
        let Ok(id) = value.as_reference() else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        let Ok(stream) = document.get_object(id).and_then(Object::as_stream) else {
            tracing::warn!(
                name = %String::from_utf8_lossy(name),
                ?id,
                "XObject is not a readable stream"
            );
            continue;
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(b"Image") => streams.push(stream),
            Ok(b"Form") => {
                if let Some(nested) = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .and_then(|nested| resolve_dict(document, nested))
                {
                    collect_images(document, nested, seen, streams);
                }
            }
            _ => {}
        }
    }
}

/// Extension and bytes to write for one image stream.
fn image_bytes(stream: &Stream) -> (&'static str, Vec<u8>) {
    let filters = match stream.dict.get(b"Filter") {
        Err(_) => Vec::new(),
        Ok(_) => match stream.filters() {
            Ok(filters) => filters,
            Err(_) => return (OPAQUE_EXTENSION, stream.content.clone()),
        },
    };

    let extension = extension_for_filters(filters.as_slice());
    if extension != RAW_EXTENSION || filters.is_empty() {
        if extension == OPAQUE_EXTENSION {
            tracing::warn!(?filters, "unrecognised image filter chain, writing stored bytes");
        }
        return (extension, stream.content.clone());
    }

    // lopdf refuses to decode image streams directly; a copy without the
    // subtype decodes like any other stream.
    let mut plain = stream.clone();
    plain.dict.remove(b"Subtype");
    match plain.decompressed_content() {
        Ok(samples) => (RAW_EXTENSION, samples),
        Err(err) => {
            tracing::warn!(?filters, %err, "could not undo transport filters, writing stored bytes");
            (OPAQUE_EXTENSION, stream.content.clone())
        }
    }
}
