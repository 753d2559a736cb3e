//! OPF package document parser
//!
//! Streams the OPF with quick-xml and collects the Dublin Core metadata,
//! the manifest and the spine. Resolution of spine references against the
//! manifest is left to the chapter extractor.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::archive::EpubArchive;
use super::error::{EpubError, EpubResult};
use super::types::{ManifestItem, PackageDocument, PackageMetadata, SpineEntry};

/// Read and parse the package document at `path`
pub fn parse_package(archive: &EpubArchive, path: &str) -> EpubResult<PackageDocument> {
    let xml = archive.read_string(path).ok_or_else(|| {
        EpubError::InvalidPackage(format!("Package document {} not found", path))
    })?;

    parse_package_xml(&xml)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    Metadata,
    Manifest,
    Spine,
}

/// Text being collected for an open `dc:*` element
struct Capture {
    element: String,
    scheme: Option<String>,
    text: String,
    depth: usize,
}

/// Parse an OPF document from its XML text
pub fn parse_package_xml(xml: &str) -> EpubResult<PackageDocument> {
    let mut reader = Reader::from_str(xml);

    let mut section = Section::Other;
    let mut open_elements = 0usize;
    let mut seen_package = false;
    let mut capture: Option<Capture> = None;
    let mut collector = MetadataCollector::default();
    let mut manifest = HashMap::new();
    let mut spine = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            EpubError::InvalidPackage(format!(
                "Malformed package document at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                open_elements += 1;
                if let Some(open) = capture.as_mut() {
                    open.depth += 1;
                    continue;
                }
                match e.local_name().as_ref() {
                    b"package" => seen_package = true,
                    b"metadata" => section = Section::Metadata,
                    b"manifest" => section = Section::Manifest,
                    b"spine" => section = Section::Spine,
                    _ => {
                        if section == Section::Metadata && e.name().as_ref().starts_with(b"dc:") {
                            capture = Some(Capture {
                                element: qualified_name(e),
                                scheme: attribute(e, "opf:scheme")?,
                                text: String::new(),
                                depth: 0,
                            });
                        } else {
                            handle_item(e, section, &mut manifest, &mut spine)?;
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                if capture.is_some() {
                    continue;
                }
                if section == Section::Metadata && e.name().as_ref().starts_with(b"dc:") {
                    collector.record(&qualified_name(e), attribute(e, "opf:scheme")?, "");
                } else {
                    handle_item(e, section, &mut manifest, &mut spine)?;
                }
            }
            Event::Text(ref t) => {
                if let Some(open) = capture.as_mut() {
                    let text = t
                        .unescape()
                        .unwrap_or_else(|_| String::from_utf8_lossy(t.as_ref()).into_owned().into());
                    open.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(open) = capture.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(ref e) => {
                open_elements = open_elements.saturating_sub(1);
                if let Some(open) = capture.as_mut() {
                    if open.depth > 0 {
                        open.depth -= 1;
                        continue;
                    }
                    if let Some(done) = capture.take() {
                        collector.record(&done.element, done.scheme, &done.text);
                    }
                    continue;
                }
                if matches!(
                    e.local_name().as_ref(),
                    b"metadata" | b"manifest" | b"spine"
                ) {
                    section = Section::Other;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open_elements > 0 {
        return Err(EpubError::InvalidPackage(
            "Package document ends before its elements are closed".to_string(),
        ));
    }
    if !seen_package {
        return Err(EpubError::InvalidPackage(
            "No package element in package document".to_string(),
        ));
    }

    tracing::debug!(
        "Parsed package document: {} manifest items, {} spine entries",
        manifest.len(),
        spine.len()
    );

    Ok(PackageDocument {
        metadata: collector.finish(),
        manifest,
        spine,
    })
}

fn handle_item(
    e: &BytesStart<'_>,
    section: Section,
    manifest: &mut HashMap<String, ManifestItem>,
    spine: &mut Vec<SpineEntry>,
) -> EpubResult<()> {
    match (section, e.local_name().as_ref()) {
        (Section::Manifest, b"item") => {
            let Some(id) = attribute(e, "id")? else {
                tracing::warn!("Ignoring manifest item without id");
                return Ok(());
            };
            let item = ManifestItem {
                id: id.clone(),
                href: attribute(e, "href")?.unwrap_or_default(),
                media_type: attribute(e, "media-type")?.unwrap_or_default(),
            };
            manifest.insert(id, item);
        }
        (Section::Spine, b"itemref") => {
            if let Some(idref) = attribute(e, "idref")? {
                spine.push(SpineEntry { idref });
            }
        }
        _ => {}
    }
    Ok(())
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Attribute value by its qualified name, unescaped
fn attribute(e: &BytesStart<'_>, name: &str) -> EpubResult<Option<String>> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| EpubError::InvalidPackage(err.to_string()))?;

    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()));
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

#[derive(Default)]
struct MetadataCollector {
    metadata: PackageMetadata,
    creators: Vec<String>,
}

impl MetadataCollector {
    fn record(&mut self, element: &str, scheme: Option<String>, text: &str) {
        let value = text.trim();

        if element == "dc:identifier" && self.metadata.isbn.is_none() {
            let by_scheme = scheme.as_deref() == Some("ISBN");
            let by_text = value.to_lowercase().contains("isbn");
            if (by_scheme || by_text) && !value.is_empty() {
                self.metadata.isbn = Some(value.to_string());
            }
            return;
        }

        if value.is_empty() {
            return;
        }

        let slot = match element {
            "dc:title" => &mut self.metadata.title,
            "dc:description" => &mut self.metadata.description,
            "dc:language" => &mut self.metadata.language,
            "dc:publisher" => &mut self.metadata.publisher,
            "dc:date" => &mut self.metadata.publish_date,
            "dc:creator" => {
                self.creators.push(value.to_string());
                return;
            }
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fn finish(mut self) -> PackageMetadata {
        if !self.creators.is_empty() {
            self.metadata.author = Some(self.creators.join(", "));
        }
        self.metadata
    }
}
