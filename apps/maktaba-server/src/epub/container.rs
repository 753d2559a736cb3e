//! `META-INF/container.xml` resolution

use quick_xml::events::Event;
use quick_xml::Reader;

use super::archive::EpubArchive;
use super::error::{EpubError, EpubResult};

/// Fixed location of the OCF container document
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Find the package document path declared by the first `<rootfile>`
pub fn resolve_package_path(archive: &EpubArchive) -> EpubResult<String> {
    let xml = archive
        .read_string(CONTAINER_PATH)
        .ok_or_else(|| EpubError::InvalidContainer(format!("{} not found", CONTAINER_PATH)))?;

    find_rootfile_path(&xml)
}

fn find_rootfile_path(xml: &str) -> EpubResult<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"rootfile" =>
            {
                let full_path = e
                    .try_get_attribute("full-path")
                    .map_err(|e| EpubError::InvalidContainer(e.to_string()))?
                    .map(|attr| {
                        attr.unescape_value()
                            .map(|v| v.into_owned())
                            .map_err(|e| EpubError::InvalidContainer(e.to_string()))
                    })
                    .transpose()?
                    .filter(|path| !path.trim().is_empty());

                return full_path.ok_or_else(|| {
                    EpubError::InvalidContainer("rootfile has no full-path attribute".to_string())
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EpubError::InvalidContainer(format!(
                    "Malformed container.xml at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Err(EpubError::InvalidContainer(
        "No rootfile element in container.xml".to_string(),
    ))
}
