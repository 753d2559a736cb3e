//! In-memory EPUB fixtures for unit tests

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const OPF_PATH: &str = "OEBPS/content.opf";

/// Wrap body markup in a minimal XHTML document
pub fn xhtml_document(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title>{}</title>
<link rel="stylesheet" type="text/css" href="../styles/book.css"/>
<style>p {{ color: red; }}</style>
</head>
<body>
{}
</body>
</html>"#,
        title, body
    )
}

/// XHTML document whose head uses the self-closing forms common in real
/// EPUBs: an empty `<title/>` and a `<script/>` reference
pub fn xhtml_document_self_closing(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title/>
<link rel="stylesheet" type="text/css" href="../styles/book.css"/>
<script type="text/javascript" src="../scripts/reader.js"/>
</head>
<body>
{}
</body>
</html>"#,
        body
    )
}

pub fn container_xml(opf_path: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        opf_path
    )
}

/// Builder for small EPUB archives.
///
/// Chapters are placed next to the package document at `OEBPS/`.
pub struct EpubBuilder {
    container: Option<String>,
    opf: Option<String>,
    metadata: Vec<(String, String)>,
    manifest: Vec<(String, String, String)>,
    spine: Vec<String>,
    files: Vec<(String, String)>,
}

impl Default for EpubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self {
            container: Some(container_xml(OPF_PATH)),
            opf: None,
            metadata: Vec::new(),
            manifest: Vec::new(),
            spine: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn container(mut self, xml: &str) -> Self {
        self.container = Some(xml.to_string());
        self
    }

    pub fn without_container(mut self) -> Self {
        self.container = None;
        self
    }

    /// Use a hand-written package document instead of the generated one
    pub fn opf(mut self, xml: &str) -> Self {
        self.opf = Some(xml.to_string());
        self
    }

    /// Add a Dublin Core element, e.g. `("dc:title", "Book")`
    pub fn meta(mut self, element: &str, value: &str) -> Self {
        self.metadata.push((element.to_string(), value.to_string()));
        self
    }

    pub fn manifest_item(mut self, id: &str, href: &str, media_type: &str) -> Self {
        self.manifest
            .push((id.to_string(), href.to_string(), media_type.to_string()));
        self
    }

    pub fn spine_ref(mut self, idref: &str) -> Self {
        self.spine.push(idref.to_string());
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// Add an XHTML chapter to manifest, spine and archive in one go
    pub fn chapter(self, id: &str, href: &str, title: &str, body: &str) -> Self {
        let path = format!("OEBPS/{}", href);
        self.manifest_item(id, href, "application/xhtml+xml")
            .spine_ref(id)
            .file(&path, &xhtml_document(title, body))
    }

    fn package_document(&self) -> String {
        let mut opf = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        );
        for (element, value) in &self.metadata {
            opf.push_str(&format!("    <{0}>{1}</{0}>\n", element, value));
        }
        opf.push_str("  </metadata>\n  <manifest>\n");
        for (id, href, media_type) in &self.manifest {
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
                id, href, media_type
            ));
        }
        opf.push_str("  </manifest>\n  <spine>\n");
        for idref in &self.spine {
            opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", idref));
        }
        opf.push_str("  </spine>\n</package>\n");
        opf
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        writer.start_file("mimetype", stored).unwrap();
        writer.write_all(b"application/epub+zip").unwrap();

        if let Some(container) = &self.container {
            writer
                .start_file("META-INF/container.xml", deflated)
                .unwrap();
            writer.write_all(container.as_bytes()).unwrap();
        }

        let opf = self.opf.clone().unwrap_or_else(|| self.package_document());
        writer.start_file(OPF_PATH, deflated).unwrap();
        writer.write_all(opf.as_bytes()).unwrap();

        for (path, content) in &self.files {
            writer.start_file(path.as_str(), deflated).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }
}
