//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use axum_test::TestServer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use maktaba_server::config::Config;
use maktaba_server::library::{BookCatalog, BookRecord};
use maktaba_server::state::AppState;

const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// (file name, heading, body) for each XHTML chapter, plus one image entry
/// placed second in the spine
pub fn sample_epub(chapters: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut manifest = String::new();
    let mut spine = String::new();
    for (i, (file, _, _)) in chapters.iter().enumerate() {
        manifest.push_str(&format!(
            r#"<item id="ch{}" href="{}" media-type="application/xhtml+xml"/>"#,
            i, file
        ));
        spine.push_str(&format!(r#"<itemref idref="ch{}"/>"#, i));
        if i == 0 {
            spine.push_str(r#"<itemref idref="cover"/>"#);
        }
    }
    manifest.push_str(r#"<item id="cover" href="cover.jpg" media-type="image/jpeg"/>"#);

    let opf = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Sample Book</dc:title>
    <dc:creator>First Author</dc:creator>
    <dc:creator>Second Author</dc:creator>
    <dc:language>ar</dc:language>
  </metadata>
  <manifest>{}</manifest>
  <spine>{}</spine>
</package>"#,
        manifest, spine
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("mimetype", options).unwrap();
    writer.write_all(b"application/epub+zip").unwrap();
    writer.start_file("META-INF/container.xml", options).unwrap();
    writer.write_all(CONTAINER.as_bytes()).unwrap();
    writer.start_file("OEBPS/content.opf", options).unwrap();
    writer.write_all(opf.as_bytes()).unwrap();
    writer.start_file("OEBPS/cover.jpg", options).unwrap();
    writer.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

    for (file, heading, body) in chapters {
        let xhtml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{0}</title><link rel="stylesheet" href="style.css"/></head>
<body><h1>{0}</h1>{1}</body>
</html>"#,
            heading, body
        );
        writer.start_file(format!("OEBPS/{}", file), options).unwrap();
        writer.write_all(xhtml.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

pub fn default_chapters() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("one.xhtml", "المقدمة", "<p>بداية الكتاب</p>"),
        ("two.xhtml", "Second", "<p>Some text in the middle. echo echo echo echo echo echo echo</p>"),
        ("three.xhtml", "Third", "<p>The lighthouse keeper waited.</p>"),
    ]
}

/// Test server over a library holding one readable book (`book-1`), one
/// record without an EPUB (`no-epub`) and one corrupt file (`broken`)
pub async fn test_server(dir: &Path) -> TestServer {
    std::fs::write(dir.join("book.epub"), sample_epub(&default_chapters())).unwrap();
    std::fs::write(dir.join("broken.epub"), b"this is not a zip archive").unwrap();

    let catalog = BookCatalog::from_records(
        vec![
            BookRecord::new("book-1", "كتاب الاختبار")
                .with_author("مؤلف")
                .with_epub("book.epub"),
            BookRecord::new("no-epub", "Paper only"),
            BookRecord::new("broken", "Broken").with_epub("broken.epub"),
        ],
        dir,
    );

    let mut config = Config::default();
    config.library.root = dir.to_path_buf();
    config.search.max_limit = 5;

    TestServer::new(maktaba_server::app(AppState::new(config, catalog))).unwrap()
}
