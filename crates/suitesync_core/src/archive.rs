//! In-memory decoding of suite export archives.
//!
//! The remote bulk export is a zip of per-artifact JSON documents. Decoding
//! happens entirely over an in-memory cursor, so there is no temporary
//! storage to clean up on any exit path.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::Result;

/// One artifact file from an export archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    /// Base file name the entry is written under locally.
    pub file_name: String,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

/// Decode a zip export into its artifact files.
///
/// Directory entries are skipped and nested paths are flattened to their base
/// name; the export format is a flat set of JSON documents.
pub fn decode_export(bytes: &[u8]) -> Result<Vec<ExportEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let Some(file_name) = Path::new(file.name())
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
        else {
            continue;
        };
        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        entries.push(ExportEntry {
            file_name,
            contents,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        for (name, contents) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_decode_flat_export() {
        let bytes = build_zip(&[
            ("pay.json", r#"{"name": "pay"}"#),
            ("addToCart.json", r#"{"name": "addToCart"}"#),
        ]);

        let mut entries = decode_export(&bytes).unwrap();
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "addToCart.json");
        assert_eq!(entries[1].file_name, "pay.json");
    }

    #[test]
    fn test_decode_flattens_nested_paths() {
        let bytes = build_zip(&[("Checkout/pay.json", r#"{"name": "pay"}"#)]);
        let entries = decode_export(&bytes).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "pay.json");
        assert_eq!(entries[0].contents, br#"{"name": "pay"}"#);
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        assert!(decode_export(b"definitely not a zip").is_err());
    }
}
