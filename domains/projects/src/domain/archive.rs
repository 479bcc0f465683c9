//! Zip packaging of a materialized project tree

use std::io::{Cursor, Write};

use canvasforge_common::{Error, Result};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::domain::materializer::FileTree;

/// Pack the file tree into an in-memory zip archive.
///
/// Entry names are archive-relative, so the tree's leading slashes are
/// stripped. Entries keep the tree's order.
pub fn build_archive(files: &FileTree) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, content) in files {
        let name = path.trim_start_matches('/');
        writer
            .start_file(name, options)
            .map_err(|e| Error::Internal(format!("Archive entry '{}' failed: {}", name, e)))?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| Error::Internal(format!("Archive entry '{}' failed: {}", name, e)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::Internal(format!("Archive finalization failed: {}", e)))?;
    Ok(cursor.into_inner())
}
