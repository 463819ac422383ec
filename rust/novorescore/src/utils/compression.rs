use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCompression {
    Plain,
    Gzip,
    Zstd,
}

impl TextCompression {
    /// Compression is sniffed from the (case-insensitive) file extension only.
    pub fn detect_from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        if path_str.ends_with(".gz") {
            TextCompression::Gzip
        } else if path_str.ends_with(".zst") {
            TextCompression::Zstd
        } else {
            TextCompression::Plain
        }
    }
}

/// Opens a text file for buffered line reading, transparently decompressing
/// gzip and zstd streams.
pub fn open_text(path: &Path) -> std::io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead + Send> = match TextCompression::detect_from_path(path) {
        TextCompression::Plain => Box::new(BufReader::new(file)),
        TextCompression::Gzip => Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file))),
        TextCompression::Zstd => Box::new(BufReader::new(zstd::Decoder::new(file)?)),
    };
    Ok(reader)
}
