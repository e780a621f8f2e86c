use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::InputError;

// @module: Input loading and file utilities

/// Extensions that mark a missing single-token argument as a file name rather than text
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "rst", "pdf", "csv", "log", "html", "htm"];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Literal text given on the command line
    Text(String),
    /// A file on disk
    File(PathBuf),
    /// Standard input (`-`)
    Stdin,
}

impl InputSource {
    /// Decide how to interpret the positional argument
    ///
    /// An existing path is read as a file. A single token ending in a document
    /// extension (`notes.txt`, `docs/report.pdf`) that does not exist is an error.
    /// Anything else, `km/h` or a URL included, is literal text.
    pub fn resolve(input: &str) -> Result<Self, InputError> {
        if input == "-" {
            return Ok(Self::Stdin);
        }

        let path = Path::new(input);
        if path.exists() {
            return if path.is_file() {
                Ok(Self::File(path.to_path_buf()))
            } else {
                Err(InputError::NotAFile(path.to_path_buf()))
            };
        }

        if Self::looks_like_path(input) {
            return Err(InputError::NotFound(path.to_path_buf()));
        }

        Ok(Self::Text(input.to_string()))
    }

    fn looks_like_path(input: &str) -> bool {
        if input.is_empty() || input.chars().any(char::is_whitespace) {
            return false;
        }

        Path::new(input)
            .extension()
            .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// The input file, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

/// Enum representing the document formats that can be read
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Plain text in some encoding
    Text,
    /// PDF document
    Pdf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, language_tag, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        language_tag: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(language_tag);
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.as_ref().join(output_filename)
    }

    /// Extension of the translated file: the input's own, `txt` for PDFs and extension-less files
    pub fn output_extension<P: AsRef<Path>>(input_file: P) -> String {
        match input_file.as_ref().extension().map(|ext| ext.to_string_lossy().to_string()) {
            Some(ext) if !ext.is_empty() && !ext.eq_ignore_ascii_case("pdf") => ext,
            _ => "txt".to_string(),
        }
    }

    /// Detect the format of an input file from its extension, then its magic bytes
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let path = path.as_ref();

        if let Some(ext) = path.extension() {
            if ext.to_string_lossy().eq_ignore_ascii_case("pdf") {
                return FileType::Pdf;
            }
        }

        let mut header = [0u8; 5];
        let is_pdf = fs::File::open(path)
            .and_then(|mut file| std::io::Read::read_exact(&mut file, &mut header))
            .map(|_| &header == b"%PDF-")
            .unwrap_or(false);

        if is_pdf { FileType::Pdf } else { FileType::Text }
    }

    /// Reject files above the size limit
    pub fn check_file_size<P: AsRef<Path>>(path: P, max_size_mb: u64) -> Result<(), InputError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::check_size(path, metadata.len(), max_size_mb)
    }

    fn check_size(path: &Path, size_bytes: u64, max_size_mb: u64) -> Result<(), InputError> {
        if size_bytes > max_size_mb.saturating_mul(BYTES_PER_MB) {
            return Err(InputError::TooLarge {
                path: path.to_path_buf(),
                size_mb: size_bytes as f64 / BYTES_PER_MB as f64,
                limit_mb: max_size_mb,
            });
        }
        Ok(())
    }

    /// Decode bytes as text
    ///
    /// Tries, in order: the encoding announced by a BOM, the preferred encoding,
    /// UTF-8, and Windows-1252 (which also covers Latin-1 text). Returns the text
    /// and the name of the encoding that worked.
    pub fn decode_text(bytes: &[u8], preferred_label: &str) -> Result<(String, &'static str), InputError> {
        let preferred = Encoding::for_label(preferred_label.trim().as_bytes())
            .ok_or_else(|| InputError::UnknownEncoding(preferred_label.to_string()))?;

        if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_length..]) {
                return Ok((text.into_owned(), encoding.name()));
            }
        }

        let mut candidates: Vec<&'static Encoding> = vec![preferred];
        for fallback in [UTF_8, WINDOWS_1252] {
            if !candidates.contains(&fallback) {
                candidates.push(fallback);
            }
        }

        for encoding in candidates {
            if let Some(text) = Self::decode_strict(bytes, encoding) {
                return Ok((text.into_owned(), encoding.name()));
            }
        }

        // Windows-1252 maps every byte, so this is only reached for exotic preferred encodings
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        Ok((text.into_owned(), WINDOWS_1252.name()))
    }

    fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
        let bytes = if encoding == UTF_8 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        encoding.decode_without_bom_handling_and_without_replacement(bytes)
    }

    /// Read a text file with encoding fallback
    pub fn read_text_file<P: AsRef<Path>>(path: P, preferred_encoding: &str) -> Result<String, InputError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, encoding) = Self::decode_text(&bytes, preferred_encoding)?;
        log::debug!("Read {} as {}", path.display(), encoding);
        Ok(text)
    }

    /// Extract the text layer of a PDF, one line break between pages
    pub async fn extract_pdf_text<P: AsRef<Path>>(path: P) -> Result<String, InputError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| InputError::Read {
            path: path.clone(),
            source,
        })?;

        // pdf-extract may panic on malformed documents; the blocking task contains it
        let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| InputError::Pdf { path: path.clone(), message: e.to_string() })?
            .map_err(|e| InputError::Pdf { path: path.clone(), message: e.to_string() })?;

        Ok(extracted.replace('\u{c}', "\n"))
    }

    /// Read and decode a byte stream, refusing more than `max_size_mb`
    ///
    /// `label` names the stream in errors.
    pub async fn read_stream<R: AsyncRead + Unpin>(
        reader: R,
        label: &str,
        encoding: &str,
        max_size_mb: u64,
    ) -> Result<String, InputError> {
        let path = PathBuf::from(label);
        let limit = max_size_mb.saturating_mul(BYTES_PER_MB);

        // One byte past the limit is enough to know it was exceeded
        let mut bytes = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(|source| InputError::Read { path: path.clone(), source })?;
        Self::check_size(&path, bytes.len() as u64, max_size_mb)?;

        let (text, detected) = Self::decode_text(&bytes, encoding)?;
        log::debug!("Read {} as {}", label, detected);
        Ok(text)
    }

    /// Load the full document text for an input source
    pub async fn load_input(source: &InputSource, encoding: &str, max_file_size_mb: u64) -> Result<String, InputError> {
        match source {
            InputSource::Text(text) => Ok(text.clone()),
            InputSource::Stdin => {
                Self::read_stream(tokio::io::stdin(), "<stdin>", encoding, max_file_size_mb).await
            }
            InputSource::File(path) => {
                Self::check_file_size(path, max_file_size_mb)?;
                match Self::detect_file_type(path) {
                    FileType::Pdf => Self::extract_pdf_text(path).await,
                    FileType::Text => Self::read_text_file(path, encoding),
                }
            }
        }
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
