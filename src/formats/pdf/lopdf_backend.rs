//! PDF backend using lopdf
//!
//! Pure-Rust backend: loads the whole document into memory, decrypts it
//! when needed, and extracts text page by page with `Document::extract_text`.

use std::path::Path;

use lopdf::encryption::DecryptionError;
use lopdf::{Dictionary, Document, Object};

use crate::document::{BackendError, BackendResult, PdfBackend, PdfDocument, RawAttributes};

/// lopdf implementation of [`PdfBackend`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn load(&self, path: &Path, password: &str) -> BackendResult<Box<dyn PdfDocument>> {
        if !path.is_file() {
            return Err(BackendError::NotFound(path.display().to_string()));
        }

        let mut doc = Document::load(path).map_err(|e| map_lopdf_error(e, password))?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(|e| {
                tracing::debug!("lopdf decryption failed for {}: {}", path.display(), e);
                map_lopdf_error(e, password)
            })?;
        }

        Ok(Box::new(LopdfDocument::new(doc)))
    }
}

/// Only a rejected password is a password failure. Unsupported encryption
/// schemes and malformed encryption dictionaries make the file unreadable.
fn map_lopdf_error(err: lopdf::Error, password: &str) -> BackendError {
    match err {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => {
            if password.is_empty() {
                BackendError::PasswordRequired
            } else {
                BackendError::PasswordRejected
            }
        }
        other => BackendError::Unreadable(other.to_string()),
    }
}

/// A loaded lopdf document
pub struct LopdfDocument {
    inner: Document,
    /// lopdf page numbers (1-based keys of `get_pages`), in page order
    page_numbers: Vec<u32>,
}

impl LopdfDocument {
    fn new(inner: Document) -> Self {
        let page_numbers = inner.get_pages().keys().copied().collect();
        Self { inner, page_numbers }
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        match self.inner.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.inner.get_object(*id).ok()?.as_dict().ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    fn text_attribute(&self, info: &Dictionary, key: &[u8]) -> Option<String> {
        let value = match info.get(key).ok()? {
            Object::Reference(id) => self.inner.get_object(*id).ok()?,
            other => other,
        };
        let text = match value {
            Object::String(bytes, _) => decode_text_string(bytes),
            Object::Name(name) => String::from_utf8_lossy(name).to_string(),
            _ => return None,
        };
        Some(text).filter(|s| !s.trim().is_empty())
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn extract_page_text(&mut self, page_index: usize) -> BackendResult<String> {
        let page_number = *self.page_numbers.get(page_index).ok_or_else(|| {
            BackendError::Extraction(format!("no page at index {}", page_index))
        })?;

        self.inner
            .extract_text(&[page_number])
            .map_err(|e| BackendError::Extraction(e.to_string()))
    }

    fn attributes(&self) -> RawAttributes {
        let Some(info) = self.info_dictionary() else {
            return RawAttributes::default();
        };

        RawAttributes {
            title: self.text_attribute(info, b"Title"),
            author: self.text_attribute(info, b"Author"),
            subject: self.text_attribute(info, b"Subject"),
            keywords: self.text_attribute(info, b"Keywords"),
            creator: self.text_attribute(info, b"Creator"),
            producer: self.text_attribute(info, b"Producer"),
            creation_date: self.text_attribute(info, b"CreationDate"),
            modification_date: self.text_attribute(info, b"ModDate"),
        }
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8 with BOM, or PDFDocEncoding)
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).to_string();
    }
    // PDFDocEncoding matches Latin-1 for printable text
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream, StringFormat};
    use tempfile::TempDir;

    use super::*;
    use crate::document::{DocumentCache, ErrorCode};

    /// Write a PDF with one text line per page, plus an optional info dictionary
    pub(crate) fn write_test_pdf(
        dir: &TempDir,
        name: &str,
        pages: &[&str],
        info: Option<Dictionary>,
    ) -> PathBuf {
        let mut doc = build_test_document(pages);

        if let Some(info) = info {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        save(doc, dir, name)
    }

    /// Write a PDF whose trailer carries `encrypt` as its encryption dictionary
    fn write_encrypted_test_pdf(dir: &TempDir, name: &str, encrypt: Dictionary) -> PathBuf {
        let mut doc = build_test_document(&["locked"]);

        let encrypt_id = doc.add_object(encrypt);
        doc.trailer.set("Encrypt", encrypt_id);
        doc.trailer.set(
            "ID",
            vec![hex_string(&[0x11; 16]), hex_string(&[0x22; 16])],
        );

        save(doc, dir, name)
    }

    fn hex_string(bytes: &[u8]) -> Object {
        Object::String(bytes.to_vec(), StringFormat::Hexadecimal)
    }

    /// Standard security handler dictionary whose /U matches no password
    fn standard_encrypt_dictionary(version: i64, revision: i64) -> Dictionary {
        dictionary! {
            "Filter" => "Standard",
            "V" => version,
            "R" => revision,
            "Length" => 128,
            "O" => hex_string(&[0x5A; 32]),
            "U" => hex_string(&[0xAB; 32]),
            "P" => -44,
        }
    }

    fn save(mut doc: Document, dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        doc.save(&path).unwrap();
        path
    }

    fn build_test_document(pages: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_load_and_extract() {
        let dir = TempDir::new().unwrap();
        let path = write_test_pdf(&dir, "two.pdf", &["Hello page one", "Second page"], None);

        let mut doc = LopdfBackend::new().load(&path, "").unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.extract_page_text(0).unwrap().contains("Hello page one"));
        assert!(doc.extract_page_text(1).unwrap().contains("Second page"));
        assert!(doc.extract_page_text(2).is_err());
    }

    #[test]
    fn test_attributes_from_info_dictionary() {
        let dir = TempDir::new().unwrap();
        let info = dictionary! {
            "Title" => Object::string_literal("Annual Report"),
            "Author" => Object::string_literal("Ada Lovelace"),
            "Keywords" => Object::string_literal("finance, 2020 ,report"),
            "CreationDate" => Object::string_literal("D:20200102030405Z"),
            "Producer" => Object::string_literal(""),
        };
        let path = write_test_pdf(&dir, "info.pdf", &["text"], Some(info));

        let doc = LopdfBackend::new().load(&path, "").unwrap();
        let attributes = doc.attributes();

        assert_eq!(attributes.title.as_deref(), Some("Annual Report"));
        assert_eq!(attributes.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(attributes.keywords.as_deref(), Some("finance, 2020 ,report"));
        assert_eq!(attributes.creation_date.as_deref(), Some("D:20200102030405Z"));
        assert_eq!(attributes.producer, None);
        assert_eq!(attributes.subject, None);
    }

    #[test]
    fn test_missing_info_dictionary() {
        let dir = TempDir::new().unwrap();
        let path = write_test_pdf(&dir, "bare.pdf", &["text"], None);

        let doc = LopdfBackend::new().load(&path, "").unwrap();
        assert_eq!(doc.attributes(), RawAttributes::default());
    }

    #[test]
    fn test_missing_file() {
        let result = LopdfBackend::new().load(Path::new("/nonexistent/file.pdf"), "");
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[test]
    fn test_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = LopdfBackend::new().load(&path, "");
        assert!(matches!(result, Err(BackendError::Unreadable(_))));
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"plain"), "plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_text_string(&[0xEF, 0xBB, 0xBF, b'o', b'k']), "ok");
        assert_eq!(decode_text_string(&[0xE9]), "é");
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_encrypted_test_pdf(&dir, "rc4.pdf", standard_encrypt_dictionary(2, 3));

        let result = LopdfBackend::new().load(&path, "not-the-password");
        assert!(matches!(result, Err(BackendError::PasswordRejected)));
    }

    #[test]
    fn test_empty_password_on_protected_file_is_required() {
        let dir = TempDir::new().unwrap();
        let path = write_encrypted_test_pdf(&dir, "rc4.pdf", standard_encrypt_dictionary(2, 3));

        let result = LopdfBackend::new().load(&path, "");
        assert!(matches!(result, Err(BackendError::PasswordRequired)));
    }

    #[test]
    fn test_unsupported_encryption_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = write_encrypted_test_pdf(&dir, "aes.pdf", standard_encrypt_dictionary(4, 4));

        for password in ["", "anything"] {
            let result = LopdfBackend::new().load(&path, password);
            assert!(matches!(result, Err(BackendError::Unreadable(_))));
        }
    }

    #[test]
    fn test_malformed_encryption_dictionary_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let mut encrypt = standard_encrypt_dictionary(2, 3);
        encrypt.remove(b"O");
        let path = write_encrypted_test_pdf(&dir, "no-owner.pdf", encrypt);

        let result = LopdfBackend::new().load(&path, "");
        assert!(matches!(result, Err(BackendError::Unreadable(_))));
    }

    #[test]
    fn test_encryption_failures_reach_callers_with_the_right_code() {
        let dir = TempDir::new().unwrap();
        let rc4 = write_encrypted_test_pdf(&dir, "rc4.pdf", standard_encrypt_dictionary(2, 3));
        let aes = write_encrypted_test_pdf(&dir, "aes.pdf", standard_encrypt_dictionary(4, 4));
        let cache = DocumentCache::new(Arc::new(LopdfBackend::new()));

        let err = cache
            .get_or_load(&rc4.to_string_lossy(), "wrong", false)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPassword);

        let err = cache
            .get_or_load(&aes.to_string_lossy(), "anything", false)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPath);
    }
}
