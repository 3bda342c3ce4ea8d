use base64::Engine;
use std::path::Path;

use crate::core::{DocumentReference, EmbeddedDocument, Invoice, UblError};

const OCTET_STREAM: &str = "application/octet-stream";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

impl Invoice {
    /// Embed the file at `path` as the invoice's only additional document.
    ///
    /// The MIME type is detected from the content, not the extension. Any
    /// previously attached document is replaced. On read failure the
    /// invoice is left untouched.
    pub fn add_attachment(
        &mut self,
        path: impl AsRef<Path>,
        description: impl Into<String>,
    ) -> Result<(), UblError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| UblError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.attach_bytes(&bytes, filename, description);
        Ok(())
    }

    /// In-memory variant of [`add_attachment`](Self::add_attachment).
    pub fn attach_bytes(
        &mut self,
        bytes: &[u8],
        filename: impl Into<String>,
        description: impl Into<String>,
    ) {
        let mime_code = detect_mime(bytes).to_string();
        let filename = filename.into();
        tracing::debug!(%filename, %mime_code, size = bytes.len(), "embedding attachment");

        self.attachments = vec![DocumentReference {
            id: self.id.clone(),
            document_description: description.into(),
            embedded_document: EmbeddedDocument {
                content: base64::engine::general_purpose::STANDARD.encode(bytes),
                mime_code,
                filename,
            },
        }];
    }
}

/// Sniff a MIME type from magic bytes.
///
/// Falls back to `text/plain; charset=utf-8` for printable UTF-8 and to
/// `application/octet-stream` for everything else.
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.is_empty() && text.chars().all(|c| !c.is_control() || c.is_whitespace()) => {
            PLAIN_TEXT
        }
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn invoice() -> Invoice {
        Invoice::with_issue_date("INV-9", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn detects_by_content() {
        assert_eq!(detect_mime(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"), "application/pdf");
        assert_eq!(detect_mime(PNG_HEADER), "image/png");
        assert_eq!(detect_mime(b"id;amount\n1;10.00\n"), "text/plain; charset=utf-8");
        assert_eq!(detect_mime(&[0x00, 0x01, 0x02, 0xff]), "application/octet-stream");
        assert_eq!(detect_mime(&[]), "application/octet-stream");
    }

    #[test]
    fn attach_bytes_encodes_payload() {
        let mut inv = invoice();
        inv.attach_bytes(b"hello", "note.txt", "Terms");
        assert_eq!(inv.attachments.len(), 1);
        let doc = &inv.attachments[0];
        assert_eq!(doc.id, "INV-9");
        assert_eq!(doc.document_description, "Terms");
        assert_eq!(doc.embedded_document.content, "aGVsbG8=");
        assert_eq!(doc.embedded_document.filename, "note.txt");
        assert_eq!(doc.embedded_document.mime_code, "text/plain; charset=utf-8");
    }

    #[test]
    fn second_attachment_replaces_first() {
        let mut inv = invoice();
        inv.attach_bytes(b"first", "a.txt", "First");
        inv.attach_bytes(PNG_HEADER, "b.png", "Second");
        assert_eq!(inv.attachments.len(), 1);
        assert_eq!(inv.attachments[0].document_description, "Second");
        assert_eq!(inv.attachments[0].embedded_document.mime_code, "image/png");
    }

    #[test]
    fn unreadable_file_keeps_previous_attachment() {
        let mut inv = invoice();
        inv.attach_bytes(b"kept", "kept.txt", "Kept");
        let err = inv
            .add_attachment("/definitely/not/here.pdf", "Missing")
            .unwrap_err();
        assert!(matches!(err, UblError::Io { .. }));
        assert_eq!(inv.attachments[0].document_description, "Kept");
    }
}
