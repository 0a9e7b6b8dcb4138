//! Upload parsing: PDF text extraction plus plain-text passthrough

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::FileType;

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Text extracted from an upload
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Extracted text content
    pub content: String,
    /// SHA-256 of the extracted text, hex encoded
    pub content_hash: String,
    /// Total pages (PDF only, best effort)
    pub total_pages: Option<u32>,
}

/// Upload parser
pub struct FileParser;

impl FileParser {
    /// Decide how to read an upload.
    ///
    /// PDF magic bytes win over the name. Otherwise `.txt`/`.md` names are
    /// read as text and everything else, including names without an
    /// extension, is treated as a PDF.
    pub fn detect(filename: &str, data: &[u8]) -> FileType {
        if data.starts_with(PDF_MAGIC) {
            return FileType::Pdf;
        }
        FileType::from_filename(filename).unwrap_or(FileType::Pdf)
    }

    /// Extract the text of an upload
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        match Self::detect(filename, data) {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Text | FileType::Markdown => Ok(Self::parse_text(data)),
        }
    }

    /// Extract all page text from a PDF
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        tracing::debug!(
            "Extracted {} bytes of text from {} ({:?} pages)",
            content.len(),
            filename,
            total_pages
        );

        Ok(ParsedDocument {
            content_hash: hash_content(&content),
            content,
            total_pages,
        })
    }

    fn parse_text(data: &[u8]) -> ParsedDocument {
        let content = String::from_utf8_lossy(data).to_string();

        ParsedDocument {
            content_hash: hash_content(&content),
            content,
            total_pages: None,
        }
    }
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Build a one-page PDF showing `text` in Courier
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

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
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
