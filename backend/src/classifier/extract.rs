//! Readable text from uploaded documents.
//!
//! `.pdf` goes through `lopdf` (compressed content streams included),
//! `.docx` is unzipped and its `word/document.xml` runs are collected.
//! Legacy `.doc` files have no parser here; their text is recovered from
//! printable runs, both 8-bit and UTF-16LE, which is how Word stores it.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use shared::DocumentKind;

const MIN_RUN: usize = 4;
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unreadable PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("unreadable DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("malformed DOCX body: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn document_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => pdf_text(bytes),
        DocumentKind::Docx => docx_text(bytes),
        DocumentKind::Doc => Ok(printable_runs(bytes)),
    }
}

fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes)?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }
    Ok(document.extract_text(&pages)?)
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(tag) if tag.name().as_ref() == b"w:t" => in_text = true,
            Event::End(tag) if tag.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(text) if in_text => paragraph.push_str(&text.unescape()?),
            Event::Empty(tag) if matches!(tag.name().as_ref(), b"w:tab" | b"w:br") => {
                paragraph.push(' ')
            }
            Event::End(tag) if tag.name().as_ref() == b"w:p" => {
                if !paragraph.trim().is_empty() {
                    paragraphs.push(paragraph.trim().to_string());
                }
                paragraph.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn printable_runs(bytes: &[u8]) -> String {
    let mut runs = Vec::new();
    let mut current = String::new();

    for &byte in bytes {
        if is_printable(byte.into()) {
            current.push(byte as char);
            continue;
        }
        flush_run(&mut current, &mut runs);
    }
    flush_run(&mut current, &mut runs);

    for unit in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([unit[0], unit[1]]);
        match char::from_u32(unit.into()) {
            Some(c) if is_printable(unit) => current.push(c),
            _ => flush_run(&mut current, &mut runs),
        }
    }
    flush_run(&mut current, &mut runs);

    runs.join("\n")
}

fn is_printable(unit: u16) -> bool {
    (0x20..0x7f).contains(&unit) || unit == u16::from(b'\t')
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.len() >= MIN_RUN && trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        runs.push(trimmed.to_string());
    }
    current.clear();
}

/// Lowercased alphanumeric words of `text`.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}
