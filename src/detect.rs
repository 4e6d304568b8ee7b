//! Format detection for Office Open XML packages.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Main-part content types of word-processing packages.
const DOCX_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml",
    "application/vnd.ms-word.document.macroEnabled.main+xml",
    "application/vnd.ms-word.template.macroEnabledTemplate.main+xml",
];

/// Main-part content types of presentation packages.
const PPTX_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml",
    "application/vnd.ms-powerpoint.slideshow.macroEnabled.main+xml",
];

/// Detected package format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    /// Word-processing document (.docx)
    Docx,
    /// Slide-deck presentation (.pptx)
    Pptx,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Docx => "docx",
            FormatType::Pptx => "pptx",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Docx => "Word Document",
            FormatType::Pptx => "PowerPoint Presentation",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
///
/// # Example
///
/// ```no_run
/// use officemd::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("slides.pptx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), officemd::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut magic = [0u8; 4];
    if reader.read_exact(&mut magic).is_err() || magic != ZIP_MAGIC {
        return Err(Error::UnknownFormat);
    }
    reader.rewind()?;
    detect_format_from_reader(reader)
}

/// Detect the format type from a byte slice.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the format type from a reader over a ZIP archive.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    if let Some(ref types) = content_types {
        if DOCX_CONTENT_TYPES.iter().any(|t| types.contains(t)) {
            return Ok(FormatType::Docx);
        }
        if PPTX_CONTENT_TYPES.iter().any(|t| types.contains(t)) {
            return Ok(FormatType::Pptx);
        }
    }

    detect_by_folder_structure(&archive)
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Result<FormatType> {
    let has_word = archive.file_names().any(|n| n.starts_with("word/"));
    let has_ppt = archive.file_names().any(|n| n.starts_with("ppt/"));

    match (has_word, has_ppt) {
        (true, false) => Ok(FormatType::Docx),
        (false, true) => Ok(FormatType::Pptx),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn zip_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, content) in parts {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Docx.to_string(), "Word Document");
        assert_eq!(FormatType::Pptx.to_string(), "PowerPoint Presentation");
        assert_eq!(FormatType::Pptx.extension(), "pptx");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_by_content_type() {
        let data = zip_with(&[(
            "[Content_Types].xml",
            r#"<Types><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/></Types>"#,
        )]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Pptx);

        let data = zip_with(&[(
            "[Content_Types].xml",
            r#"<Types><Override PartName="/word/document.xml" ContentType="application/vnd.ms-word.document.macroEnabled.main+xml"/></Types>"#,
        )]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Docx);
    }

    #[test]
    fn test_detect_by_folder_structure() {
        let data = zip_with(&[("word/document.xml", "<w:document/>")]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), FormatType::Docx);

        let data = zip_with(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }
}
