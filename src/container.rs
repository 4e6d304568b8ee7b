//! ZIP package abstraction for Office Open XML documents.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// Relationship type suffix of the package's main content part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// A relationship entry from a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

impl Relationship {
    /// Whether this relationship points at an embedded image part.
    pub fn is_image(&self) -> bool {
        !self.external && self.rel_type.to_lowercase().contains("/image")
    }
}

/// Relationships parsed from a .rels part, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Iterate the embedded image relationships in declaration order.
    pub fn images(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter().filter(|rel| rel.is_image())
    }

    /// First relationship whose type URI ends with `suffix`.
    pub fn find_by_type_suffix(&self, suffix: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.rel_type.ends_with(suffix))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a relationship. A repeated ID keeps its first declaration.
    pub fn add(&mut self, rel: Relationship) {
        if self.by_id.contains_key(&rel.id) {
            return;
        }
        self.by_id.insert(rel.id.clone(), self.entries.len());
        self.entries.push(rel);
    }

    /// Parse the XML of a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }

                    if !rel.id.is_empty() {
                        rels.add(rel);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 XML has been decoded into a Rust string the declaration
/// must no longer claim UTF-16, or quick-xml re-interprets the text.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // BOM-less UTF-16: ASCII markup leaves every other byte zero
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// A read-only Office Open XML package.
///
/// Owns the ZIP archive for the duration of one conversion and gives
/// access to XML parts, binary parts and relationship tables.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use officemd::container::Package;
    ///
    /// let package = Package::open("document.docx")?;
    /// # Ok::<(), officemd::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all part names in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Read the relationships of a part.
    ///
    /// A missing .rels part is not an error: the part simply has no
    /// relationships.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = Self::rels_path(part_path);
        match self.read_xml(&rels_path) {
            Ok(xml) => Relationships::parse(&xml),
            Err(Error::MissingComponent(_)) => {
                log::debug!("no relationship part at {}", rels_path);
                Ok(Relationships::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Read package-level relationships (`_rels/.rels`).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.read_relationships("")
    }

    /// Locate the main content part through the package relationships,
    /// falling back to the conventional location.
    pub fn main_part(&self, fallback: &str) -> Result<String> {
        let rels = self.read_package_relationships()?;
        let located = rels
            .find_by_type_suffix(OFFICE_DOCUMENT_REL)
            .map(|rel| Self::resolve_path("", &rel.target))
            .filter(|path| self.exists(path));

        let part = located.unwrap_or_else(|| fallback.to_string());
        if !self.exists(&part) {
            return Err(Error::MissingComponent(part));
        }
        log::debug!("main content part: {}", part);
        Ok(part)
    }

    /// Path of the .rels part that belongs to `part_path`.
    ///
    /// `word/document.xml` maps to `word/_rels/document.xml.rels`; the
    /// package root maps to `_rels/.rels`.
    pub fn rels_path(part_path: &str) -> String {
        let part_path = part_path.trim_start_matches('/');
        if part_path.is_empty() {
            return "_rels/.rels".to_string();
        }
        match part_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = PathBuf::from(base_dir);
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    result.pop();
                }
                Component::Normal(c) => result.push(c),
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("files", &self.list_files().len())
            .finish()
    }
}
