//! ZIP container abstraction for the presentation package.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path exactly as written in the .rels file
    pub target: String,
    /// Whether the target lives outside the package (TargetMode="External")
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type URI ends with the given short name
    /// (e.g. `"image"`, `"slideLayout"`).
    pub fn is_type(&self, short_name: &str) -> bool {
        self.rel_type.rsplit('/').next() == Some(short_name)
    }
}

/// Relationships of one package part, keyed by id and kept in file order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    ordered: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&idx| &self.ordered[idx])
    }

    /// First relationship with the given short type name.
    pub fn first_of_type(&self, short_name: &str) -> Option<&Relationship> {
        self.ordered.iter().find(|r| r.is_type(short_name))
    }

    /// Add a relationship. A duplicate id replaces the earlier entry.
    pub fn add(&mut self, rel: Relationship) {
        match self.by_id.get(&rel.id) {
            Some(&idx) => self.ordered[idx] = rel,
            None => {
                self.by_id.insert(rel.id.clone(), self.ordered.len());
                self.ordered.push(rel);
            }
        }
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterate in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.ordered.iter()
    }
}

/// Content types declared in `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Extension (lowercase, no dot) to content type
    defaults: HashMap<String, String>,
    /// Absolute part name without the leading slash to content type
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Parse the content of `[Content_Types].xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match e.name().local_name().as_ref() {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) =
                                (attr_value(e, b"Extension"), attr_value(e, b"ContentType"))
                            {
                                types.defaults.insert(ext.to_lowercase(), ct);
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) =
                                (attr_value(e, b"PartName"), attr_value(e, b"ContentType"))
                            {
                                let part = part.trim_start_matches('/').to_string();
                                types.overrides.insert(part, ct);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type of a part, checking overrides before extension defaults.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let part = part.trim_start_matches('/');
        if let Some(ct) = self.overrides.get(part) {
            return Some(ct);
        }
        let ext = Path::new(part).extension()?.to_str()?.to_lowercase();
        self.defaults.get(&ext).map(String::as_str)
    }
}

/// Read an attribute by local name as an owned, unescaped string.
pub(crate) fn attr_value(e: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local_name)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
        })
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let invalid = |e: std::string::FromUtf8Error| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    };

    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).map_err(invalid),
        [0xFF, 0xFE, rest @ ..] => {
            decode_utf16(rest, u16::from_le_bytes).map(|s| utf8_declaration(&s))
        }
        [0xFE, 0xFF, rest @ ..] => {
            decode_utf16(rest, u16::from_be_bytes).map(|s| utf8_declaration(&s))
        }
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
                decode_utf16(bytes, u16::from_le_bytes).map(|s| utf8_declaration(&s))
            }
            Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
                decode_utf16(bytes, u16::from_be_bytes).map(|s| utf8_declaration(&s))
            }
            Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// The decoded string is UTF-8 now; a declaration still claiming UTF-16
/// makes quick-xml misread it.
fn utf8_declaration(content: &str) -> String {
    if let (true, Some(end)) = (content.starts_with("<?xml"), content.find("?>")) {
        let (decl, rest) = content.split_at(end + 2);
        let decl = decl
            .replace("\"UTF-16\"", "\"UTF-8\"")
            .replace("'UTF-16'", "'UTF-8'")
            .replace("\"utf-16\"", "\"UTF-8\"")
            .replace("'utf-16'", "'UTF-8'");
        return format!("{}{}", decl, rest);
    }
    content.to_string()
}

/// Seekable byte source behind a container: a buffered file or memory.
trait PackageReader: Read + Seek {}

impl<T: Read + Seek> PackageReader for T {}

/// OOXML container abstraction over a ZIP archive.
///
/// Provides methods to read XML parts, binary parts, relationships and
/// content types from a presentation package.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Box<dyn PackageReader>>>,
    content_types: ContentTypes,
}

impl OoxmlContainer {
    /// Open a container from a file path.
    ///
    /// Parts are read from the file on demand, so only the part being
    /// read is held in memory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slideweight::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("deck.pptx")?;
    /// # Ok::<(), slideweight::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(Box::new(BufReader::new(file)))
    }

    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Box::new(Cursor::new(data)))
    }

    fn from_reader(reader: Box<dyn PackageReader>) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        let mut container = Self {
            archive: RefCell::new(archive),
            content_types: ContentTypes::default(),
        };
        let types_xml = container.read_xml("[Content_Types].xml")?;
        container.content_types = ContentTypes::parse(&types_xml)?;
        Ok(container)
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        // The declared size comes from the archive and is not trusted.
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().index_for_name(path).is_some()
    }

    /// Content type declared for a part.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        self.content_types.content_type_of(part)
    }

    /// Read the relationships of a part (`dir/_rels/name.rels`).
    ///
    /// A part without a .rels file has no relationships.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = match part_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None if part_path.is_empty() => "_rels/.rels".to_string(),
            None => format!("_rels/{}.rels", part_path),
        };

        if !self.exists(&rels_path) {
            return Ok(Relationships::new());
        }
        let content = self.read_xml(&rels_path)?;
        parse_relationships(&content)
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut parts: Vec<&str> = match base.rsplit_once('/') {
            Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        };
        for component in relative.split(['/', '\\']) {
            match component {
                ".." => {
                    parts.pop();
                }
                "." | "" => {}
                c => parts.push(c),
            }
        }
        parts.join("/")
    }
}

/// Parse the content of a .rels file.
pub fn parse_relationships(content: &str) -> Result<Relationships> {
    let mut rels = Relationships::new();
    if content.trim().is_empty() {
        return Ok(rels);
    }

    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_value(e, b"Id").unwrap_or_default();
                if !id.is_empty() {
                    rels.add(Relationship {
                        id,
                        rel_type: attr_value(e, b"Type").unwrap_or_default(),
                        target: attr_value(e, b"Target").unwrap_or_default(),
                        external: attr_value(e, b"TargetMode")
                            .is_some_and(|m| m.eq_ignore_ascii_case("external")),
                    });
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

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("parts", &self.archive.borrow().len())
            .finish()
    }
}
