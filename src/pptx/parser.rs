//! PPTX package reader: slides, masters, layouts and their media.

use super::shapes::{scan_shapes, Extent, ShapeKind, ShapeRef};
use crate::container::{attr_value, OoxmlContainer, Relationships};
use crate::detect::PPTX_CONTENT_TYPE;
use crate::error::{Error, Result};
use crate::model::MediaKind;
use quick_xml::events::Event;
use std::path::Path;
use tracing::debug;

/// Default location of the main presentation part.
const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Where a shape's payload lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTarget {
    /// A part inside the package (absolute path, no leading slash)
    Part(String),
    /// A file or URL outside the package
    External(String),
    /// The relationship id is not declared by the part
    Unresolved,
}

/// A media-bearing shape with its relationship resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaShape {
    pub name: Option<String>,
    pub kind: ShapeKind,
    pub rel_id: String,
    pub target: MediaTarget,
    /// On-slide size in EMU
    pub extent: Option<Extent>,
}

impl MediaShape {
    /// Shape name for log lines.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed shape)")
    }
}

/// One slide in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// 1-based position in the presentation
    pub index: usize,
    pub title: Option<String>,
    /// Part path, e.g. `ppt/slides/slide3.xml`
    pub part: String,
    /// Part path of the layout the slide is based on
    pub layout: Option<String>,
    pub shapes: Vec<MediaShape>,
}

/// A slide layout belonging to a master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPart {
    /// 1-based position within the master
    pub index: usize,
    pub part: String,
    pub name: Option<String>,
    pub shapes: Vec<MediaShape>,
}

/// A slide master with its layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPart {
    /// 1-based position in the presentation
    pub index: usize,
    pub part: String,
    pub name: Option<String>,
    pub shapes: Vec<MediaShape>,
    pub layouts: Vec<LayoutPart>,
}

/// Raw bytes of one media object, held only while it is being registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    /// Part file name, e.g. `image1.png`
    pub filename: Option<String>,
}

impl MediaBlob {
    /// Media kind for a blob loaded through `shape`.
    ///
    /// Pictures are always images; movie and sound shapes are classified by
    /// content type, then by file extension.
    pub fn kind_for(&self, shape: ShapeKind) -> MediaKind {
        match shape {
            ShapeKind::Picture => MediaKind::Image,
            ShapeKind::Media => match (&self.content_type, &self.filename) {
                (Some(ct), _) if MediaKind::from_content_type(ct) != MediaKind::Other => {
                    MediaKind::from_content_type(ct)
                }
                (_, Some(name)) => Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(MediaKind::from_extension)
                    .unwrap_or(MediaKind::Other),
                _ => MediaKind::Other,
            },
        }
    }
}

/// Loads the bytes behind a media shape.
///
/// The attribution engine only sees slides through this trait, so it can
/// run against an in-memory deck in tests.
pub trait MediaSource {
    fn load(&self, shape: &MediaShape) -> Result<MediaBlob>;
}

/// Reader for PPTX (PowerPoint) presentations.
pub struct PptxParser {
    container: OoxmlContainer,
    slide_parts: Vec<String>,
    master_parts: Vec<String>,
}

impl PptxParser {
    /// Open a PPTX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let package_rels = container.read_relationships("")?;
        let main_part = package_rels
            .first_of_type("officeDocument")
            .map(|r| OoxmlContainer::resolve_path("", &r.target))
            .unwrap_or_else(|| PRESENTATION_PART.to_string());

        match container.content_type_of(&main_part) {
            Some(ct) if ct == PPTX_CONTENT_TYPE || ct.contains("presentationml") => {}
            Some(ct) => {
                return Err(Error::CorruptDocument(format!(
                    "{} is not a presentation part ({})",
                    main_part, ct
                )))
            }
            None if container.exists(&main_part) => {}
            None => return Err(Error::MissingComponent(main_part)),
        }

        let xml = container.read_xml(&main_part)?;
        let rels = container.read_relationships(&main_part)?;
        let slide_parts = resolve_id_list(&xml, b"sldId", &main_part, &rels)?;
        let master_parts = resolve_id_list(&xml, b"sldMasterId", &main_part, &rels)?;
        debug!(
            "{}: {} slides, {} masters",
            main_part,
            slide_parts.len(),
            master_parts.len()
        );

        Ok(Self {
            container,
            slide_parts,
            master_parts,
        })
    }

    /// Number of slides listed in the presentation.
    pub fn slide_count(&self) -> usize {
        self.slide_parts.len()
    }

    /// Read every slide in document order.
    pub fn slides(&self) -> Result<Vec<Slide>> {
        self.slide_parts
            .iter()
            .enumerate()
            .map(|(idx, part)| {
                let xml = self.container.read_xml(part)?;
                let rels = self.container.read_relationships(part)?;
                let scan = scan_shapes(&xml)?;
                let layout = rels
                    .first_of_type("slideLayout")
                    .map(|r| OoxmlContainer::resolve_path(part, &r.target));

                Ok(Slide {
                    index: idx + 1,
                    title: scan.title,
                    part: part.clone(),
                    layout,
                    shapes: resolve_shapes(scan.refs, part, &rels),
                })
            })
            .collect()
    }

    /// Read every slide master and its layouts.
    pub fn masters(&self) -> Result<Vec<MasterPart>> {
        let mut masters = Vec::with_capacity(self.master_parts.len());

        for (idx, part) in self.master_parts.iter().enumerate() {
            let xml = self.container.read_xml(part)?;
            let rels = self.container.read_relationships(part)?;
            let scan = scan_shapes(&xml)?;

            let mut layouts = Vec::new();
            for (layout_idx, layout_part) in resolve_id_list(&xml, b"sldLayoutId", part, &rels)?
                .into_iter()
                .enumerate()
            {
                let layout_xml = self.container.read_xml(&layout_part)?;
                let layout_rels = self.container.read_relationships(&layout_part)?;
                let layout_scan = scan_shapes(&layout_xml)?;
                layouts.push(LayoutPart {
                    index: layout_idx + 1,
                    name: layout_scan.name,
                    shapes: resolve_shapes(layout_scan.refs, &layout_part, &layout_rels),
                    part: layout_part,
                });
            }

            masters.push(MasterPart {
                index: idx + 1,
                part: part.clone(),
                name: scan.name,
                shapes: resolve_shapes(scan.refs, part, &rels),
                layouts,
            });
        }

        Ok(masters)
    }
}

impl MediaSource for PptxParser {
    fn load(&self, shape: &MediaShape) -> Result<MediaBlob> {
        match &shape.target {
            MediaTarget::Part(part) => {
                let data = self.container.read_binary(part)?;
                let content_type = self
                    .container
                    .content_type_of(part)
                    .map(String::from)
                    .or_else(|| guess_mime_type(part));
                Ok(MediaBlob {
                    data,
                    content_type,
                    filename: part.rsplit('/').next().map(String::from),
                })
            }
            MediaTarget::External(target) => Err(Error::MissingComponent(format!(
                "externally linked media {}",
                target
            ))),
            MediaTarget::Unresolved => Err(Error::MissingComponent(format!(
                "relationship {} is not declared",
                shape.rel_id
            ))),
        }
    }
}

/// Resolve the `r:id`s of an id list (`sldId`, `sldMasterId`, `sldLayoutId`)
/// to part paths, in document order.
fn resolve_id_list(
    xml: &str,
    element: &[u8],
    base_part: &str,
    rels: &Relationships,
) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().local_name().as_ref() == element =>
            {
                // The relationship id is the prefixed `r:id`; the bare `id` is numeric.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() != b"id" && a.key.local_name().as_ref() == b"id")
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());

                match rel_id.as_deref().and_then(|id| rels.get(id)) {
                    Some(rel) => parts.push(OoxmlContainer::resolve_path(base_part, &rel.target)),
                    None => {
                        return Err(Error::MissingComponent(format!(
                            "{} relationship {:?} in {}",
                            String::from_utf8_lossy(element),
                            rel_id.or_else(|| attr_value(e, b"id")).unwrap_or_default(),
                            base_part
                        )))
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(parts)
}

fn resolve_shapes(refs: Vec<ShapeRef>, part: &str, rels: &Relationships) -> Vec<MediaShape> {
    refs.into_iter()
        .map(|r| {
            let target = match rels.get(&r.rel_id) {
                Some(rel) if rel.external => MediaTarget::External(rel.target.clone()),
                Some(rel) => MediaTarget::Part(OoxmlContainer::resolve_path(part, &rel.target)),
                None => MediaTarget::Unresolved,
            };
            MediaShape {
                name: r.name,
                kind: r.kind,
                rel_id: r.rel_id,
                target,
                extent: r.extent,
            }
        })
        .collect()
}

/// Guess MIME type from file extension.
fn guess_mime_type(path: &str) -> Option<String> {
    let ext = path.rsplit('.').next()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        _ => return None,
    };
    Some(mime.to_string())
}


impl std::fmt::Debug for PptxParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PptxParser")
            .field("slide_parts", &self.slide_parts)
            .field("master_parts", &self.master_parts)
            .finish_non_exhaustive()
    }
}
