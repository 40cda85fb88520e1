//! Shape scanning for slide, layout and master XML.
//!
//! Media-bearing shapes are `p:pic` elements. A plain picture references
//! its bytes through `a:blip r:embed`; a movie or sound keeps a poster
//! image in the blip and the media itself in `p14:media r:embed` (or the
//! older `a:videoFile`/`a:audioFile r:link`).

use crate::container::attr_value;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};

/// How a media-bearing shape holds its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Picture; the payload is the blip image
    Picture,
    /// Movie or sound; the payload is the linked media part
    Media,
}

/// On-slide size of a shape in EMU (914400 per inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub cx: u64,
    pub cy: u64,
}

/// A media reference found in part XML, before relationship resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRef {
    /// `cNvPr/@name`
    pub name: Option<String>,
    pub kind: ShapeKind,
    /// Relationship id of the payload
    pub rel_id: String,
    pub extent: Option<Extent>,
}

/// Everything the analysis needs from one part's XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeScan {
    /// `cSld/@name` (layouts and masters carry their display name here)
    pub name: Option<String>,
    /// Text of the first title placeholder, trimmed; `None` when empty
    pub title: Option<String>,
    /// Media references in document order
    pub refs: Vec<ShapeRef>,
}

#[derive(Default)]
struct PicState {
    name: Option<String>,
    blip_embed: Option<String>,
    media_embed: Option<String>,
    media_link: Option<String>,
    extent: Option<Extent>,
    in_sppr: bool,
}

impl PicState {
    fn into_ref(self) -> Option<ShapeRef> {
        let (kind, rel_id) = match (self.media_embed.or(self.media_link), self.blip_embed) {
            (Some(media), _) => (ShapeKind::Media, media),
            (None, Some(blip)) => (ShapeKind::Picture, blip),
            (None, None) => return None,
        };
        Some(ShapeRef {
            name: self.name,
            kind,
            rel_id,
            extent: self.extent,
        })
    }
}

#[derive(Default)]
struct TitleState {
    is_title: bool,
    in_text: bool,
    paragraphs: Vec<String>,
    current: String,
}

/// Scan part XML for media references and the title placeholder.
pub fn scan_shapes(xml: &str) -> Result<ShapeScan> {
    let mut scan = ShapeScan::default();
    let mut title_seen = false;
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut pic: Option<PicState> = None;
    let mut sp: Option<TitleState> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local = e.name().local_name();
                match local.as_ref() {
                    b"pic" => pic = Some(PicState::default()),
                    b"sp" if pic.is_none() => sp = Some(TitleState::default()),
                    b"spPr" => {
                        if let Some(p) = pic.as_mut() {
                            p.in_sppr = true;
                        }
                    }
                    b"t" => {
                        if let Some(s) = sp.as_mut() {
                            s.in_text = true;
                        }
                    }
                    _ => on_element(e, &mut scan, pic.as_mut(), sp.as_mut()),
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().local_name().as_ref() == b"br" {
                    if let Some(s) = sp.as_mut() {
                        s.current.push('\n');
                    }
                } else {
                    on_element(e, &mut scan, pic.as_mut(), sp.as_mut());
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(s) = sp.as_mut().filter(|s| s.in_text) {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    s.current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().local_name().as_ref() {
                b"pic" => {
                    if let Some(r) = pic.take().and_then(PicState::into_ref) {
                        scan.refs.push(r);
                    }
                }
                b"spPr" => {
                    if let Some(p) = pic.as_mut() {
                        p.in_sppr = false;
                    }
                }
                b"t" => {
                    if let Some(s) = sp.as_mut() {
                        s.in_text = false;
                    }
                }
                b"p" => {
                    if let Some(s) = sp.as_mut() {
                        let paragraph = std::mem::take(&mut s.current);
                        s.paragraphs.push(paragraph);
                    }
                }
                b"sp" => {
                    if let Some(s) = sp.take() {
                        if s.is_title && !title_seen {
                            title_seen = true;
                            let text = s.paragraphs.join("\n");
                            let text = text.trim();
                            scan.title = (!text.is_empty()).then(|| text.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(scan)
}

/// Attribute-bearing elements that may appear as either start or empty tags.
fn on_element(
    e: &BytesStart<'_>,
    scan: &mut ShapeScan,
    pic: Option<&mut PicState>,
    sp: Option<&mut TitleState>,
) {
    match e.name().local_name().as_ref() {
        b"cSld" => scan.name = attr_value(e, b"name").filter(|n| !n.is_empty()),
        b"ph" => {
            if let Some(s) = sp {
                let ph_type = attr_value(e, b"type");
                s.is_title = matches!(ph_type.as_deref(), Some("title") | Some("ctrTitle"));
            }
        }
        local => {
            let Some(p) = pic else { return };
            match local {
                b"cNvPr" if p.name.is_none() => p.name = attr_value(e, b"name"),
                b"blip" if p.blip_embed.is_none() => p.blip_embed = attr_value(e, b"embed"),
                b"media" => p.media_embed = attr_value(e, b"embed").or(p.media_embed.take()),
                b"videoFile" | b"audioFile" | b"quickTimeFile" => {
                    p.media_link = attr_value(e, b"link").or_else(|| attr_value(e, b"embed"));
                }
                b"ext" if p.in_sppr && p.extent.is_none() => {
                    let cx = attr_value(e, b"cx").and_then(|v| v.parse::<u64>().ok());
                    let cy = attr_value(e, b"cy").and_then(|v| v.parse::<u64>().ok());
                    if let (Some(cx), Some(cy)) = (cx, cy) {
                        p.extent = Some(Extent { cx, cy });
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:spTree>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
        <p:txBody><a:bodyPr/><a:p><a:r><a:t>Quarterly </a:t></a:r><a:r><a:t>Results</a:t></a:r></a:p></p:txBody>
      </p:sp>
      <p:pic>
        <p:nvPicPr><p:cNvPr id="4" name="Picture 3" descr="chart"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
        <p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>
        <p:spPr><a:xfrm><a:off x="914400" y="914400"/><a:ext cx="2743200" cy="2743200"/></a:xfrm></p:spPr>
      </p:pic>
      <p:pic>
        <p:nvPicPr><p:cNvPr id="5" name="clip.mp4"/><p:cNvPicPr/>
          <p:nvPr><a:videoFile r:link="rId4"/>
            <p:extLst><p:ext uri="{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}"><p14:media xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main" r:embed="rId3"/></p:ext></p:extLst>
          </p:nvPr>
        </p:nvPicPr>
        <p:blipFill><a:blip r:embed="rId5"/></p:blipFill>
        <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="457200"/></a:xfrm></p:spPr>
      </p:pic>
    </p:spTree>
  </p:cSld>
</p:sld>"#;

    #[test]
    fn test_scan_title_and_media() {
        let scan = scan_shapes(SLIDE).unwrap();
        assert_eq!(scan.title.as_deref(), Some("Quarterly Results"));
        assert_eq!(scan.refs.len(), 2);

        let picture = &scan.refs[0];
        assert_eq!(picture.kind, ShapeKind::Picture);
        assert_eq!(picture.rel_id, "rId2");
        assert_eq!(picture.name.as_deref(), Some("Picture 3"));
        assert_eq!(
            picture.extent,
            Some(Extent {
                cx: 2_743_200,
                cy: 2_743_200
            })
        );

        let movie = &scan.refs[1];
        assert_eq!(movie.kind, ShapeKind::Media);
        assert_eq!(movie.rel_id, "rId3");
        assert_eq!(movie.extent, Some(Extent { cx: 914_400, cy: 457_200 }));
    }

    #[test]
    fn test_scan_without_title() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Body text</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;
        let scan = scan_shapes(xml).unwrap();
        assert_eq!(scan.title, None);
        assert!(scan.refs.is_empty());
    }

    #[test]
    fn test_empty_title_is_none() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>   </a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;
        assert_eq!(scan_shapes(xml).unwrap().title, None);
    }

    #[test]
    fn test_multiline_title() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Line one</a:t></a:r><a:br/><a:r><a:t>Line two</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;
        assert_eq!(
            scan_shapes(xml).unwrap().title.as_deref(),
            Some("Line one\nLine two")
        );
    }

    #[test]
    fn test_layout_name_and_grouped_picture() {
        let xml = r#"<p:sldLayout xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld name="Title Only"><p:spTree>
            <p:grpSp><p:pic><p:nvPicPr><p:cNvPr id="7" name="Logo"/></p:nvPicPr>
              <p:blipFill><a:blip r:embed="rId9"/></p:blipFill><p:spPr/></p:pic></p:grpSp>
            </p:spTree></p:cSld></p:sldLayout>"#;
        let scan = scan_shapes(xml).unwrap();
        assert_eq!(scan.name.as_deref(), Some("Title Only"));
        assert_eq!(scan.refs.len(), 1);
        assert_eq!(scan.refs[0].rel_id, "rId9");
        assert_eq!(scan.refs[0].extent, None);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(scan_shapes("<p:sld><p:cSld></p:sld>").is_err());
    }
}
