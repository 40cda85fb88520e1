//! Synthetic .pptx packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// PNG signature and IHDR header for `width` x `height`, padded to `size` bytes.
pub fn png(width: u32, height: u32, size: usize, fill: u8) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0, 0, 0, 0, 0]);
    data.resize(size.max(data.len()), fill);
    data
}

/// JPEG SOI and SOF0 header for `width` x `height`, padded to `size` bytes.
pub fn jpeg(width: u16, height: u16, size: usize, fill: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    data.resize(size.max(data.len()), fill);
    data
}

/// One picture or movie placed on a part.
#[derive(Clone)]
pub struct Pic {
    /// File name under `ppt/media/`
    pub media: String,
    pub video: bool,
    /// Display size in EMU
    pub cx: u64,
    pub cy: u64,
}

impl Pic {
    pub fn image(media: &str) -> Self {
        Self {
            media: media.to_string(),
            video: false,
            cx: 914_400,
            cy: 914_400,
        }
    }

    pub fn video(media: &str) -> Self {
        Self {
            video: true,
            ..Self::image(media)
        }
    }

    /// Display size in 96-DPI pixels.
    pub fn sized_px(mut self, w: u64, h: u64) -> Self {
        self.cx = w * 9525;
        self.cy = h * 9525;
        self
    }
}

struct SlideSpec {
    title: Option<String>,
    layout: usize,
    pics: Vec<Pic>,
}

struct LayoutSpec {
    name: String,
    pics: Vec<Pic>,
}

/// Builder for a one-master presentation package.
pub struct DeckBuilder {
    media: Vec<(String, Vec<u8>)>,
    layouts: Vec<LayoutSpec>,
    master_pics: Vec<Pic>,
    slides: Vec<SlideSpec>,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckBuilder {
    /// A deck with a single "Title Slide" layout and no slides.
    pub fn new() -> Self {
        Self {
            media: Vec::new(),
            layouts: vec![LayoutSpec {
                name: "Title Slide".to_string(),
                pics: Vec::new(),
            }],
            master_pics: Vec::new(),
            slides: Vec::new(),
        }
    }

    pub fn media(mut self, name: &str, data: Vec<u8>) -> Self {
        self.media.push((name.to_string(), data));
        self
    }

    /// Add a layout; returns the deck. Layouts are numbered from 1 in order.
    pub fn layout(mut self, name: &str, pics: Vec<Pic>) -> Self {
        self.layouts.push(LayoutSpec {
            name: name.to_string(),
            pics,
        });
        self
    }

    pub fn master_pics(mut self, pics: Vec<Pic>) -> Self {
        self.master_pics = pics;
        self
    }

    /// Add a slide on layout 1.
    pub fn slide(self, title: Option<&str>, pics: Vec<Pic>) -> Self {
        self.slide_on(1, title, pics)
    }

    pub fn slide_on(mut self, layout: usize, title: Option<&str>, pics: Vec<Pic>) -> Self {
        self.slides.push(SlideSpec {
            title: title.map(String::from),
            layout,
            pics,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut add = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        add("[Content_Types].xml", content_types().as_bytes());
        add(
            "_rels/.rels",
            rels(&[(
                "rId1".to_string(),
                "officeDocument".to_string(),
                "ppt/presentation.xml".to_string(),
            )])
            .as_bytes(),
        );

        // Presentation
        let mut pres_rels = vec![(
            "rId1".to_string(),
            "slideMaster".to_string(),
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        let mut sld_ids = String::new();
        for i in 1..=self.slides.len() {
            let rid = format!("rId{}", 100 + i);
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 255 + i, rid));
            pres_rels.push((rid, "slide".to_string(), format!("slides/slide{}.xml", i)));
        }
        add(
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{sld_ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
            )
            .as_bytes(),
        );
        add("ppt/_rels/presentation.xml.rels", rels(&pres_rels).as_bytes());

        // Master
        let mut master_rels = Vec::new();
        let mut layout_ids = String::new();
        for i in 1..=self.layouts.len() {
            let rid = format!("rId{}", i);
            layout_ids.push_str(&format!(
                r#"<p:sldLayoutId id="{}" r:id="{}"/>"#,
                2147483648u64 + i as u64,
                rid
            ));
            master_rels.push((
                rid,
                "slideLayout".to_string(),
                format!("../slideLayouts/slideLayout{}.xml", i),
            ));
        }
        let master_tree = pictures(&self.master_pics, &mut master_rels, 50);
        add(
            "ppt/slideMasters/slideMaster1.xml",
            format!(
                r#"<p:sldMaster {NS}><p:cSld name="Office Theme"><p:spTree>{master_tree}</p:spTree></p:cSld><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst></p:sldMaster>"#
            )
            .as_bytes(),
        );
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&master_rels).as_bytes(),
        );

        // Layouts
        for (i, layout) in self.layouts.iter().enumerate() {
            let mut layout_rels = vec![(
                "rId1".to_string(),
                "slideMaster".to_string(),
                "../slideMasters/slideMaster1.xml".to_string(),
            )];
            let tree = pictures(&layout.pics, &mut layout_rels, 2);
            add(
                &format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
                format!(
                    r#"<p:sldLayout {NS}><p:cSld name="{}"><p:spTree>{tree}</p:spTree></p:cSld></p:sldLayout>"#,
                    layout.name
                )
                .as_bytes(),
            );
            add(
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&layout_rels).as_bytes(),
            );
        }

        // Slides
        for (i, slide) in self.slides.iter().enumerate() {
            let mut slide_rels = vec![(
                "rId1".to_string(),
                "slideLayout".to_string(),
                format!("../slideLayouts/slideLayout{}.xml", slide.layout),
            )];
            let title = slide
                .title
                .as_ref()
                .map(|t| {
                    let paragraphs: String = t
                        .split('\n')
                        .map(|line| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", line))
                        .collect();
                    format!(
                        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:bodyPr/>{paragraphs}</p:txBody></p:sp>"#
                    )
                })
                .unwrap_or_default();
            let tree = pictures(&slide.pics, &mut slide_rels, 2);
            add(
                &format!("ppt/slides/slide{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld><p:spTree>{title}{tree}</p:spTree></p:cSld></p:sld>"#
                )
                .as_bytes(),
            );
            add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                rels(&slide_rels).as_bytes(),
            );
        }

        for (name, data) in &self.media {
            add(&format!("ppt/media/{}", name), data);
        }

        zip.finish().unwrap().into_inner()
    }

    /// Write the package to `dir/name`.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

fn content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Default Extension="mp4" ContentType="video/mp4"/>
  <Default Extension="wav" ContentType="audio/wav"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#
        .to_string()
}

fn rels(entries: &[(String, String, String)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_NS, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Shape XML for `pics`, adding one relationship per picture.
fn pictures(pics: &[Pic], rels: &mut Vec<(String, String, String)>, first_rid: usize) -> String {
    let mut xml = String::new();
    for (i, pic) in pics.iter().enumerate() {
        let rid = format!("rId{}", first_rid + i);
        let target = format!("../media/{}", pic.media);
        let name = format!("Picture {}", i + 1);
        let ext = format!(
            r#"<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            pic.cx, pic.cy
        );
        if pic.video {
            rels.push((rid.clone(), "video".to_string(), target));
            xml.push_str(&format!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}"/><p:cNvPicPr/><p:nvPr><a:videoFile r:link="{}"/></p:nvPr></p:nvPicPr><p:blipFill/>{}</p:pic>"#,
                10 + i,
                name,
                rid,
                ext
            ));
        } else {
            rels.push((rid.clone(), "image".to_string(), target));
            xml.push_str(&format!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/></p:blipFill>{}</p:pic>"#,
                10 + i,
                name,
                rid,
                ext
            ));
        }
    }
    xml
}
