//! Media stored on slide masters and layouts.
//!
//! Pictures on a master or layout are saved in the package whether or not
//! any slide uses them, so a layout nobody picks can still carry megabytes
//! of artwork. This report only reads; it never rewrites the package.

use crate::error::Result;
use crate::model::{LayoutMediaStats, MasterMediaStats, MastersReport, MediaTotals};
use crate::pptx::{MediaShape, MediaSource, PptxParser};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Sum the media on every master and layout and mark unused layouts.
pub fn masters_report(parser: &PptxParser) -> Result<MastersReport> {
    let slides = parser.slides()?;
    let masters = parser.masters()?;
    info!("Analyzing {} slide masters", masters.len());

    let mut usage: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for slide in &slides {
        if let Some(layout) = &slide.layout {
            usage.entry(layout.as_str()).or_default().push(slide.index);
        }
    }

    let mut report = MastersReport {
        total_masters: masters.len(),
        ..Default::default()
    };

    for master in &masters {
        let media = sum_media(parser, &master.shapes, &master.part);
        report.total_master_media_bytes += media.total_media_bytes;

        let mut layouts = Vec::with_capacity(master.layouts.len());
        let mut total_layout_bytes = 0;
        let mut unused_layout_bytes = 0;

        for layout in &master.layouts {
            let media = sum_media(parser, &layout.shapes, &layout.part);
            let slides_using = usage.get(layout.part.as_str()).cloned().unwrap_or_default();
            let is_used = !slides_using.is_empty();

            total_layout_bytes += media.total_media_bytes;
            if !is_used {
                unused_layout_bytes += media.total_media_bytes;
                report.unused_layouts += 1;
            }

            layouts.push(LayoutMediaStats {
                layout_name: layout
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Layout {}", layout.index)),
                layout_index: layout.index,
                media,
                is_used,
                slides_using,
            });
        }

        report.total_layouts += layouts.len();
        report.total_layout_media_bytes += total_layout_bytes;
        report.unused_layout_media_bytes += unused_layout_bytes;
        report.masters.push(MasterMediaStats {
            master_index: master.index,
            master_name: master.name.clone(),
            media,
            layouts,
            total_layout_bytes,
            unused_layout_bytes,
        });
    }

    Ok(report)
}

fn sum_media(source: &dyn MediaSource, shapes: &[MediaShape], part: &str) -> MediaTotals {
    let mut totals = MediaTotals::default();
    for shape in shapes {
        match source.load(shape) {
            Ok(blob) => totals.add(blob.kind_for(shape.kind), blob.data.len() as u64),
            Err(e) => warn!("{}: skipped {}: {}", part, shape.label(), e),
        }
    }
    totals
}
