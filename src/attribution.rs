//! Two-pass attribution of media bytes to slides.
//!
//! Pass 1 ([`discover`]) loads every media payload once, registers it and
//! records where it was placed. Pass 2 ([`attribute`]) decides per placement
//! how many bytes the slide is charged, which needs the complete slide set
//! of every object and so cannot start before discovery finishes.

use crate::model::{MediaItem, MediaKind, SlideMediaStats};
use crate::pptx::{Extent, MediaSource, Slide};
use crate::registry::{MediaKey, MediaRegistry};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// How bytes of media shared between slides are charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedMediaPolicy {
    /// Charge shared media only to the first slide using it
    #[default]
    IgnoreShared,
    /// Charge shared media to every slide using it
    IncludeShared,
}

/// One media object placed on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub key: MediaKey,
    pub slide_index: usize,
    pub kind: MediaKind,
    pub rel_id: String,
    pub shape_name: Option<String>,
    /// Display size in EMU
    pub extent: Option<Extent>,
}

/// A media shape that was skipped because its payload could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaWarning {
    pub slide_index: usize,
    pub shape_name: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for MediaWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "slide {}: skipped {}: {}",
            self.slide_index,
            self.shape_name.as_deref().unwrap_or("(unnamed shape)"),
            self.reason
        )
    }
}

/// Result of the discovery pass.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub registry: MediaRegistry,
    /// Placements per slide index, in shape order
    pub placements: BTreeMap<usize, Vec<Placement>>,
    pub warnings: Vec<MediaWarning>,
}

impl Discovery {
    /// Placements on one slide.
    pub fn placements_on(&self, slide_index: usize) -> &[Placement] {
        self.placements
            .get(&slide_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Pass 1: register every media payload referenced by `slides`.
pub fn discover(slides: &[Slide], source: &dyn MediaSource) -> Discovery {
    let mut discovery = Discovery::default();

    for slide in slides {
        let mut placements = Vec::with_capacity(slide.shapes.len());

        for shape in &slide.shapes {
            let blob = match source.load(shape) {
                Ok(blob) => blob,
                Err(e) => {
                    let warning = MediaWarning {
                        slide_index: slide.index,
                        shape_name: shape.name.clone(),
                        reason: e.to_string(),
                    };
                    warn!("{}", warning);
                    discovery.warnings.push(warning);
                    continue;
                }
            };

            let kind = blob.kind_for(shape.kind);
            let key = discovery.registry.register(
                slide.index,
                &blob.data,
                kind,
                blob.content_type,
                blob.filename,
            );
            placements.push(Placement {
                key,
                slide_index: slide.index,
                kind,
                rel_id: shape.rel_id.clone(),
                shape_name: shape.name.clone(),
                extent: shape.extent,
            });
        }

        debug!("slide {}: {} media placements", slide.index, placements.len());
        discovery.placements.insert(slide.index, placements);
    }

    info!(
        "discovered {} distinct media objects ({} bytes) across {} slides",
        discovery.registry.len(),
        discovery.registry.unique_bytes(),
        slides.len()
    );
    discovery
}

/// Pass 2: charge media bytes to slides according to `policy`.
///
/// Returns one entry per slide in document order. A second placement of the
/// same object on one slide is listed but charged nothing, so each distinct
/// (slide, object) pair is counted once.
pub fn attribute(
    slides: &[Slide],
    discovery: &Discovery,
    policy: SharedMediaPolicy,
) -> Vec<SlideMediaStats> {
    slides
        .iter()
        .map(|slide| {
            let mut stats = SlideMediaStats::new(slide.index, slide.title.clone());
            let mut charged: HashSet<MediaKey> = HashSet::new();

            for placement in discovery.placements_on(slide.index) {
                let Some(entry) = discovery.registry.get(&placement.key) else {
                    continue;
                };

                let eligible = match policy {
                    SharedMediaPolicy::IncludeShared => true,
                    SharedMediaPolicy::IgnoreShared => entry.first_slide() == Some(slide.index),
                };
                let attributed = if eligible && charged.insert(placement.key) {
                    entry.size
                } else {
                    0
                };

                stats.push_item(MediaItem {
                    kind: entry.kind,
                    size_bytes: entry.size,
                    attributed_bytes: attributed,
                    filename: entry.filename.clone(),
                    content_type: entry.content_type.clone(),
                    relationship_id: Some(placement.rel_id.clone()),
                    shared: entry.is_shared(),
                });
            }

            stats
        })
        .collect()
}

/// Sort by total media bytes descending; ties go to the lower slide index.
pub fn rank(stats: &mut [SlideMediaStats]) {
    stats.sort_by(|a, b| {
        b.total_media_bytes
            .cmp(&a.total_media_bytes)
            .then(a.slide_index.cmp(&b.slide_index))
    });
}

/// Run both passes and rank the result.
pub fn analyze(
    slides: &[Slide],
    source: &dyn MediaSource,
    policy: SharedMediaPolicy,
) -> (Vec<SlideMediaStats>, Discovery) {
    let discovery = discover(slides, source);
    let mut stats = attribute(slides, &discovery, policy);
    rank(&mut stats);
    (stats, discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::pptx::{MediaBlob, MediaShape, MediaTarget, ShapeKind};
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Media parts held in memory, keyed by part path.
    #[derive(Default)]
    struct MemorySource {
        parts: HashMap<String, Vec<u8>>,
    }

    impl MemorySource {
        fn with(mut self, part: &str, data: Vec<u8>) -> Self {
            self.parts.insert(part.to_string(), data);
            self
        }
    }

    impl MediaSource for MemorySource {
        fn load(&self, shape: &MediaShape) -> Result<MediaBlob> {
            match &shape.target {
                MediaTarget::Part(part) => {
                    let data = self
                        .parts
                        .get(part)
                        .cloned()
                        .ok_or_else(|| Error::MissingComponent(part.clone()))?;
                    Ok(MediaBlob {
                        data,
                        content_type: None,
                        filename: part.rsplit('/').next().map(String::from),
                    })
                }
                other => Err(Error::MissingComponent(format!("{:?}", other))),
            }
        }
    }

    fn picture(part: &str) -> MediaShape {
        MediaShape {
            name: Some(format!("Picture {}", part)),
            kind: ShapeKind::Picture,
            rel_id: "rId2".to_string(),
            target: MediaTarget::Part(part.to_string()),
            extent: None,
        }
    }

    fn slide(index: usize, shapes: Vec<MediaShape>) -> Slide {
        Slide {
            index,
            title: None,
            part: format!("ppt/slides/slide{}.xml", index),
            layout: None,
            shapes,
        }
    }

    fn totals(stats: &[SlideMediaStats]) -> Vec<u64> {
        stats.iter().map(|s| s.total_media_bytes).collect()
    }

    #[test]
    fn test_shared_image_policies() {
        let source = MemorySource::default().with("media/big.png", vec![7u8; 500_000]);
        let slides: Vec<_> = (1..=5)
            .map(|i| {
                let shapes = if i == 3 || i == 4 {
                    vec![picture("media/big.png")]
                } else {
                    vec![]
                };
                slide(i, shapes)
            })
            .collect();

        let discovery = discover(&slides, &source);
        let ignore = attribute(&slides, &discovery, SharedMediaPolicy::IgnoreShared);
        assert_eq!(totals(&ignore), vec![0, 0, 500_000, 0, 0]);
        assert!(ignore[3].media_items[0].shared);
        assert_eq!(ignore[3].media_items[0].size_bytes, 500_000);
        assert_eq!(ignore[3].media_items[0].attributed_bytes, 0);

        let include = attribute(&slides, &discovery, SharedMediaPolicy::IncludeShared);
        assert_eq!(totals(&include), vec![0, 0, 500_000, 500_000, 0]);
        assert_eq!(include[2].image_bytes, 500_000);
    }

    #[test]
    fn test_empty_deck() {
        let slides: Vec<_> = (1..=4).map(|i| slide(i, vec![])).collect();
        let (stats, discovery) =
            analyze(&slides, &MemorySource::default(), SharedMediaPolicy::default());
        assert_eq!(stats.len(), 4);
        assert!(stats.iter().all(|s| s.total_media_bytes == 0));
        assert_eq!(
            stats.iter().map(|s| s.slide_index).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(discovery.registry.is_empty());
    }

    #[test]
    fn test_rank_ties_by_slide_index() {
        let mut stats: Vec<_> = [0u64, 500_000, 500_000, 200_000]
            .iter()
            .enumerate()
            .map(|(i, &bytes)| {
                let mut s = SlideMediaStats::new(i + 1, None);
                s.image_bytes = bytes;
                s.total_media_bytes = bytes;
                s
            })
            .collect();
        rank(&mut stats);
        assert_eq!(
            stats.iter().map(|s| s.slide_index).collect::<Vec<_>>(),
            vec![2, 3, 4, 1]
        );
    }

    #[test]
    fn test_unreadable_media_is_skipped_with_warning() {
        let source = MemorySource::default().with("media/a.png", vec![1u8; 10]);
        let mut external = picture("media/clip.mp4");
        external.kind = ShapeKind::Media;
        external.target = MediaTarget::External("file:///clip.mp4".into());
        let slides = vec![slide(
            1,
            vec![picture("media/a.png"), external, picture("media/missing.png")],
        )];

        let (stats, discovery) = analyze(&slides, &source, SharedMediaPolicy::IgnoreShared);
        assert_eq!(stats[0].total_media_bytes, 10);
        assert_eq!(stats[0].media_items.len(), 1);
        assert_eq!(discovery.warnings.len(), 2);
        assert_eq!(discovery.warnings[0].slide_index, 1);
        assert_eq!(
            discovery.warnings[0].shape_name.as_deref(),
            Some("Picture media/clip.mp4")
        );
    }

    #[test]
    fn test_duplicate_placement_on_one_slide_charged_once() {
        let source = MemorySource::default().with("media/logo.png", vec![3u8; 1000]);
        let slides = vec![slide(
            1,
            vec![picture("media/logo.png"), picture("media/logo.png")],
        )];

        let discovery = discover(&slides, &source);
        for policy in [
            SharedMediaPolicy::IgnoreShared,
            SharedMediaPolicy::IncludeShared,
        ] {
            let stats = attribute(&slides, &discovery, policy);
            assert_eq!(stats[0].total_media_bytes, 1000);
            assert_eq!(stats[0].media_items.len(), 2);
            assert!(!stats[0].media_items[1].shared);
            assert_eq!(stats[0].media_items[1].attributed_bytes, 0);
        }
    }

    #[test]
    fn test_identical_bytes_under_different_names() {
        let source = MemorySource::default()
            .with("media/image1.png", vec![9u8; 300])
            .with("media/image2.png", vec![9u8; 300]);
        let slides = vec![
            slide(1, vec![picture("media/image1.png")]),
            slide(2, vec![picture("media/image2.png")]),
        ];

        let (stats, discovery) = analyze(&slides, &source, SharedMediaPolicy::IgnoreShared);
        assert_eq!(discovery.registry.len(), 1);
        assert_eq!(totals(&stats), vec![300, 0]);
        assert!(stats[1].media_items[0].shared);
    }

    fn deck_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<Vec<usize>>)> {
        (
            prop::collection::vec(1usize..2000, 1..6),
            prop::collection::vec(prop::collection::vec(0usize..6, 0..5), 0..8),
        )
    }

    proptest! {
        #[test]
        fn prop_bytes_are_conserved((sizes, decks) in deck_strategy()) {
            let mut source = MemorySource::default();
            for (i, size) in sizes.iter().enumerate() {
                // Distinct fill byte per object keeps payloads distinct.
                source = source.with(&format!("m{}", i), vec![i as u8; *size]);
            }
            let slides: Vec<_> = decks
                .iter()
                .enumerate()
                .map(|(i, refs)| {
                    let shapes = refs
                        .iter()
                        .map(|r| picture(&format!("m{}", r % sizes.len())))
                        .collect();
                    slide(i + 1, shapes)
                })
                .collect();

            let discovery = discover(&slides, &source);
            let ignore = attribute(&slides, &discovery, SharedMediaPolicy::IgnoreShared);
            let include = attribute(&slides, &discovery, SharedMediaPolicy::IncludeShared);

            prop_assert_eq!(
                ignore.iter().map(|s| s.total_media_bytes).sum::<u64>(),
                discovery.registry.unique_bytes()
            );
            prop_assert_eq!(
                include.iter().map(|s| s.total_media_bytes).sum::<u64>(),
                discovery.registry.referenced_bytes()
            );
            for s in ignore.iter().chain(include.iter()) {
                prop_assert_eq!(
                    s.total_media_bytes,
                    s.image_bytes + s.video_bytes + s.audio_bytes + s.other_media_bytes
                );
            }
        }

        #[test]
        fn prop_analysis_is_deterministic((sizes, decks) in deck_strategy()) {
            let mut source = MemorySource::default();
            for (i, size) in sizes.iter().enumerate() {
                source = source.with(&format!("m{}", i), vec![i as u8; *size]);
            }
            let slides: Vec<_> = decks
                .iter()
                .enumerate()
                .map(|(i, refs)| {
                    let shapes = refs
                        .iter()
                        .map(|r| picture(&format!("m{}", r % sizes.len())))
                        .collect();
                    slide(i + 1, shapes)
                })
                .collect();

            let (first, _) = analyze(&slides, &source, SharedMediaPolicy::IgnoreShared);
            let (second, _) = analyze(&slides, &source, SharedMediaPolicy::IgnoreShared);
            prop_assert_eq!(first, second);
        }
    }
}
