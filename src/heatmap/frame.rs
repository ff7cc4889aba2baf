use crate::aggregate::{AggregateOptions, HeatData, RegionStats};
use crate::format::format_duration;
use crate::geometry::{classify_aspect, combined_bounds, to_pixel_rect, Aspect, PixelRect};
use crate::heatmap::color::{band_for, intensity, BandColor};
use crate::layout::{LayoutMetadata, RegionDefinition};
use crate::regions::RegionSnapshot;
use std::collections::HashMap;

/// Combined regions shrink their label placement rectangle so the text does
/// not dominate the merged bounding box.
const COMBINED_LABEL_SHRINK: f32 = 0.7;

/// Text placement for one region label: centered, aspect-oriented, with a
/// white outline stroke under black fill.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    pub text: String,
    pub center: (f32, f32),
    pub font_size: f32,
    pub outline_width: f32,
    /// Rotate 90 degrees counter-clockwise (tall narrow regions).
    pub rotated: bool,
}

/// One tinted rectangle of the frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPaint {
    pub name: String,
    pub rect: PixelRect,
    pub color: BandColor,
    pub label: Option<LabelPlan>,
}

/// Hit geometry plus the stats behind it, recorded per render pass for the
/// tooltip overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub rect: PixelRect,
    pub stats: RegionStats,
}

/// Everything one heatmap redraw produces besides pixels. Handed to the
/// overlay as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapFrame {
    pub paints: Vec<RegionPaint>,
    pub hit_regions: HashMap<String, HitRegion>,
    pub canvas_size: (f32, f32),
}

/// The layout's regions with active combinations substituted in: members are
/// replaced by their combination's bounding box. A combination none of whose
/// members exist in this floor plan is skipped; with a partial overlap the
/// bounding box covers the members that do exist, since records for those
/// members still aggregate under the combination name.
pub fn effective_regions(
    layout: &LayoutMetadata,
    snapshot: &RegionSnapshot,
) -> Vec<RegionDefinition> {
    let mut regions: Vec<RegionDefinition> = layout
        .regions
        .iter()
        .filter(|r| snapshot.resolve(&r.name) == r.name)
        .cloned()
        .collect();

    for combination in &snapshot.combinations {
        let members: Vec<&RegionDefinition> = combination
            .regions
            .iter()
            .filter_map(|name| layout.region(name))
            .collect();
        match combined_bounds(&combination.name, &members) {
            Some(bounds) => regions.push(bounds),
            None => {
                tracing::debug!(
                    combination = %combination.name,
                    "no member regions in the loaded floor plan, skipping"
                );
            }
        }
    }

    regions
}

/// Heuristic font size: shrink for longer labels so text rarely overflows
/// small regions. Not exact text measurement; very long names may still
/// overflow, which is accepted.
pub fn font_size_for(text: &str, rect: &PixelRect) -> f32 {
    let longest = rect.width.max(rect.height);
    let divisor = if text.len() > 8 { 8.0 } else { 5.0 };
    (longest * 0.8 / divisor).min(longest * 0.8)
}

fn label_plan(text: String, rect: &PixelRect) -> LabelPlan {
    let font_size = font_size_for(&text, rect);
    LabelPlan {
        center: rect.center(),
        rotated: classify_aspect(rect.width, rect.height) == Aspect::Vertical,
        outline_width: font_size / 8.0,
        font_size,
        text,
    }
}

/// Plans one heatmap frame: per effective region with stats, a banded tint
/// rectangle, a centered label when there is any recorded duration, and a
/// tooltip hit region.
pub fn plan_frame(
    layout: &LayoutMetadata,
    snapshot: &RegionSnapshot,
    heat: &HeatData,
    options: AggregateOptions,
    canvas_width: f32,
    canvas_height: f32,
) -> HeatmapFrame {
    let show_instances = options.show_instances;
    let mut frame = HeatmapFrame {
        canvas_size: (canvas_width, canvas_height),
        ..HeatmapFrame::default()
    };

    // With combining disabled the raw layout regions render as-is; the stats
    // map is keyed by raw names in that mode too.
    let regions = if options.use_combined_regions {
        effective_regions(layout, snapshot)
    } else {
        layout.regions.clone()
    };

    for region in regions {
        let Some(stats) = heat.region_stats.get(&region.name) else {
            continue;
        };

        let metric_intensity = if show_instances {
            intensity(stats.instance_count as f64, heat.max_count as f64)
        } else {
            intensity(stats.total_duration, heat.max_duration)
        };

        let rect = to_pixel_rect(&region, canvas_width, canvas_height);
        let is_combined =
            options.use_combined_regions && snapshot.combination(&region.name).is_some();

        let label = if stats.total_duration > 0.0 {
            let text = if show_instances {
                stats.instance_count.to_string()
            } else {
                format_duration(stats.total_duration)
            };
            let label_rect = if is_combined {
                rect.shrink_centered(COMBINED_LABEL_SHRINK)
            } else {
                rect
            };
            Some(label_plan(text, &label_rect))
        } else {
            None
        };

        frame.hit_regions.insert(
            region.name.clone(),
            HitRegion {
                rect,
                stats: stats.clone(),
            },
        );
        frame.paints.push(RegionPaint {
            name: region.name,
            rect,
            color: band_for(metric_intensity).color(),
            label,
        });
    }

    frame
}
