use crate::dataset::ActivityRecord;
use crate::geometry::{to_pixel_rect, PixelRect};
use crate::heatmap::color::intensity;
use crate::layout::{parse_hex_color, LayoutMetadata};
use eframe::egui;
use std::collections::BTreeMap;

/// Reference canvas width the indicator radius was tuned against.
const INDICATOR_BASE_WIDTH: f32 = 800.0;
const INDICATOR_BASE_RADIUS: f32 = 25.0;
/// A pie indicator shows at most this many employees.
const MAX_PIE_SLICES: usize = 8;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fixed employee color palette, assigned by a stable hash of the id.
const EMPLOYEE_COLORS: [[u8; 3]; 8] = [
    [66, 133, 244],
    [219, 68, 55],
    [244, 180, 0],
    [15, 157, 88],
    [171, 71, 188],
    [0, 172, 193],
    [255, 112, 67],
    [158, 157, 36],
];

pub fn employee_color(employee_id: &str) -> [u8; 3] {
    // Ids look like "emp-7"; use the numeric suffix when present so colors
    // stay stable across sessions, otherwise fall back to a byte sum.
    let index = employee_id
        .rsplit('-')
        .next()
        .and_then(|suffix| suffix.parse::<usize>().ok())
        .unwrap_or_else(|| employee_id.bytes().map(usize::from).sum());
    EMPLOYEE_COLORS[index % EMPLOYEE_COLORS.len()]
}

/// Playback clock for the animated timeline, in seconds since midnight.
/// Wraps at midnight; speed is a multiplier over wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    pub seconds: f64,
    pub playing: bool,
    pub speed: f32,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            seconds: 8.0 * 3600.0,
            playing: false,
            speed: 60.0,
        }
    }
}

impl PlaybackClock {
    pub fn tick(&mut self, wall_dt: f32) {
        if !self.playing {
            return;
        }
        self.seconds = (self.seconds + wall_dt as f64 * self.speed as f64) % SECONDS_PER_DAY;
    }

    pub fn scrub(&mut self, seconds: f64) {
        self.seconds = seconds.clamp(0.0, SECONDS_PER_DAY - 1.0);
    }
}

/// One employee indicator: a disc at the region center, sliced per employee
/// currently active there. The occupied region itself is outlined in its
/// label color.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPlan {
    pub region: String,
    pub rect: PixelRect,
    pub center: (f32, f32),
    pub radius: f32,
    pub outline: [u8; 3],
    pub employee_colors: Vec<[u8; 3]>,
}

/// Groups the currently active records by region and places one indicator at
/// each occupied region's center. Radius scales with canvas width.
pub fn plan_indicators(
    layout: &LayoutMetadata,
    active: &[&ActivityRecord],
    canvas_width: f32,
    canvas_height: f32,
) -> Vec<IndicatorPlan> {
    let mut by_region: BTreeMap<&str, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in active {
        by_region.entry(record.region.as_str()).or_default().push(record);
    }

    let radius = INDICATOR_BASE_RADIUS * (canvas_width / INDICATOR_BASE_WIDTH);
    let mut plans = Vec::new();
    for (region_name, records) in by_region {
        let Some(region) = layout.region(region_name) else {
            continue;
        };
        let rect = to_pixel_rect(region, canvas_width, canvas_height);
        let outline = layout
            .label_color(&region.label_id)
            .map(parse_hex_color)
            .unwrap_or([204, 204, 204]);
        let employee_colors = records
            .iter()
            .take(MAX_PIE_SLICES)
            .map(|r| employee_color(&r.employee_id))
            .collect();
        plans.push(IndicatorPlan {
            region: region_name.to_string(),
            center: rect.center(),
            rect,
            radius,
            outline,
            employee_colors,
        });
    }
    plans
}

/// One region's tint in the live overlay: intensity is this region's share
/// of the hottest region's currently active duration.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveHeatCell {
    pub region: String,
    pub rect: PixelRect,
    pub intensity: f32,
}

/// Sums the duration of the currently active records per region and
/// normalizes against the busiest one. Regions without active records are
/// omitted; they would render fully transparent anyway.
pub fn plan_live_heat(
    layout: &LayoutMetadata,
    active: &[&ActivityRecord],
    canvas_width: f32,
    canvas_height: f32,
) -> Vec<LiveHeatCell> {
    let mut durations: BTreeMap<&str, f64> = BTreeMap::new();
    for record in active {
        *durations.entry(record.region.as_str()).or_default() += record.duration;
    }
    let max_duration = durations.values().copied().fold(0.0_f64, f64::max);

    let mut cells = Vec::new();
    for (region_name, duration) in durations {
        let Some(region) = layout.region(region_name) else {
            continue;
        };
        cells.push(LiveHeatCell {
            region: region_name.to_string(),
            rect: to_pixel_rect(region, canvas_width, canvas_height),
            intensity: intensity(duration, max_duration) as f32,
        });
    }
    cells
}

/// Paints the live overlay as red tints whose opacity tracks intensity,
/// capped at 0.7 so the floor plan stays readable underneath.
pub fn draw_live_heat(
    painter: &egui::Painter,
    canvas_rect: egui::Rect,
    canvas_size: (f32, f32),
    cells: &[LiveHeatCell],
) {
    if canvas_size.0 <= 0.0 {
        return;
    }
    let scale = canvas_rect.width() / canvas_size.0;

    for cell in cells {
        let min = canvas_rect.min + egui::vec2(cell.rect.x * scale, cell.rect.y * scale);
        let size = egui::vec2(cell.rect.width * scale, cell.rect.height * scale);
        let alpha = (cell.intensity.clamp(0.0, 1.0) * 0.7 * 255.0) as u8;
        painter.rect_filled(
            egui::Rect::from_min_size(min, size),
            0.0,
            egui::Color32::from_rgba_unmultiplied(255, 0, 0, alpha),
        );
    }
}

/// Paints the indicators into the displayed canvas rectangle. Each occupied
/// region is outlined in its label color; one employee fills the disc at its
/// center, several split it into pie slices over a white backing disc with a
/// black outline.
pub fn draw_indicators(
    painter: &egui::Painter,
    canvas_rect: egui::Rect,
    canvas_size: (f32, f32),
    plans: &[IndicatorPlan],
) {
    if canvas_size.0 <= 0.0 {
        return;
    }
    let scale = canvas_rect.width() / canvas_size.0;
    let stroke = egui::Stroke::new(2.0 * scale.max(0.5), egui::Color32::BLACK);

    for plan in plans {
        let region_min =
            canvas_rect.min + egui::vec2(plan.rect.x * scale, plan.rect.y * scale);
        let region_size = egui::vec2(plan.rect.width * scale, plan.rect.height * scale);
        painter.rect_stroke(
            egui::Rect::from_min_size(region_min, region_size),
            0.0,
            egui::Stroke::new(
                2.0 * scale.max(0.5),
                egui::Color32::from_rgb(plan.outline[0], plan.outline[1], plan.outline[2]),
            ),
        );

        let center = canvas_rect.min
            + egui::vec2(plan.center.0 * scale, plan.center.1 * scale);
        let radius = plan.radius * scale;

        painter.circle(center, radius, egui::Color32::WHITE, stroke);

        match plan.employee_colors.as_slice() {
            [] => {}
            [only] => {
                let fill = egui::Color32::from_rgb(only[0], only[1], only[2]);
                painter.circle(center, radius, fill, stroke);
            }
            colors => {
                let slice_angle = std::f32::consts::TAU / colors.len() as f32;
                for (index, rgb) in colors.iter().enumerate() {
                    let start = index as f32 * slice_angle - std::f32::consts::FRAC_PI_2;
                    let fill = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
                    painter.add(pie_slice(center, radius, start, start + slice_angle, fill, stroke));
                }
            }
        }
    }
}

fn pie_slice(
    center: egui::Pos2,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    fill: egui::Color32,
    stroke: egui::Stroke,
) -> egui::Shape {
    let steps = 16;
    let mut points = vec![center];
    for step in 0..=steps {
        let t = start_angle + (end_angle - start_angle) * step as f32 / steps as f32;
        points.push(center + egui::vec2(t.cos(), t.sin()) * radius);
    }
    egui::Shape::convex_polygon(points, fill, stroke)
}
