use crate::layout::RegionDefinition;

/// Pixel-space rectangle produced for one render pass. Recomputed on every
/// resize or data change, never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rectangle scaled by `factor` around its own center. Used to keep the
    /// label of a merged region from dominating the whole bounding box.
    pub fn shrink_centered(&self, factor: f32) -> PixelRect {
        let new_w = self.width * factor;
        let new_h = self.height * factor;
        PixelRect {
            x: self.x + (self.width - new_w) / 2.0,
            y: self.y + (self.height - new_h) / 2.0,
            width: new_w,
            height: new_h,
        }
    }
}

/// Label orientation policy derived from a rectangle's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    /// Tall and narrow; label text rotates 90 degrees.
    Vertical,
    Horizontal,
    Square,
}

/// Ratio below 0.8 reads as vertical, above 1.2 as horizontal. The boundary
/// values themselves classify as square.
pub fn classify_aspect(width: f32, height: f32) -> Aspect {
    if height <= 0.0 {
        return Aspect::Square;
    }
    let ratio = width / height;
    if ratio < 0.8 {
        Aspect::Vertical
    } else if ratio > 1.2 {
        Aspect::Horizontal
    } else {
        Aspect::Square
    }
}

/// Maps a normalized region rectangle onto a canvas of the given pixel size.
pub fn to_pixel_rect(region: &RegionDefinition, canvas_width: f32, canvas_height: f32) -> PixelRect {
    PixelRect {
        x: region.top_left_x * canvas_width,
        y: region.top_left_y * canvas_height,
        width: (region.bottom_right_x - region.top_left_x) * canvas_width,
        height: (region.bottom_right_y - region.top_left_y) * canvas_height,
    }
}

/// Axis-aligned bounding box over the member regions of a combination.
///
/// Gaps between non-adjacent members are absorbed into the box; that is the
/// documented visual approximation for merged regions, not a defect. The
/// label of the first member is carried over.
pub fn combined_bounds(name: &str, members: &[&RegionDefinition]) -> Option<RegionDefinition> {
    let first = members.first()?;
    let mut bounds = RegionDefinition {
        name: name.to_string(),
        top_left_x: first.top_left_x,
        top_left_y: first.top_left_y,
        bottom_right_x: first.bottom_right_x,
        bottom_right_y: first.bottom_right_y,
        label_id: first.label_id.clone(),
    };
    for member in &members[1..] {
        bounds.top_left_x = bounds.top_left_x.min(member.top_left_x);
        bounds.top_left_y = bounds.top_left_y.min(member.top_left_y);
        bounds.bottom_right_x = bounds.bottom_right_x.max(member.bottom_right_x);
        bounds.bottom_right_y = bounds.bottom_right_y.max(member.bottom_right_y);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::{classify_aspect, combined_bounds, to_pixel_rect, Aspect, PixelRect};
    use crate::layout::RegionDefinition;

    fn region(name: &str, tl: (f32, f32), br: (f32, f32)) -> RegionDefinition {
        RegionDefinition {
            name: name.to_string(),
            top_left_x: tl.0,
            top_left_y: tl.1,
            bottom_right_x: br.0,
            bottom_right_y: br.1,
            label_id: "l1".to_string(),
        }
    }

    #[test]
    fn pixel_rect_scales_with_canvas() {
        let rect = to_pixel_rect(&region("A", (0.1, 0.2), (0.5, 0.6)), 1000.0, 500.0);
        assert_eq!(
            rect,
            PixelRect {
                x: 100.0,
                y: 100.0,
                width: 400.0,
                height: 200.0
            }
        );
    }

    #[test]
    fn pixel_rect_stays_within_canvas_for_unit_coordinates() {
        let rect = to_pixel_rect(&region("A", (0.0, 0.0), (1.0, 1.0)), 640.0, 480.0);
        assert!(rect.width > 0.0 && rect.height > 0.0);
        assert!(rect.x >= 0.0 && rect.y >= 0.0);
        assert!(rect.x + rect.width <= 640.0);
        assert!(rect.y + rect.height <= 480.0);
    }

    #[test]
    fn aspect_classification_matches_thresholds() {
        assert_eq!(classify_aspect(100.0, 200.0), Aspect::Vertical);
        assert_eq!(classify_aspect(200.0, 100.0), Aspect::Horizontal);
        assert_eq!(classify_aspect(100.0, 100.0), Aspect::Square);
        // Boundary values are inclusive toward square.
        assert_eq!(classify_aspect(80.0, 100.0), Aspect::Square);
        assert_eq!(classify_aspect(120.0, 100.0), Aspect::Square);
    }

    #[test]
    fn combined_bounds_is_the_bounding_box() {
        let a = region("A", (0.1, 0.1), (0.3, 0.3));
        let b = region("B", (0.6, 0.5), (0.9, 0.8));
        let merged = combined_bounds("AB", &[&a, &b]).expect("bounds");
        assert_eq!(merged.name, "AB");
        assert_eq!(merged.top_left_x, 0.1);
        assert_eq!(merged.top_left_y, 0.1);
        assert_eq!(merged.bottom_right_x, 0.9);
        assert_eq!(merged.bottom_right_y, 0.8);
        assert_eq!(merged.label_id, "l1");
    }

    #[test]
    fn combined_bounds_of_nothing_is_none() {
        assert!(combined_bounds("empty", &[]).is_none());
    }

    #[test]
    fn shrink_centered_keeps_the_center() {
        let rect = PixelRect {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
        };
        let shrunk = rect.shrink_centered(0.7);
        assert_eq!(rect.center(), shrunk.center());
        assert!((shrunk.width - 70.0).abs() < 1e-4);
        assert!((shrunk.height - 35.0).abs() < 1e-4);
    }
}
