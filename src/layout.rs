use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One named rectangular zone of the floor plan in normalized coordinates.
/// Both corners live in `[0, 1]` and the bottom-right corner is strictly
/// greater than the top-left one on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub name: String,
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub bottom_right_x: f32,
    pub bottom_right_y: f32,
    pub label_id: String,
}

/// Color/category label referenced by regions via `label_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLabel {
    pub uuid: String,
    pub name: String,
    /// Hex color string, e.g. `#aabbcc`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub regions: Vec<RegionDefinition>,
    pub region_labels: Vec<RegionLabel>,
    /// Native resolution of the base layout image. Drives the aspect-locked
    /// canvas resize.
    pub width_pixel: u32,
    pub height_pixel: u32,
}

/// Outer wrapper of the floor-plan metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub layout: LayoutMetadata,
}

impl LayoutMetadata {
    pub fn region(&self, name: &str) -> Option<&RegionDefinition> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn label_color(&self, label_id: &str) -> Option<&str> {
        self.region_labels
            .iter()
            .find(|l| l.uuid == label_id)
            .map(|l| l.color.as_str())
    }

    /// Aspect ratio used for resize: `height / width` of the base image.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width_pixel == 0 {
            return 1.0;
        }
        self.height_pixel as f32 / self.width_pixel as f32
    }

    fn validate(&self) -> Result<()> {
        if self.width_pixel == 0 || self.height_pixel == 0 {
            bail!(
                "layout image resolution must be non-zero, got {}x{}",
                self.width_pixel,
                self.height_pixel
            );
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                bail!("layout contains a region with an empty name");
            }
            if !seen.insert(region.name.as_str()) {
                bail!("duplicate region name in layout: {}", region.name);
            }
            let in_unit = |v: f32| (0.0..=1.0).contains(&v);
            if !in_unit(region.top_left_x)
                || !in_unit(region.top_left_y)
                || !in_unit(region.bottom_right_x)
                || !in_unit(region.bottom_right_y)
            {
                bail!("region {} has coordinates outside [0, 1]", region.name);
            }
            if region.bottom_right_x <= region.top_left_x
                || region.bottom_right_y <= region.top_left_y
            {
                bail!(
                    "region {} has an empty or inverted rectangle",
                    region.name
                );
            }
        }
        Ok(())
    }
}

pub fn parse_floor_plan(json: &str) -> Result<FloorPlan> {
    let plan: FloorPlan =
        serde_json::from_str(json).context("deserialize floor-plan metadata")?;
    plan.layout.validate()?;
    Ok(plan)
}

pub fn load_floor_plan(path: &Path) -> Result<FloorPlan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read floor-plan metadata {}", path.display()))?;
    parse_floor_plan(&content)
        .with_context(|| format!("parse floor-plan metadata {}", path.display()))
}

/// Parses `#rrggbb` (with or without the hash) into RGB bytes. Anything
/// unparsable falls back to a neutral grey so a bad label never aborts a draw.
pub fn parse_hex_color(color: &str) -> [u8; 3] {
    let hex = color.trim_start_matches('#');
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return [r, g, b];
        }
    }
    [204, 204, 204]
}

#[cfg(test)]
mod tests {
    use super::{parse_floor_plan, parse_hex_color};

    fn plan_json(regions: &str) -> String {
        format!(
            r##"{{
                "layout": {{
                    "regions": [{regions}],
                    "region_labels": [
                        {{"uuid": "l1", "name": "Storage", "color": "#ff8800"}}
                    ],
                    "width_pixel": 800,
                    "height_pixel": 600
                }}
            }}"##
        )
    }

    const REGION_A: &str = r#"{
        "name": "A",
        "top_left_x": 0.1, "top_left_y": 0.1,
        "bottom_right_x": 0.4, "bottom_right_y": 0.5,
        "label_id": "l1"
    }"#;

    #[test]
    fn valid_plan_parses_and_resolves_labels() {
        let plan = parse_floor_plan(&plan_json(REGION_A)).expect("parse");
        assert_eq!(plan.layout.regions.len(), 1);
        assert_eq!(plan.layout.label_color("l1"), Some("#ff8800"));
        assert_eq!(plan.layout.label_color("missing"), None);
        assert!((plan.layout.aspect_ratio() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicate_region_names_are_rejected() {
        let json = plan_json(&format!("{REGION_A}, {REGION_A}"));
        assert!(parse_floor_plan(&json).is_err());
    }

    #[test]
    fn inverted_rectangles_are_rejected() {
        let bad = r#"{
            "name": "B",
            "top_left_x": 0.5, "top_left_y": 0.5,
            "bottom_right_x": 0.2, "bottom_right_y": 0.8,
            "label_id": "l1"
        }"#;
        assert!(parse_floor_plan(&plan_json(bad)).is_err());
    }

    #[test]
    fn out_of_unit_coordinates_are_rejected() {
        let bad = r#"{
            "name": "C",
            "top_left_x": -0.1, "top_left_y": 0.0,
            "bottom_right_x": 0.5, "bottom_right_y": 0.5,
            "label_id": "l1"
        }"#;
        assert!(parse_floor_plan(&plan_json(bad)).is_err());
    }

    #[test]
    fn hex_colors_parse_with_grey_fallback() {
        assert_eq!(parse_hex_color("#ff8800"), [255, 136, 0]);
        assert_eq!(parse_hex_color("00ff00"), [0, 255, 0]);
        assert_eq!(parse_hex_color("not-a-color"), [204, 204, 204]);
    }
}
