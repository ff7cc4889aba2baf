use crate::geometry::PixelRect;
use image::imageops::FilterType;
use image::RgbaImage;
use std::sync::Arc;

pub const MAX_DECODE_ATTEMPTS: u32 = 3;

/// Lifecycle of one canvas: decoding the base image, then serving redraws.
/// Decode failures retry automatically; after the attempt budget the error
/// state is permanent and shown in place of the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasPhase {
    Loading,
    Ready,
    Error(String),
}

/// Redraw policy. Static canvases redraw only when an input version changes
/// (heatmaps); dynamic ones repaint every frame (the animated timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Static,
    Dynamic,
}

/// Per-canvas controller: image decode with retry, aspect-locked resize with
/// a no-op guard, dirty tracking for static mode, and hit-testing.
///
/// Dropping the controller drops the undecoded bytes and any pending retry
/// state with it, so a torn-down canvas can never receive a late decode.
#[derive(Debug)]
pub struct CanvasController {
    phase: CanvasPhase,
    attempts: u32,
    raw_bytes: Arc<Vec<u8>>,
    decoded: Option<RgbaImage>,
    scaled: Option<RgbaImage>,
    size: (u32, u32),
    /// `height / width` of the base layout image.
    aspect_ratio: f32,
    input_version: u64,
    drawn_version: u64,
}

impl CanvasController {
    pub fn new(image_bytes: Arc<Vec<u8>>, aspect_ratio: f32) -> Self {
        Self {
            phase: CanvasPhase::Loading,
            attempts: 0,
            raw_bytes: image_bytes,
            decoded: None,
            scaled: None,
            size: (0, 0),
            aspect_ratio: if aspect_ratio > 0.0 { aspect_ratio } else { 1.0 },
            input_version: 1,
            drawn_version: 0,
        }
    }

    pub fn phase(&self) -> &CanvasPhase {
        &self.phase
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Advances the decode state machine. Call until the phase leaves
    /// `Loading`; each failed attempt logs and retries up to the budget.
    pub fn poll_decode(&mut self) {
        if self.phase != CanvasPhase::Loading || self.decoded.is_some() {
            return;
        }

        match image::load_from_memory(&self.raw_bytes) {
            Ok(img) => {
                self.decoded = Some(img.to_rgba8());
                self.phase = CanvasPhase::Ready;
                self.mark_dirty();
            }
            Err(err) => {
                self.attempts += 1;
                if self.attempts >= MAX_DECODE_ATTEMPTS {
                    tracing::warn!(attempts = self.attempts, error = %err, "layout image decode gave up");
                    self.phase = CanvasPhase::Error(format!(
                        "failed to load layout image after {} attempts: {err}",
                        self.attempts
                    ));
                } else {
                    tracing::debug!(attempt = self.attempts, error = %err, "layout image decode retry");
                }
            }
        }
    }

    /// Tracks the containing panel width, preserving the layout's aspect
    /// ratio. Returns true only when the pixel size actually changed; equal
    /// sizes are a guarded no-op so resize events never force redraws.
    pub fn resize(&mut self, available_width: f32) -> bool {
        let width = available_width.max(1.0).round() as u32;
        let height = (available_width * self.aspect_ratio).max(1.0).round() as u32;
        if (width, height) == self.size {
            return false;
        }
        self.size = (width, height);
        self.scaled = None;
        self.mark_dirty();
        true
    }

    /// The base image scaled to the current canvas size, rescaled lazily and
    /// cached until the next resize.
    pub fn scaled_base(&mut self) -> Option<&RgbaImage> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return None;
        }
        let decoded = self.decoded.as_ref()?;
        if self.scaled.is_none() {
            self.scaled = Some(image::imageops::resize(
                decoded,
                self.size.0,
                self.size.1,
                FilterType::Triangle,
            ));
        }
        self.scaled.as_ref()
    }

    /// Bumps the input version; static canvases redraw on the next frame.
    pub fn mark_dirty(&mut self) {
        self.input_version += 1;
    }

    /// Whether the next frame needs a redraw. Dynamic mode always redraws;
    /// static mode only when inputs changed since the last completed draw.
    pub fn needs_redraw(&self, mode: RenderMode) -> bool {
        if self.phase != CanvasPhase::Ready {
            return false;
        }
        match mode {
            RenderMode::Dynamic => true,
            RenderMode::Static => self.drawn_version != self.input_version,
        }
    }

    /// A new frame is only requested after the previous draw completed; that
    /// is the whole backpressure policy, slow draws just lower the rate.
    pub fn complete_redraw(&mut self) {
        self.drawn_version = self.input_version;
    }

    /// Maps a pointer position from on-screen space into canvas pixel space
    /// via the ratio of canvas width to displayed width.
    pub fn to_canvas_space(
        &self,
        pointer: (f32, f32),
        screen_origin: (f32, f32),
        screen_width: f32,
        screen_height: f32,
    ) -> Option<(f32, f32)> {
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return None;
        }
        let scale_x = self.size.0 as f32 / screen_width;
        let scale_y = self.size.1 as f32 / screen_height;
        Some((
            (pointer.0 - screen_origin.0) * scale_x,
            (pointer.1 - screen_origin.1) * scale_y,
        ))
    }
}

/// Hit-test in canvas pixel space. Overlapping regions resolve to the
/// smallest area containing the point, which keeps a nested sub-region
/// reachable regardless of iteration order.
pub fn hit_test<'a>(
    regions: impl IntoIterator<Item = (&'a str, &'a PixelRect)>,
    x: f32,
    y: f32,
) -> Option<&'a str> {
    regions
        .into_iter()
        .filter(|(_, rect)| rect.contains(x, y))
        .min_by(|(_, a), (_, b)| {
            a.area()
                .partial_cmp(&b.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(name, _)| name)
}
