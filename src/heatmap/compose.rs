use crate::heatmap::color::BandColor;
use crate::heatmap::frame::HeatmapFrame;
use image::RgbaImage;

/// Reusable RGBA surface for one heatmap canvas. The buffer is only
/// reallocated when the pixel size actually changes.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
    size: (u32, u32),
}

impl FrameBuffer {
    pub fn ensure_size(&mut self, size: (u32, u32)) -> bool {
        let target_len = (size.0 as usize)
            .saturating_mul(size.1 as usize)
            .saturating_mul(4);
        let resized = self.size != size || self.pixels.len() != target_len;
        if resized {
            self.pixels = vec![0; target_len];
            self.size = size;
        }
        resized
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Draw order per frame: clear, base layout image, then every banded
    /// tint rectangle multiply-blended so the floor-plan detail stays
    /// visible under the color.
    pub fn compose(&mut self, base: &RgbaImage, frame: &HeatmapFrame) {
        let size = (base.width(), base.height());
        self.ensure_size(size);
        self.pixels.copy_from_slice(base.as_raw());

        for paint in &frame.paints {
            multiply_rect(
                &mut self.pixels,
                size.0,
                size.1,
                paint.rect.x,
                paint.rect.y,
                paint.rect.width,
                paint.rect.height,
                paint.color,
            );
        }
    }
}

/// Multiply-blends a tint over a pixel rectangle. Per channel the composite
/// is `dst * src / 255`, mixed with the original by the band alpha.
#[allow(clippy::too_many_arguments)]
fn multiply_rect(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    x: f32,
    y: f32,
    rect_width: f32,
    rect_height: f32,
    color: BandColor,
) {
    let x0 = (x.max(0.0) as u32).min(width);
    let y0 = (y.max(0.0) as u32).min(height);
    let x1 = (((x + rect_width).max(0.0)).round() as u32).min(width);
    let y1 = (((y + rect_height).max(0.0)).round() as u32).min(height);
    let alpha = color.alpha.clamp(0.0, 1.0);

    for py in y0..y1 {
        for px in x0..x1 {
            let idx = ((py * width + px) * 4) as usize;
            let blend = |dst: u8, src: u8| -> u8 {
                let multiplied = dst as f32 * src as f32 / 255.0;
                (dst as f32 * (1.0 - alpha) + multiplied * alpha).round() as u8
            };
            pixels[idx] = blend(pixels[idx], color.r);
            pixels[idx + 1] = blend(pixels[idx + 1], color.g);
            pixels[idx + 2] = blend(pixels[idx + 2], color.b);
            // Base stays opaque; the tint only darkens color channels.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameBuffer;
    use crate::geometry::PixelRect;
    use crate::heatmap::color::HeatBand;
    use crate::heatmap::frame::{HeatmapFrame, RegionPaint};
    use image::RgbaImage;

    fn white_base(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    fn paint(rect: PixelRect, band: HeatBand) -> RegionPaint {
        RegionPaint {
            name: "A".to_string(),
            rect,
            color: band.color(),
            label: None,
        }
    }

    #[test]
    fn buffer_reuses_allocation_for_same_size() {
        let mut buffer = FrameBuffer::default();
        assert!(buffer.ensure_size((8, 8)));
        assert!(!buffer.ensure_size((8, 8)));
        assert!(buffer.ensure_size((8, 9)));
    }

    #[test]
    fn untinted_pixels_keep_the_base_image() {
        let mut buffer = FrameBuffer::default();
        let frame = HeatmapFrame {
            paints: vec![paint(
                PixelRect {
                    x: 0.0,
                    y: 0.0,
                    width: 2.0,
                    height: 2.0,
                },
                HeatBand::High,
            )],
            ..HeatmapFrame::default()
        };
        buffer.compose(&white_base(4, 4), &frame);

        let px = |x: u32, y: u32| {
            let idx = ((y * 4 + x) * 4) as usize;
            &buffer.rgba_pixels()[idx..idx + 4]
        };
        // Inside the rect the white base is tinted toward the band color.
        assert_ne!(px(0, 0), [255, 255, 255, 255]);
        // Outside it is untouched.
        assert_eq!(px(3, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn multiply_never_brightens_the_base() {
        let mut buffer = FrameBuffer::default();
        let base = RgbaImage::from_pixel(2, 2, image::Rgba([100, 150, 200, 255]));
        let frame = HeatmapFrame {
            paints: vec![paint(
                PixelRect {
                    x: 0.0,
                    y: 0.0,
                    width: 2.0,
                    height: 2.0,
                },
                HeatBand::Medium,
            )],
            ..HeatmapFrame::default()
        };
        buffer.compose(&base, &frame);
        for chunk in buffer.rgba_pixels().chunks_exact(4) {
            assert!(chunk[0] <= 100);
            assert!(chunk[1] <= 150);
            assert!(chunk[2] <= 200);
            assert_eq!(chunk[3], 255);
        }
    }

    #[test]
    fn out_of_bounds_rects_are_clipped() {
        let mut buffer = FrameBuffer::default();
        let frame = HeatmapFrame {
            paints: vec![paint(
                PixelRect {
                    x: -10.0,
                    y: -10.0,
                    width: 100.0,
                    height: 100.0,
                },
                HeatBand::Low,
            )],
            ..HeatmapFrame::default()
        };
        buffer.compose(&white_base(4, 4), &frame);
        assert_eq!(buffer.rgba_pixels().len(), 4 * 4 * 4);
    }
}
