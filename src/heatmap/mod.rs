pub mod color;
pub mod compose;
pub mod frame;

pub use color::{band_for, intensity, BandColor, HeatBand};
pub use compose::FrameBuffer;
pub use frame::{plan_frame, HeatmapFrame, HitRegion, LabelPlan, RegionPaint};
