/// The three discrete intensity bands. Banding instead of a continuous
/// gradient is a legibility choice: adjacent regions stay tellable apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatBand {
    Low,
    Medium,
    High,
}

/// A band's tint. Alpha rises with the band so hot regions read stronger
/// against the base image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

const LOW: BandColor = BandColor {
    r: 179,
    g: 214,
    b: 255,
    alpha: 0.4,
};
const MEDIUM: BandColor = BandColor {
    r: 255,
    g: 229,
    b: 179,
    alpha: 0.6,
};
const HIGH: BandColor = BandColor {
    r: 255,
    g: 179,
    b: 179,
    alpha: 0.8,
};

/// Relative intensity of one region's metric against the hottest region.
/// Defined as 0 when the maximum is 0 so an empty map never produces NaN.
pub fn intensity(metric: f64, max_metric: f64) -> f64 {
    if max_metric <= 0.0 {
        0.0
    } else {
        metric / max_metric
    }
}

pub fn band_for(intensity: f64) -> HeatBand {
    if intensity <= 0.3 {
        HeatBand::Low
    } else if intensity <= 0.7 {
        HeatBand::Medium
    } else {
        HeatBand::High
    }
}

impl HeatBand {
    pub fn color(self) -> BandColor {
        match self {
            HeatBand::Low => LOW,
            HeatBand::Medium => MEDIUM,
            HeatBand::High => HIGH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{band_for, intensity, HeatBand};

    #[test]
    fn zero_maximum_yields_zero_intensity() {
        assert_eq!(intensity(10.0, 0.0), 0.0);
        assert_eq!(intensity(0.0, 0.0), 0.0);
    }

    #[test]
    fn band_thresholds_are_inclusive_below() {
        assert_eq!(band_for(0.0), HeatBand::Low);
        assert_eq!(band_for(0.3), HeatBand::Low);
        assert_eq!(band_for(0.31), HeatBand::Medium);
        assert_eq!(band_for(0.7), HeatBand::Medium);
        assert_eq!(band_for(0.71), HeatBand::High);
        assert_eq!(band_for(1.0), HeatBand::High);
    }

    #[test]
    fn alpha_rises_with_the_band() {
        assert!(HeatBand::Low.color().alpha < HeatBand::Medium.color().alpha);
        assert!(HeatBand::Medium.color().alpha < HeatBand::High.color().alpha);
    }
}
