use serde::Deserialize;

use super::colormap::Colormap;

/// Colours and sizes of the map overlay. Colours are CSS colour strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background_color: String,
    pub border_color: String,
    pub track_colormap: Colormap,
    /// Altitudes (feet) mapped to the two ends of the track colormap.
    pub altitude_range: (f64, f64),
    pub position_color: String,
    pub text_color: String,
    pub text_size: f64,
    /// Timestamp anchor as fractions of the frame, origin bottom left.
    pub text_position: (f64, f64),
    pub line_width: f64,
    pub dot_size: f64,
    pub dpi: u32,
    /// Frame width in inches; the height follows the extent's aspect ratio.
    pub width_in: f64,
    /// Draw only the current position, no track.
    pub single_point: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background_color: "black".to_string(),
            border_color: "red".to_string(),
            track_colormap: Colormap::Viridis,
            altitude_range: (1000.0, 38000.0),
            position_color: "red".to_string(),
            text_color: "red".to_string(),
            text_size: 15.0,
            text_position: (0.04, 0.92),
            line_width: 1.0,
            dot_size: 3.0,
            dpi: 90,
            width_in: 10.0,
            single_point: false,
        }
    }
}

impl RenderStyle {
    /// Position of `altitude` within `altitude_range`, clamped to `0.0..=1.0`.
    pub fn altitude_fraction(&self, altitude: f64) -> f64 {
        let (lo, hi) = self.altitude_range;
        if hi <= lo {
            return 0.0;
        }
        ((altitude - lo) / (hi - lo)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1000.0, 0.0)]
    #[case(0.0, 0.0)]
    #[case(19500.0, 0.5)]
    #[case(38000.0, 1.0)]
    #[case(45000.0, 1.0)]
    fn test_altitude_fraction(#[case] alt: f64, #[case] frac: f64) {
        let style = RenderStyle::default();
        assert!((style.altitude_fraction(alt) - frac).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_fraction_empty_range() {
        let style = RenderStyle {
            altitude_range: (5000.0, 5000.0),
            ..Default::default()
        };
        assert_eq!(0.0, style.altitude_fraction(7000.0));
    }
}
