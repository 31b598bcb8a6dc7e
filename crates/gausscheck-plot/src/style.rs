use serde::{Deserialize, Serialize};

/// Marker glyph drawn at sampled points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    Circle,
    Square,
    Cross,
    None,
}

/// Marker styling for sample-path series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: f64,
    pub alpha: f64,
    pub color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            shape: MarkerShape::Circle,
            size: 0.5,
            alpha: 0.5,
            color: "#4682b4".to_owned(),
        }
    }
}

/// Styling for a mean ± one-standard-deviation ribbon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonStyle {
    pub line_width: f64,
    pub fill_alpha: f64,
}

impl Default for RibbonStyle {
    fn default() -> Self {
        RibbonStyle {
            line_width: 2.0,
            fill_alpha: 0.3,
        }
    }
}

/// Styling for a bundle of posterior sample paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStyle {
    /// Number of sample paths to draw.
    pub sample_count: usize,
    pub line_width: f64,
    pub line_alpha: f64,
    pub marker: MarkerStyle,
}

impl Default for SampleStyle {
    fn default() -> Self {
        SampleStyle {
            sample_count: 10,
            line_width: 1.0,
            line_alpha: 0.35,
            marker: MarkerStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let ribbon = RibbonStyle::default();
        assert_eq!(ribbon.line_width, 2.0);
        assert_eq!(ribbon.fill_alpha, 0.3);

        let sample = SampleStyle::default();
        assert_eq!(sample.sample_count, 10);
        assert_eq!(sample.marker.shape, MarkerShape::Circle);
    }

    #[test]
    fn marker_shape_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&MarkerShape::None).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&MarkerShape::Circle).unwrap(), "\"circle\"");
    }
}
