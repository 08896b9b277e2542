use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::chart::{ChartSpec, ColorEncoding};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Named colours used by discrete encodings
// ---------------------------------------------------------------------------

/// Resolve a CSS-style colour name from a [`ColorEncoding::Discrete`] map.
pub fn named_color(name: &str) -> Option<Color32> {
    let c = match name.to_ascii_lowercase().as_str() {
        "green" => Color32::from_rgb(0, 160, 60),
        "red" => Color32::from_rgb(220, 40, 40),
        "blue" => Color32::from_rgb(40, 90, 220),
        "orange" => Color32::from_rgb(240, 140, 20),
        "gray" | "grey" => Color32::GRAY,
        _ => return None,
    };
    Some(c)
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Position `t` in `[0, 1]` on a blue → purple → yellow ramp.
pub fn ramp(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let hue = 250.0 + t * 170.0; // wraps past 360 into yellow
    hsl_to_color32(hue % 360.0, 0.8, 0.35 + 0.25 * t)
}

// ---------------------------------------------------------------------------
// Series colouring: category value → Color32
// ---------------------------------------------------------------------------

/// One colour per category in a chart, in legend order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    /// Build the legend for a chart's colour encoding over its own rows.
    pub fn for_chart(spec: &ChartSpec, dataset: &Dataset) -> Option<Self> {
        let encoding = spec.color.as_ref()?;
        let mapping = match encoding {
            ColorEncoding::Discrete { map, .. } => map
                .iter()
                .map(|(value, name)| (value.clone(), named_color(name).unwrap_or(Color32::GRAY)))
                .collect(),
            ColorEncoding::Continuous { field } => {
                let values: Vec<f64> = spec
                    .rows
                    .iter()
                    .filter_map(|&i| field.number(dataset.record(i)))
                    .collect();
                let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = hi - lo;
                values
                    .iter()
                    .map(|&v| {
                        let t = if range.abs() < f64::EPSILON { 0.5 } else { (v - lo) / range };
                        (v.to_string(), ramp(t))
                    })
                    .collect()
            }
        };

        Some(SeriesColors {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        })
    }

    /// Look up the colour for a category value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
