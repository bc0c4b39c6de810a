use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category colours for pie slices and bars
// ---------------------------------------------------------------------------

/// One colour per category label, in the order the labels were given.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    colors: Vec<Color32>,
}

impl CategoryColors {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let count = labels.into_iter().count();
        CategoryColors {
            colors: generate_palette(count),
        }
    }

    /// Colour of the i-th category; grey past the end.
    pub fn at(&self, index: usize) -> Color32 {
        self.colors.get(index).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn category_past_the_end_is_grey() {
        let colors = CategoryColors::new(["US", "EU"]);
        assert_ne!(colors.at(0), colors.at(1));
        assert_ne!(colors.at(1), Color32::GRAY);
        assert_eq!(colors.at(5), Color32::GRAY);
    }
}
