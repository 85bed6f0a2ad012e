use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
    weight: u16,
}

/// Shapes text once per (text, size, weight) and memoizes the rendered
/// extents. Used for the per-line heights in multi-line label centering.
pub struct TextMeasure {
    font_system: FontSystem,
    cache: HashMap<MeasureKey, (f32, f32)>,
}

impl TextMeasure {
    /// `extra_fonts` are raw font files (the event's regular/bold/thin
    /// weights) registered ahead of the system fonts.
    pub fn new(extra_fonts: &[Vec<u8>]) -> Self {
        let mut font_system = FontSystem::new();
        for data in extra_fonts {
            font_system.db_mut().load_font_data(data.clone());
        }

        Self {
            font_system,
            cache: HashMap::new(),
        }
    }

    pub fn measure(&mut self, text: &str, font_size: f32, weight: Weight) -> (f32, f32) {
        let key = MeasureKey {
            text: text.to_string(),
            font_size_bits: font_size.to_bits(),
            weight: weight.0,
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let line_height = font_size * 1.2;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height,
            },
        );

        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(weight)
            .style(Style::Normal);

        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let mut total_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        for run in buffer.layout_runs() {
            total_width = total_width.max(run.line_w);
            total_height += run.line_height;
        }

        let measured = (total_width, total_height);
        self.cache.insert(key, measured);
        measured
    }
}
