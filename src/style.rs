use serde::{Deserialize, Serialize};

use crate::data::TableType;

const BACKGROUND_COLOR: &str = "#fffcf7";
const TABLE_COLOR_NORMAL: &str = "#cba6c3";
const TABLE_COLOR_STAGE: &str = "#9b8281";
const TABLE_COLOR_HEAD: &str = "#e7ded9";
const TABLE_COLOR_BLOCKED: &str = "#fffcf7";
const HIGHLIGHT_COLOR: &str = "#ffdd30";
const HIGHLIGHT_TEXT_COLOR: &str = "#534847";
const TABLE_TEXT_COLOR: &str = "#ffffff";
const TABLE_NAME_COLOR: &str = "#ffffff";
const CAPTION_COLOR: &str = "#534847";
const VIP_COLOR: &str = "#ffd700";

const SCALE: i64 = 62;
const OFFSET_X: i64 = 70;
const OFFSET_Y_TOP: i64 = 30;
const OFFSET_Y_TOP_GRID: i64 = 60;
const OFFSET_Y_BOTTOM: i64 = 40;
const LOGO_AREA_HEIGHT: i64 = 150;
const LOGO_PADDING: i64 = 10;
const HIGHLIGHT_THICKNESS: i64 = 6;
const MIN_CANVAS_WIDTH: i64 = 480;
const MIN_CANVAS_HEIGHT: i64 = 320;

const FONT_SIZE_LARGE: f32 = 28.0;
const FONT_SIZE_MEDIUM: f32 = 12.0;
const FONT_SIZE_SMALL: f32 = 10.0;
const FONT_SIZE_THIN: f32 = 12.0;
const LINE_SPACING: f32 = 4.0;

/// Immutable drawing configuration. Constructed once (defaults or a TOML
/// file) and passed into every render call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_table_normal")]
    pub table_color_normal: String,
    #[serde(default = "default_table_stage")]
    pub table_color_stage: String,
    #[serde(default = "default_table_head")]
    pub table_color_head: String,
    #[serde(default = "default_table_blocked")]
    pub table_color_blocked: String,
    #[serde(default = "default_highlight")]
    pub highlight_color: String,
    #[serde(default = "default_highlight_text")]
    pub highlight_text_color: String,
    #[serde(default = "default_table_text")]
    pub table_text_color: String,
    #[serde(default = "default_table_name")]
    pub table_name_color: String,
    #[serde(default = "default_caption")]
    pub caption_color: String,
    #[serde(default = "default_vip")]
    pub vip_color: String,

    /// Pixels per grid cell.
    #[serde(default = "default_scale")]
    pub scale: i64,
    #[serde(default = "default_offset_x")]
    pub offset_x: i64,
    #[serde(default = "default_offset_y_top")]
    pub offset_y_top: i64,
    #[serde(default = "default_offset_y_top_grid")]
    pub offset_y_top_grid: i64,
    #[serde(default = "default_offset_y_bottom")]
    pub offset_y_bottom: i64,
    #[serde(default = "default_logo_area_height")]
    pub logo_area_height: i64,
    #[serde(default = "default_logo_padding")]
    pub logo_padding: i64,
    #[serde(default = "default_highlight_thickness")]
    pub highlight_thickness: i64,
    #[serde(default = "default_min_canvas_width")]
    pub min_canvas_width: i64,
    #[serde(default = "default_min_canvas_height")]
    pub min_canvas_height: i64,

    #[serde(default = "default_font_size_large")]
    pub font_size_large: f32,
    #[serde(default = "default_font_size_medium")]
    pub font_size_medium: f32,
    #[serde(default = "default_font_size_small")]
    pub font_size_small: f32,
    #[serde(default = "default_font_size_thin")]
    pub font_size_thin: f32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

fn default_background() -> String {
    BACKGROUND_COLOR.to_string()
}
fn default_table_normal() -> String {
    TABLE_COLOR_NORMAL.to_string()
}
fn default_table_stage() -> String {
    TABLE_COLOR_STAGE.to_string()
}
fn default_table_head() -> String {
    TABLE_COLOR_HEAD.to_string()
}
fn default_table_blocked() -> String {
    TABLE_COLOR_BLOCKED.to_string()
}
fn default_highlight() -> String {
    HIGHLIGHT_COLOR.to_string()
}
fn default_highlight_text() -> String {
    HIGHLIGHT_TEXT_COLOR.to_string()
}
fn default_table_text() -> String {
    TABLE_TEXT_COLOR.to_string()
}
fn default_table_name() -> String {
    TABLE_NAME_COLOR.to_string()
}
fn default_caption() -> String {
    CAPTION_COLOR.to_string()
}
fn default_vip() -> String {
    VIP_COLOR.to_string()
}
fn default_scale() -> i64 {
    SCALE
}
fn default_offset_x() -> i64 {
    OFFSET_X
}
fn default_offset_y_top() -> i64 {
    OFFSET_Y_TOP
}
fn default_offset_y_top_grid() -> i64 {
    OFFSET_Y_TOP_GRID
}
fn default_offset_y_bottom() -> i64 {
    OFFSET_Y_BOTTOM
}
fn default_logo_area_height() -> i64 {
    LOGO_AREA_HEIGHT
}
fn default_logo_padding() -> i64 {
    LOGO_PADDING
}
fn default_highlight_thickness() -> i64 {
    HIGHLIGHT_THICKNESS
}
fn default_min_canvas_width() -> i64 {
    MIN_CANVAS_WIDTH
}
fn default_min_canvas_height() -> i64 {
    MIN_CANVAS_HEIGHT
}
fn default_font_size_large() -> f32 {
    FONT_SIZE_LARGE
}
fn default_font_size_medium() -> f32 {
    FONT_SIZE_MEDIUM
}
fn default_font_size_small() -> f32 {
    FONT_SIZE_SMALL
}
fn default_font_size_thin() -> f32 {
    FONT_SIZE_THIN
}
fn default_line_spacing() -> f32 {
    LINE_SPACING
}

impl Default for Style {
    fn default() -> Self {
        toml::from_str("").expect("empty style TOML must deserialize via field defaults")
    }
}

impl Style {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse style TOML: {}", e))
    }

    /// Disc radius derived from the cell scale, truncated like the original
    /// floor plans expect (scale 62 -> radius 27).
    pub fn table_radius(&self) -> i64 {
        (self.scale as f32 * 0.45) as i64
    }

    pub fn table_color(&self, kind: TableType) -> &str {
        match kind {
            TableType::Normal => &self.table_color_normal,
            TableType::Stage => &self.table_color_stage,
            TableType::HeadTable => &self.table_color_head,
            TableType::Blocked => &self.table_color_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Style;
    use crate::data::TableType;

    #[test]
    fn defaults_match_builtin_constants() {
        let style = Style::default();
        assert_eq!(style.background_color, "#fffcf7");
        assert_eq!(style.scale, 62);
        assert_eq!(style.table_radius(), 27);
        assert_eq!(style.table_color(TableType::Normal), "#cba6c3");
        assert_eq!(style.table_color(TableType::Blocked), "#fffcf7");
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let style = Style::from_toml("scale = 40\nhighlight_color = \"#ff0000\"").unwrap();
        assert_eq!(style.scale, 40);
        assert_eq!(style.highlight_color, "#ff0000");
        assert_eq!(style.min_canvas_width, 480);
        assert_eq!(style.table_radius(), 18);
    }
}
