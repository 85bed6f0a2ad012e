use cosmic_text::Weight;
use resvg::usvg;
use thiserror::Error;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

use crate::assets::RenderAssets;
use crate::data::{TableSet, TableType};
use crate::fonts::TextMeasure;
use crate::layout::CanvasLayout;
use crate::rules::{self, FontRole, LineFill, TextBlock};
use crate::style::Style;
use crate::xml::escape_xml;

/// Where the background image lands on the canvas: stretched to fill, or
/// pinned to one of eight anchors plus full center at its intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundPlacement {
    #[default]
    Stretch,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    TopCenter,
    BottomCenter,
    CenterLeft,
    CenterRight,
}

impl BackgroundPlacement {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stretch" => Some(Self::Stretch),
            "top-left" => Some(Self::TopLeft),
            "top-right" => Some(Self::TopRight),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-right" => Some(Self::BottomRight),
            "center" => Some(Self::Center),
            "top-center" => Some(Self::TopCenter),
            "bottom-center" => Some(Self::BottomCenter),
            "center-left" => Some(Self::CenterLeft),
            "center-right" => Some(Self::CenterRight),
            _ => None,
        }
    }

    /// Paste origin for the anchored placements. `Stretch` has no origin;
    /// it is drawn at canvas size instead.
    fn origin(self, canvas_w: i64, canvas_h: i64, w: i64, h: i64) -> Option<(i64, i64)> {
        match self {
            Self::Stretch => None,
            Self::TopLeft => Some((0, 0)),
            Self::TopRight => Some((canvas_w - w, 0)),
            Self::BottomLeft => Some((0, canvas_h - h)),
            Self::BottomRight => Some((canvas_w - w, canvas_h - h)),
            Self::Center => Some(((canvas_w - w) / 2, (canvas_h - h) / 2)),
            Self::TopCenter => Some(((canvas_w - w) / 2, 0)),
            Self::BottomCenter => Some(((canvas_w - w) / 2, canvas_h - h)),
            Self::CenterLeft => Some((0, (canvas_h - h) / 2)),
            Self::CenterRight => Some((canvas_w - w, (canvas_h - h) / 2)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub tables: &'a TableSet,
    pub target_table_id: &'a str,
    pub guest_name: &'a str,
    pub background: BackgroundPlacement,
}

/// Errors from the raster stage. Asset and geometry problems never surface
/// here; they degrade earlier with a log line.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid raster scale: {0}")]
    InvalidScale(f32),
    #[error("failed to parse generated SVG: {0}")]
    Svg(String),
    #[error("failed to allocate {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Png(String),
}

/// Bottom status caption, keyed to the highlighted table. "T1" is the head
/// table and wins even when absent from the set.
pub fn status_caption(tables: &TableSet, target_table_id: &str, guest_name: &str) -> String {
    let seat = target_table_id.to_uppercase();
    if seat == "T1" {
        format!("{} 您好，您的座位安排在主桌", guest_name)
    } else if !tables.contains(&seat) {
        format!("{} 您好，座位 {} 未找到", guest_name, seat)
    } else {
        format!("{} 您好，您的座位是 {}", guest_name, seat)
    }
}

/// Stateless seat-map renderer. Style and assets are loaded once and shared
/// read-only across renders; each call allocates its own canvas.
pub struct SeatMapRenderer {
    style: Style,
    assets: RenderAssets,
    measure: TextMeasure,
}

impl SeatMapRenderer {
    pub fn new(style: Style, assets: RenderAssets) -> Self {
        let measure = TextMeasure::new(&assets.font_data());
        Self {
            style,
            assets,
            measure,
        }
    }

    /// Compose the full SVG document: background image, logo, discs with
    /// highlight ring and label text, bottom caption.
    pub fn render_svg(&mut self, req: &RenderRequest) -> String {
        let layout = CanvasLayout::resolve(req.tables, &self.style);
        debug!(
            width = layout.canvas_width,
            height = layout.canvas_height,
            grid_width = layout.grid_content_width,
            "resolved canvas"
        );

        let mut svg = String::new();
        self.draw_background(&mut svg, &layout, req.background);
        self.draw_logo(&mut svg, &layout);
        self.draw_tables(&mut svg, &layout, req);
        self.draw_caption(&mut svg, &layout, req);

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><rect width="100%" height="100%" fill="{bg}" />{content}</svg>"#,
            w = layout.canvas_width,
            h = layout.canvas_height,
            bg = self.style.background_color,
            content = svg,
        )
    }

    /// Rasterize to a PNG buffer. A pure function of (style, assets,
    /// request): identical inputs produce byte-identical output.
    pub fn render_png(&mut self, req: &RenderRequest, scale: f32) -> Result<Vec<u8>, RenderError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::InvalidScale(scale));
        }

        let svg = self.render_svg(req);

        let mut opts = usvg::Options::default();
        {
            let fontdb = opts.fontdb_mut();
            for data in self.assets.font_data() {
                fontdb.load_font_data(data);
            }
            fontdb.load_system_fonts();
            configure_font_fallbacks(fontdb);
        }

        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| RenderError::Svg(e.to_string()))?;

        let width = (tree.size().width() * scale).ceil() as u32;
        let height = (tree.size().height() * scale).ceil() as u32;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::Canvas { width, height })?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Png(e.to_string()))
    }

    fn draw_background(&self, svg: &mut String, layout: &CanvasLayout, placement: BackgroundPlacement) {
        let Some(bg) = &self.assets.background else {
            return;
        };

        match placement.origin(layout.canvas_width, layout.canvas_height, bg.width, bg.height) {
            None => svg.push_str(&format!(
                r#"<image x="0" y="0" width="{}" height="{}" preserveAspectRatio="none" href="{}" />"#,
                layout.canvas_width,
                layout.canvas_height,
                bg.data_uri(),
            )),
            Some((x, y)) => svg.push_str(&format!(
                r#"<image x="{}" y="{}" width="{}" height="{}" href="{}" />"#,
                x,
                y,
                bg.width,
                bg.height,
                bg.data_uri(),
            )),
        }
    }

    /// Scale the logo down (never up) into the padded top band, centered
    /// horizontally.
    fn draw_logo(&self, svg: &mut String, layout: &CanvasLayout) {
        let Some(logo) = &self.assets.logo else {
            return;
        };

        let available_w = layout.canvas_width - (self.style.offset_x + self.style.logo_padding) * 2;
        let available_h = self.style.logo_area_height - self.style.logo_padding * 2;
        if available_w <= 0 || available_h <= 0 || logo.width <= 0 || logo.height <= 0 {
            return;
        }

        let scale = (available_w as f32 / logo.width as f32)
            .min(available_h as f32 / logo.height as f32)
            .min(1.0);
        let w = (logo.width as f32 * scale) as i64;
        let h = (logo.height as f32 * scale) as i64;

        let x = (layout.canvas_width - w) / 2;
        let y = self.style.offset_y_top + self.style.logo_padding + (available_h - h) / 2;

        svg.push_str(&format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" href="{}" />"#,
            x,
            y,
            w,
            h,
            logo.data_uri(),
        ));
    }

    fn draw_tables(&mut self, svg: &mut String, layout: &CanvasLayout, req: &RenderRequest) {
        let target = req.target_table_id.to_uppercase();
        let radius = self.style.table_radius();

        for (id, record) in req.tables.iter() {
            let Some(position) = record.position else {
                continue;
            };
            let (cx, cy) = layout.table_center(position);
            let highlighted = *id == target;

            if highlighted && record.kind != TableType::Blocked {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}" />"#,
                    cx,
                    cy,
                    radius + self.style.highlight_thickness,
                    self.style.highlight_color,
                ));
            }

            if record.kind == TableType::Blocked {
                // Structural obstacle: no disc, no text, an inert placeholder.
                continue;
            }

            svg.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" />"#,
                cx,
                cy,
                radius,
                self.style.table_color(record.kind),
            ));

            let block = rules::compose_label(id, &record.display_name, &record.text_rules);
            self.draw_text_block(svg, cx, cy, &block, highlighted);
        }
    }

    /// Stack the label lines vertically, centered on the disc center. Empty
    /// lines contribute no height but still count for inter-line spacing.
    fn draw_text_block(
        &mut self,
        svg: &mut String,
        cx: i64,
        cy: i64,
        block: &TextBlock,
        highlighted: bool,
    ) {
        let heights: Vec<Option<f32>> = block
            .lines
            .iter()
            .map(|line| {
                if line.text.is_empty() {
                    None
                } else {
                    let size = line.font.size(&self.style);
                    let (_, h) = self.measure.measure(&line.text, size, Weight(line.font.weight()));
                    Some(h)
                }
            })
            .collect();

        let total_height: f32 = heights.iter().flatten().sum::<f32>()
            + self.style.line_spacing * (block.lines.len().saturating_sub(1)) as f32;

        let mut current_y = cy as f32 - total_height / 2.0;
        for (line, height) in block.lines.iter().zip(&heights) {
            let Some(height) = height else {
                continue;
            };

            let size = line.font.size(&self.style);
            let line_center = current_y + height / 2.0;
            let fill = self.line_color(line.fill, highlighted);

            svg.push_str(&format!(
                r#"<text x="{}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="middle">{}</text>"#,
                cx,
                line_center + size / 3.0,
                size,
                line.font.weight(),
                fill,
                escape_xml(&line.text),
            ));

            current_y += height + self.style.line_spacing;
        }
    }

    fn line_color(&self, fill: LineFill, highlighted: bool) -> &str {
        match fill {
            LineFill::Vip => &self.style.vip_color,
            _ if highlighted => &self.style.highlight_text_color,
            LineFill::TableId => &self.style.table_text_color,
            LineFill::DisplayName => &self.style.table_name_color,
        }
    }

    fn draw_caption(&self, svg: &mut String, layout: &CanvasLayout, req: &RenderRequest) {
        let caption = status_caption(req.tables, req.target_table_id, req.guest_name);
        let size = FontRole::Large.size(&self.style);
        let y = layout.canvas_height as f32 - self.style.offset_y_bottom as f32 / 2.0;

        svg.push_str(&format!(
            r#"<text x="{}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="middle">{}</text>"#,
            layout.canvas_width / 2,
            y + size / 3.0,
            size,
            FontRole::Large.weight(),
            self.style.caption_color,
            escape_xml(&caption),
        ));
    }
}

fn configure_font_fallbacks(fontdb: &mut usvg::fontdb::Database) {
    let mut sans_family: Option<String> = None;
    let mut first_family: Option<String> = None;

    for face in fontdb.faces() {
        for (family, _) in &face.families {
            if first_family.is_none() {
                first_family = Some(family.clone());
            }
            if sans_family.is_none() && family.to_ascii_lowercase().contains("sans") {
                sans_family = Some(family.clone());
            }
        }
    }

    if let Some(family) = sans_family.as_deref().or(first_family.as_deref()) {
        fontdb.set_sans_serif_family(family);
    }
}
