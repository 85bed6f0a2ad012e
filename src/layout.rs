use crate::data::TableSet;
use crate::style::Style;

/// Resolved canvas geometry for one render: bounding grid extent scaled to
/// pixels, clamped to the configured minimum canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasLayout {
    pub canvas_width: i64,
    pub canvas_height: i64,
    pub grid_content_width: i64,
    pub grid_content_height: i64,
    grid_origin_y: i64,
    offset_x: i64,
    scale: i64,
}

impl CanvasLayout {
    pub fn resolve(tables: &TableSet, style: &Style) -> Self {
        let mut max_x: i64 = 0;
        let mut max_y: i64 = 0;
        for (_, record) in tables.iter() {
            if let Some((x, y)) = record.position {
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        let grid_content_width = (max_x + 1) * style.scale;
        let grid_content_height = (max_y + 1) * style.scale;

        let canvas_width = (grid_content_width + style.offset_x * 2).max(style.min_canvas_width);
        let canvas_height = (style.logo_area_height
            + style.offset_y_top_grid
            + grid_content_height
            + style.offset_y_bottom
            + style.offset_y_top)
            .max(style.min_canvas_height + style.logo_area_height);

        Self {
            canvas_width,
            canvas_height,
            grid_content_width,
            grid_content_height,
            grid_origin_y: style.offset_y_top + style.logo_area_height + style.offset_y_top_grid,
            offset_x: style.offset_x,
            scale: style.scale,
        }
    }

    /// Grid coordinate to pixel disc center. Grid y grows upward, so pixel y
    /// is mirrored inside the grid band; y=0 lands near the bottom.
    pub fn table_center(&self, position: (i64, i64)) -> (i64, i64) {
        let (grid_x, grid_y) = position;
        let center_x = self.offset_x + grid_x * self.scale + self.scale / 2;
        let center_y =
            self.grid_origin_y + self.grid_content_height - (grid_y * self.scale + self.scale / 2);
        (center_x, center_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableRecord;
    use proptest::prelude::*;

    fn set_with_positions(positions: &[(i64, i64)]) -> TableSet {
        let mut set = TableSet::default();
        for (i, &pos) in positions.iter().enumerate() {
            set.insert(
                &format!("T{}", i + 1),
                TableRecord {
                    position: Some(pos),
                    ..TableRecord::default()
                },
            );
        }
        set
    }

    #[test]
    fn empty_table_set_yields_minimum_canvas() {
        let style = Style::default();
        let layout = CanvasLayout::resolve(&TableSet::default(), &style);
        assert_eq!(layout.canvas_width, style.min_canvas_width);
        assert_eq!(
            layout.canvas_height,
            style.min_canvas_height + style.logo_area_height
        );
    }

    #[test]
    fn position_less_tables_are_excluded_from_extent() {
        let mut set = TableSet::default();
        set.insert("T1", TableRecord::default());
        let style = Style::default();
        let layout = CanvasLayout::resolve(&set, &style);
        assert_eq!(layout.grid_content_width, style.scale);
        assert_eq!(layout.canvas_width, style.min_canvas_width);
    }

    #[test]
    fn wide_grid_grows_canvas_beyond_minimum() {
        let style = Style::default();
        let layout = CanvasLayout::resolve(&set_with_positions(&[(7, 3)]), &style);
        assert_eq!(layout.grid_content_width, 8 * style.scale);
        assert_eq!(
            layout.canvas_width,
            8 * style.scale + 2 * style.offset_x
        );
    }

    #[test]
    fn grid_y_is_mirrored_within_grid_band() {
        let style = Style::default();
        let layout = CanvasLayout::resolve(&set_with_positions(&[(0, 0), (0, 2)]), &style);
        let origin = style.offset_y_top + style.logo_area_height + style.offset_y_top_grid;

        let (x0, y0) = layout.table_center((0, 0));
        let (_, y2) = layout.table_center((0, 2));

        assert_eq!(x0, style.offset_x + style.scale / 2);
        // y=0 renders near the bottom of the grid band, y=2 above it.
        assert_eq!(y0, origin + 3 * style.scale - style.scale / 2);
        assert_eq!(y2, origin + style.scale - style.scale / 2);
        assert!(y2 < y0);
    }

    proptest! {
        #[test]
        fn canvas_is_monotonic_in_grid_extent(
            ax in 0i64..24, ay in 0i64..24,
            dx in 0i64..8, dy in 0i64..8,
        ) {
            let style = Style::default();
            let small = CanvasLayout::resolve(&set_with_positions(&[(ax, ay)]), &style);
            let large = CanvasLayout::resolve(&set_with_positions(&[(ax + dx, ay + dy)]), &style);

            prop_assert!(large.canvas_width >= small.canvas_width);
            prop_assert!(large.canvas_height >= small.canvas_height);
            prop_assert!(small.canvas_width >= style.min_canvas_width);
            prop_assert!(small.canvas_height >= style.min_canvas_height);
        }
    }
}
