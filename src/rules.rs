use crate::style::Style;

/// Semantic font slot for a label line; resolved to a size/weight by `Style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Large,
    Medium,
    Small,
    Thin,
}

impl FontRole {
    pub fn size(self, style: &Style) -> f32 {
        match self {
            FontRole::Large => style.font_size_large,
            FontRole::Medium => style.font_size_medium,
            FontRole::Small => style.font_size_small,
            FontRole::Thin => style.font_size_thin,
        }
    }

    /// CSS weight emitted into the SVG.
    pub fn weight(self) -> u16 {
        match self {
            FontRole::Large => 700,
            FontRole::Medium | FontRole::Small => 500,
            FontRole::Thin => 100,
        }
    }
}

/// Semantic fill slot; the renderer maps it to a concrete color, taking the
/// highlight state into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFill {
    TableId,
    DisplayName,
    Vip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: FontRole,
    pub fill: LineFill,
}

impl TextLine {
    fn new(text: impl Into<String>, font: FontRole, fill: LineFill) -> Self {
        Self {
            text: text.into(),
            font,
            fill,
        }
    }
}

/// Final multi-line label for one table disc.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

struct RuleCtx<'a> {
    table_id: &'a str,
    display_name: &'a str,
    /// Length of the original displayName in characters; rules test this even
    /// after earlier rules rewrote the live lines.
    name_chars: usize,
}

type RuleStep = fn(&mut Vec<TextLine>, &RuleCtx);

/// Ordered rule table. Every step whose token appears in `text_rules` runs,
/// in this order; later steps may override earlier ones. In particular the
/// three wrap rules each reassign the lines wholesale, so the last matching
/// one wins.
const RULE_STEPS: &[(&str, RuleStep)] = &[
    ("shrink_at_4", shrink_at_4),
    ("wrap_at_2", wrap_at_2),
    ("wrap_at_3", wrap_at_3),
    ("wrap_at_4", wrap_at_4),
    ("thin", thin),
    ("decorate_star", decorate_star),
    ("uppercase", uppercase),
    ("color_by_vip", color_by_vip),
    ("truncate_at_8", truncate_at_8),
];

fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

fn shrink_at_4(lines: &mut Vec<TextLine>, ctx: &RuleCtx) {
    if ctx.name_chars > 4 {
        if let Some(line) = lines.get_mut(1) {
            line.font = FontRole::Small;
        }
    }
}

fn wrap_at(lines: &mut Vec<TextLine>, ctx: &RuleCtx, threshold: usize) {
    if ctx.name_chars > threshold {
        let (head, tail) = split_chars(ctx.display_name, threshold);
        *lines = vec![
            TextLine::new(ctx.table_id, FontRole::Medium, LineFill::TableId),
            TextLine::new(head, FontRole::Medium, LineFill::DisplayName),
            TextLine::new(tail, FontRole::Medium, LineFill::DisplayName),
        ];
    }
}

fn wrap_at_2(lines: &mut Vec<TextLine>, ctx: &RuleCtx) {
    wrap_at(lines, ctx, 2);
}

fn wrap_at_3(lines: &mut Vec<TextLine>, ctx: &RuleCtx) {
    wrap_at(lines, ctx, 3);
}

fn wrap_at_4(lines: &mut Vec<TextLine>, ctx: &RuleCtx) {
    wrap_at(lines, ctx, 4);
}

fn thin(lines: &mut Vec<TextLine>, _ctx: &RuleCtx) {
    if let Some(line) = lines.get_mut(1) {
        line.font = FontRole::Thin;
    }
}

fn decorate_star(lines: &mut Vec<TextLine>, _ctx: &RuleCtx) {
    if let Some(line) = lines.get_mut(1) {
        line.text = format!("⭐ {} ⭐", line.text);
    }
}

fn uppercase(lines: &mut Vec<TextLine>, _ctx: &RuleCtx) {
    if let Some(line) = lines.get_mut(1) {
        line.text = line.text.to_uppercase();
    }
}

fn color_by_vip(lines: &mut Vec<TextLine>, _ctx: &RuleCtx) {
    if let Some(line) = lines.get_mut(1) {
        if line.text.to_uppercase().contains("VIP") {
            line.fill = LineFill::Vip;
        }
    }
}

fn truncate_at_8(lines: &mut Vec<TextLine>, ctx: &RuleCtx) {
    if ctx.name_chars > 8 {
        if let Some(line) = lines.get_mut(1) {
            line.text = format!("{}…", take_chars(&line.text, 7));
        }
    }
}

/// Build the label block for one table from its id, displayName and rule
/// string. Tokens are matched by substring containment, so several rules can
/// combine on one table.
pub fn compose_label(table_id: &str, display_name: &str, text_rules: &str) -> TextBlock {
    let table_id = table_id.to_uppercase();

    // name_only is the one rule that hides the table id; it is exclusive
    // with the default layout and with every other rule.
    if text_rules.contains("name_only") && !display_name.is_empty() {
        return TextBlock {
            lines: vec![TextLine::new(display_name, FontRole::Medium, LineFill::TableId)],
        };
    }

    if display_name.is_empty() {
        return TextBlock {
            lines: vec![TextLine::new(&*table_id, FontRole::Large, LineFill::TableId)],
        };
    }

    let ctx = RuleCtx {
        table_id: &table_id,
        display_name,
        name_chars: char_count(display_name),
    };

    let mut lines = vec![
        TextLine::new(&*table_id, FontRole::Medium, LineFill::TableId),
        TextLine::new(display_name, FontRole::Medium, LineFill::DisplayName),
    ];

    for (token, step) in RULE_STEPS {
        if text_rules.contains(token) {
            step(&mut lines, &ctx);
        }
    }

    TextBlock { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(block: &TextBlock) -> Vec<&str> {
        block.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn default_layout_shows_id_and_name() {
        let block = compose_label("t5", "男方同事", "");
        assert_eq!(texts(&block), vec!["T5", "男方同事"]);
        assert_eq!(block.lines[0].font, FontRole::Medium);
        assert_eq!(block.lines[1].fill, LineFill::DisplayName);
    }

    #[test]
    fn empty_display_name_uses_large_id_alone() {
        let block = compose_label("t9", "", "wrap_at_2 decorate_star");
        assert_eq!(texts(&block), vec!["T9"]);
        assert_eq!(block.lines[0].font, FontRole::Large);
    }

    #[test]
    fn name_only_suppresses_table_id() {
        let block = compose_label("T3", "新娘好友", "name_only uppercase");
        assert_eq!(texts(&block), vec!["新娘好友"]);
    }

    #[test]
    fn name_only_with_empty_name_falls_back_to_default() {
        let block = compose_label("T3", "", "name_only");
        assert_eq!(texts(&block), vec!["T3"]);
        assert_eq!(block.lines[0].font, FontRole::Large);
    }

    #[test]
    fn wrap_at_2_splits_cjk_name_in_characters() {
        let block = compose_label("T4", "女方親戚", "wrap_at_2");
        assert_eq!(texts(&block), vec!["T4", "女方", "親戚"]);
    }

    #[test]
    fn last_matching_wrap_rule_wins() {
        let block = compose_label("T4", "女方遠房親戚", "wrap_at_2,wrap_at_3");
        assert_eq!(texts(&block), vec!["T4", "女方遠", "房親戚"]);
    }

    #[test]
    fn wrap_threshold_not_exceeded_leaves_lines_alone() {
        let block = compose_label("T4", "親戚", "wrap_at_2");
        assert_eq!(texts(&block), vec!["T4", "親戚"]);
    }

    #[test]
    fn shrink_at_4_shrinks_long_names() {
        let block = compose_label("T6", "男方大學同學", "shrink_at_4");
        assert_eq!(block.lines[1].font, FontRole::Small);
    }

    #[test]
    fn wrap_discards_earlier_shrink() {
        // shrink_at_4 runs before the wrap rules; the wrap rewrites the block
        // wholesale and resets every font back to medium.
        let block = compose_label("T6", "男方大學同學", "shrink_at_4 wrap_at_3");
        assert_eq!(texts(&block), vec!["T6", "男方大", "學同學"]);
        assert!(block.lines.iter().all(|l| l.font == FontRole::Medium));
    }

    #[test]
    fn thin_after_wrap_targets_first_name_fragment() {
        let block = compose_label("T6", "男方大學同學", "wrap_at_3 thin");
        assert_eq!(block.lines[1].font, FontRole::Thin);
        assert_eq!(block.lines[2].font, FontRole::Medium);
    }

    #[test]
    fn decorate_star_wraps_name_with_glyphs() {
        let block = compose_label("T7", "伴娘", "decorate_star");
        assert_eq!(block.lines[1].text, "⭐ 伴娘 ⭐");
    }

    #[test]
    fn color_by_vip_matches_after_uppercase_transform() {
        let block = compose_label("T8", "vip guests", "uppercase color_by_vip");
        assert_eq!(block.lines[1].text, "VIP GUESTS");
        assert_eq!(block.lines[1].fill, LineFill::Vip);
    }

    #[test]
    fn color_by_vip_ignores_non_vip_names() {
        let block = compose_label("T8", "同事", "color_by_vip");
        assert_eq!(block.lines[1].fill, LineFill::DisplayName);
    }

    #[test]
    fn truncate_at_8_checks_original_length() {
        let block = compose_label("T2", "0123456789", "truncate_at_8");
        assert_eq!(block.lines[1].text, "0123456…");
        assert_eq!(block.lines[1].text.chars().count(), 8);
    }

    #[test]
    fn truncate_skips_names_at_threshold() {
        let block = compose_label("T2", "12345678", "truncate_at_8");
        assert_eq!(block.lines[1].text, "12345678");
    }

    #[test]
    fn truncate_applies_to_live_line_after_decoration() {
        let block = compose_label("T2", "0123456789", "decorate_star truncate_at_8");
        assert_eq!(block.lines[1].text, "⭐ 01234…");
    }
}
