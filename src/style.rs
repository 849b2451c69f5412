//! Effective style resolution.
//!
//! Precedence, highest first: inline `style` attribute, matched style-index
//! rules (index order, later match wins per property), legacy presentational
//! attributes (`align`, `valign`), baseline defaults.

use crate::css::matcher::ElementRef;
use crate::css::{PropertyMap, StyleIndex, parse_declaration_block};
use crate::dom::{Dom, NodeId};

/// Baseline defaults applied beneath everything else for content styling.
pub const BASELINE: &[(&str, &str)] = &[
    ("font-size", "14px"),
    ("line-height", "1.4"),
    ("text-align", "center"),
    ("color", "#000000"),
    ("font-family", "'Cabin', sans-serif"),
    ("font-weight", "normal"),
    ("background-color", "transparent"),
    ("padding", "10px 20px"),
];

/// Accent used when a button or image resolves no background of its own.
pub const BRAND_ACCENT: &str = "#3AAEE0";

/// The element's own style: inline declarations plus the legacy `align` /
/// `valign` attributes (which never override an inline declaration).
pub fn own_style(dom: &Dom, id: NodeId) -> PropertyMap {
    let mut map = dom
        .attr(id, "style")
        .map(parse_declaration_block)
        .unwrap_or_default();

    if let Some(align) = dom.attr(id, "align") {
        map.entry("text-align".to_string())
            .or_insert_with(|| align.trim().to_string());
    }
    if let Some(valign) = dom.attr(id, "valign") {
        map.entry("vertical-align".to_string())
            .or_insert_with(|| valign.trim().to_string());
    }
    map
}

/// Own style with baseline defaults filled in for anything unset.
pub fn own_style_with_defaults(dom: &Dom, id: NodeId) -> PropertyMap {
    let mut map = own_style(dom, id);
    for (property, value) in BASELINE {
        map.entry((*property).to_string())
            .or_insert_with(|| (*value).to_string());
    }
    map
}

/// Full resolution against the style index: matched rules accumulate in
/// index order, then the element's own style overlays the result.
///
/// Rules whose selectors fell outside the supported subset carry no parsed
/// selectors and are skipped here, never failing the resolution.
pub fn effective_style(dom: &Dom, id: NodeId, index: &StyleIndex) -> PropertyMap {
    let mut acc = PropertyMap::new();
    let elem = ElementRef::new(dom, id);

    for rule in index.rules() {
        if rule.selectors.is_empty() {
            continue;
        }
        if elem.matches_any(&rule.selectors) {
            for (property, value) in &rule.declarations {
                acc.insert(property.clone(), value.clone());
            }
        }
    }

    for (property, value) in own_style(dom, id) {
        acc.insert(property, value);
    }
    acc
}

/// Property lookup with a caller-supplied fallback for missing/empty values.
pub fn prop_or<'a>(map: &'a PropertyMap, property: &str, default: &'a str) -> &'a str {
    match map.get(property) {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

/// `transparent` means "no explicit color" everywhere in the output model.
pub fn normalize_color(value: &str) -> String {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        String::new()
    } else {
        value.to_string()
    }
}

/// Background fallback for buttons and images.
pub fn color_or_accent(value: &str) -> String {
    let normalized = normalize_color(value);
    if normalized.is_empty() {
        BRAND_ACCENT.to_string()
    } else {
        normalized
    }
}

/// Clamp a font-size value to the editor's [14px, 36px] range.
///
/// Units are ignored; the leading number is treated as pixels, matching how
/// the editor interprets the field. Unparsable input falls back to 14px.
pub fn clamp_font_size(value: &str) -> String {
    let size = leading_number(value).unwrap_or(14.0);
    let clamped = size.clamp(14.0, 36.0);
    format!("{}px", clamped.round() as i32)
}

fn leading_number(value: &str) -> Option<f32> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Extract the inner url from a `url(...)` CSS value, quotes stripped.
pub fn css_url(value: &str) -> Option<String> {
    let value = value.trim();
    let open = value.find("url(")?;
    let rest = &value[open + 4..];
    let close = rest.find(')')?;
    let inner = rest[..close].trim().trim_matches(['\'', '"']);
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Split a `border` shorthand (`1px solid #ccc`) into width/style/color.
///
/// Returns `None` unless a width or a line style is present; a bare color
/// does not count as a resolved border.
pub fn parse_border_shorthand(value: &str) -> Option<(String, String, String)> {
    const LINE_STYLES: &[&str] = &[
        "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset", "none",
        "hidden",
    ];

    let mut width = None;
    let mut line_style = None;
    let mut color = None;

    for token in value.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        if LINE_STYLES.contains(&lower.as_str()) {
            line_style.get_or_insert(lower);
        } else if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            width.get_or_insert(token.to_string());
        } else {
            color.get_or_insert(token.to_string());
        }
    }

    if width.is_none() && line_style.is_none() {
        return None;
    }
    Some((
        width.unwrap_or_else(|| "1px".to_string()),
        line_style.unwrap_or_else(|| "solid".to_string()),
        color.unwrap_or_else(|| "#000000".to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn first_tag(dom: &Dom, tag: &str) -> NodeId {
        dom.find_element(|id| dom.is_tag(id, tag)).unwrap()
    }

    #[test]
    fn inline_style_parses_into_own_style() {
        let dom = parse_html(r#"<p style="Color: #111; font-size: 18px">x</p>"#);
        let p = first_tag(&dom, "p");
        let style = own_style(&dom, p);
        assert_eq!(style["color"], "#111");
        assert_eq!(style["font-size"], "18px");
    }

    #[test]
    fn align_attribute_feeds_text_align_but_loses_to_inline() {
        let dom = parse_html(
            r#"<table><tr><td align="right">x</td><td align="left" style="text-align: center">y</td></tr></table>"#,
        );
        let cells: Vec<_> = dom
            .descendants(dom.document())
            .filter(|&id| dom.is_tag(id, "td"))
            .collect();

        assert_eq!(own_style(&dom, cells[0])["text-align"], "right");
        assert_eq!(own_style(&dom, cells[1])["text-align"], "center");
    }

    #[test]
    fn defaults_fill_unset_properties_only() {
        let dom = parse_html(r#"<p style="color: #222">x</p>"#);
        let p = first_tag(&dom, "p");
        let style = own_style_with_defaults(&dom, p);
        assert_eq!(style["color"], "#222");
        assert_eq!(style["font-size"], "14px");
        assert_eq!(style["font-family"], "'Cabin', sans-serif");
    }

    #[test]
    fn inline_beats_matched_rule() {
        let dom = parse_html(
            r#"<style>.promo { background-color: red; color: green; }</style>
               <table><tr><td class="promo" style="background-color: blue">x</td></tr></table>"#,
        );
        let td = first_tag(&dom, "td");
        let index = crate::css::StyleIndex::build(&dom);
        let style = effective_style(&dom, td, &index);

        assert_eq!(style["background-color"], "blue");
        assert_eq!(style["color"], "green");
    }

    #[test]
    fn later_matching_rule_wins() {
        let dom = parse_html(
            r#"<style>td { color: red; } .promo { color: blue; }</style>
               <table><tr><td class="promo">x</td></tr></table>"#,
        );
        let td = first_tag(&dom, "td");
        let index = crate::css::StyleIndex::build(&dom);
        assert_eq!(effective_style(&dom, td, &index)["color"], "blue");
    }

    #[test]
    fn clamps_font_sizes() {
        assert_eq!(clamp_font_size("40px"), "36px");
        assert_eq!(clamp_font_size("8px"), "14px");
        assert_eq!(clamp_font_size("20"), "20px");
        assert_eq!(clamp_font_size("1.5em"), "14px"); // 1.5 clamps up
        assert_eq!(clamp_font_size("bogus"), "14px");
    }

    #[test]
    fn transparent_normalizes_to_empty() {
        assert_eq!(normalize_color("transparent"), "");
        assert_eq!(normalize_color("Transparent"), "");
        assert_eq!(normalize_color("#fff"), "#fff");
        assert_eq!(color_or_accent("transparent"), BRAND_ACCENT);
        assert_eq!(color_or_accent("#123456"), "#123456");
    }

    #[test]
    fn extracts_css_urls() {
        assert_eq!(
            css_url("url('https://x.com/bg.png')").as_deref(),
            Some("https://x.com/bg.png")
        );
        assert_eq!(css_url("url(bg.png)").as_deref(), Some("bg.png"));
        assert_eq!(css_url("none"), None);
    }

    #[test]
    fn border_shorthand_needs_width_or_style() {
        assert_eq!(
            parse_border_shorthand("1px solid #ccc"),
            Some(("1px".into(), "solid".into(), "#ccc".into()))
        );
        assert_eq!(
            parse_border_shorthand("dotted"),
            Some(("1px".into(), "dotted".into(), "#000000".into()))
        );
        assert_eq!(parse_border_shorthand("#ccc"), None);
        assert_eq!(parse_border_shorthand(""), None);
    }
}
