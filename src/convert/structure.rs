//! Structural inference: finding row and column containers in markup that
//! has no canonical row/column model.

use crate::css::parse_declaration_block;
use crate::dom::{Dom, NodeId};
use crate::style::{css_url, normalize_color};

/// Row-container class conventions of the legacy builders we import from.
pub const ROW_CLASSES: &[&str] = &[
    "u-row",
    "es-header-body",
    "es-content-body",
    "es-footer-body",
];

/// Outer wrapper classes used by the table-under-wrapper fallback.
pub const WRAPPER_CLASSES: &[&str] = &["es-wrapper", "wrapper"];

/// Discover row containers, in document order.
///
/// Priority: known row classes, then tables under a known wrapper class,
/// then the body itself as a single degenerate row.
pub fn infer_rows(dom: &Dom) -> Vec<NodeId> {
    let by_class: Vec<NodeId> = dom
        .descendants(dom.document())
        .filter(|&id| {
            dom.is_element(id) && ROW_CLASSES.iter().any(|class| dom.has_class(id, class))
        })
        .collect();
    if !by_class.is_empty() {
        return by_class;
    }

    let wrapped_tables: Vec<NodeId> = dom
        .descendants(dom.document())
        .filter(|&id| dom.is_tag(id, "table") && has_wrapper_ancestor(dom, id))
        .collect();
    if !wrapped_tables.is_empty() {
        return wrapped_tables;
    }

    dom.body().into_iter().collect()
}

fn has_wrapper_ancestor(dom: &Dom, id: NodeId) -> bool {
    let mut current = dom.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
    while current.is_some() {
        if WRAPPER_CLASSES
            .iter()
            .any(|class| dom.has_class(current, class))
        {
            return true;
        }
        current = dom.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
    }
    false
}

/// Discover the columns of one row.
///
/// Priority: the row's own table cells, then direct-child tables (one column
/// each), then the row element itself. Never returns an empty list.
pub fn infer_columns(dom: &Dom, row: NodeId) -> Vec<NodeId> {
    let mut cells = Vec::new();
    collect_row_cells(dom, row, &mut cells);
    if !cells.is_empty() {
        return cells;
    }

    let tables: Vec<NodeId> = dom
        .children(row)
        .filter(|&child| dom.is_tag(child, "table"))
        .collect();
    if !tables.is_empty() {
        return tables;
    }

    vec![row]
}

/// Collect the cells of the row's own table rows. Descends only through
/// table plumbing (tbody/thead/tfoot/tr) and stops at each cell, so nested
/// tables inside a cell contribute no extra columns.
fn collect_row_cells(dom: &Dom, node: NodeId, out: &mut Vec<NodeId>) {
    for child in dom.children(node) {
        match dom.tag_name(child).map(|n| n.as_ref()) {
            Some("td") | Some("th") => out.push(child),
            Some("tbody") | Some("thead") | Some("tfoot") | Some("tr") => {
                collect_row_cells(dom, child, out)
            }
            _ => {}
        }
    }
}

/// Background color and image pulled off a row or column element.
#[derive(Debug, Default, PartialEq)]
pub struct Surface {
    pub background_color: String,
    pub background_image: String,
}

/// Extract a surface from inline declarations plus the legacy `bgcolor` /
/// `background` attributes. `check_bgcolor` is the column-level extra.
pub fn extract_surface(dom: &Dom, id: NodeId, check_bgcolor: bool) -> Surface {
    let inline = dom
        .attr(id, "style")
        .map(parse_declaration_block)
        .unwrap_or_default();

    let mut color = inline.get("background-color").cloned().unwrap_or_default();
    if color.is_empty()
        && check_bgcolor
        && let Some(bgcolor) = dom.attr(id, "bgcolor")
    {
        color = bgcolor.to_string();
    }

    let image = inline
        .get("background-image")
        .and_then(|value| css_url(value))
        .or_else(|| {
            dom.attr(id, "background")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();

    Surface {
        background_color: normalize_color(&color),
        background_image: image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn rows_by_known_class_win() {
        let dom = parse_html(
            r#"<div class="es-wrapper"><table><tr><td>x</td></tr></table></div>
               <table class="es-content-body"><tr><td>y</td></tr></table>"#,
        );
        let rows = infer_rows(&dom);
        assert_eq!(rows.len(), 1);
        assert!(dom.has_class(rows[0], "es-content-body"));
    }

    #[test]
    fn falls_back_to_wrapped_tables() {
        let dom = parse_html(
            r#"<div class="wrapper">
                 <table><tr><td>a</td></tr></table>
                 <table><tr><td>b</td></tr></table>
               </div>"#,
        );
        let rows = infer_rows(&dom);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|&r| dom.is_tag(r, "table")));
    }

    #[test]
    fn falls_back_to_body_as_single_row() {
        let dom = parse_html("<p>just text</p>");
        let rows = infer_rows(&dom);
        assert_eq!(rows.len(), 1);
        assert!(dom.is_tag(rows[0], "body"));
    }

    #[test]
    fn columns_from_table_cells() {
        let dom = parse_html(
            r#"<table class="es-content-body"><tr><td>a</td><td>b</td></tr></table>"#,
        );
        let row = infer_rows(&dom)[0];
        let columns = infer_columns(&dom, row);
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|&c| dom.is_tag(c, "td")));
    }

    #[test]
    fn nested_table_cells_are_not_columns() {
        let dom = parse_html(
            r#"<table class="es-content-body"><tr><td>
                 <table><tr><td>inner</td><td>inner2</td></tr></table>
               </td></tr></table>"#,
        );
        let row = infer_rows(&dom)[0];
        assert_eq!(infer_columns(&dom, row).len(), 1);
    }

    #[test]
    fn div_row_uses_child_tables_then_itself() {
        let dom = parse_html(
            r#"<div class="u-row"><table><tr><td>a</td></tr></table><table><tr><td>b</td></tr></table></div>"#,
        );
        let row = infer_rows(&dom)[0];
        let columns = infer_columns(&dom, row);
        assert_eq!(columns.len(), 2);
        assert!(columns.iter().all(|&c| dom.is_tag(c, "table")));

        let dom2 = parse_html(r#"<div class="u-row"><p>text</p></div>"#);
        let row2 = infer_rows(&dom2)[0];
        assert_eq!(infer_columns(&dom2, row2), vec![row2]);
    }

    #[test]
    fn surface_extraction_prefers_inline_then_bgcolor() {
        let dom = parse_html(
            r##"<table><tr>
                 <td style="background-color: #111" bgcolor="#222">a</td>
                 <td bgcolor="#333">b</td>
                 <td style="background-color: transparent">c</td>
               </tr></table>"##,
        );
        let cells: Vec<_> = dom
            .descendants(dom.document())
            .filter(|&id| dom.is_tag(id, "td"))
            .collect();

        assert_eq!(extract_surface(&dom, cells[0], true).background_color, "#111");
        assert_eq!(extract_surface(&dom, cells[1], true).background_color, "#333");
        // bgcolor attr is a column-level extra
        assert_eq!(extract_surface(&dom, cells[1], false).background_color, "");
        assert_eq!(extract_surface(&dom, cells[2], true).background_color, "");
    }

    #[test]
    fn surface_background_image_from_style_or_attribute() {
        let dom = parse_html(
            r#"<table><tr>
                 <td style="background-image: url('https://x.com/a.png')">a</td>
                 <td background="https://x.com/b.png">b</td>
               </tr></table>"#,
        );
        let cells: Vec<_> = dom
            .descendants(dom.document())
            .filter(|&id| dom.is_tag(id, "td"))
            .collect();

        assert_eq!(
            extract_surface(&dom, cells[0], true).background_image,
            "https://x.com/a.png"
        );
        assert_eq!(
            extract_surface(&dom, cells[1], true).background_image,
            "https://x.com/b.png"
        );
    }
}
