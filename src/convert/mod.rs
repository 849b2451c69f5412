//! The conversion pipeline: HTML string in, design document out.
//!
//! Stages run strictly forward: parse → style index → structural inference →
//! content classification → assembled document → final counters pass.

mod content;
mod structure;

pub use structure::{ROW_CLASSES, WRAPPER_CLASSES, infer_columns, infer_rows};

use crate::css::StyleIndex;
use crate::document::{
    BackgroundImage, Body, BodyValues, Border, Column, ColumnValues, Counters, DesignDocument,
    FontFamily, LinkStyle, Meta, Row, RowValues, SCHEMA_VERSION, html_id,
};
use crate::dom::{Dom, NodeId, parse_html};
use crate::error::{Error, Result};
use crate::ids::{IdSource, TokenIds};
use crate::style::{effective_style, normalize_color, parse_border_shorthand, prop_or};

/// Convert an HTML email document (or fragment) into a design document.
///
/// Pure and synchronous; safe to call concurrently from separate threads.
/// Ids come from a fresh random-token source, so two conversions of the same
/// input differ only in id tokens.
pub fn convert(html: &str) -> Result<DesignDocument> {
    let mut ids = TokenIds::new();
    convert_with_ids(html, &mut ids)
}

/// [`convert`] with a caller-supplied id source, for fully deterministic
/// output (tests, snapshots).
pub fn convert_with_ids(html: &str, ids: &mut dyn IdSource) -> Result<DesignDocument> {
    let dom = parse_html(html);
    let body_el = dom
        .body()
        .ok_or_else(|| Error::InvalidHtml("document has no body element".to_string()))?;

    let index = StyleIndex::build(&dom);
    let mut builder = Builder {
        dom: &dom,
        index: &index,
        ids,
        counters: Counters::default(),
    };

    let mut rows = Vec::new();
    for row_el in structure::infer_rows(&dom) {
        if let Some(row) = builder.build_row(row_el) {
            rows.push(row);
        }
    }

    let values = body_values(&dom, &index, body_el);
    let mut doc = DesignDocument {
        counters: Counters::default(),
        body: Body {
            rows,
            headers: Vec::new(),
            footers: Vec::new(),
            values,
        },
        schema_version: SCHEMA_VERSION,
    };

    // Counters assigned during the build are provisional; the recount walk
    // over the surviving tree is authoritative.
    doc.recount();
    Ok(doc)
}

/// Mutable build state threaded through row/column/block construction.
struct Builder<'a, 'b> {
    dom: &'a Dom,
    index: &'a StyleIndex,
    ids: &'b mut dyn IdSource,
    counters: Counters,
}

impl Builder<'_, '_> {
    /// Build one row, or `None` when no column survives content discovery.
    fn build_row(&mut self, row_el: NodeId) -> Option<Row> {
        let mut columns = Vec::new();
        for col_el in structure::infer_columns(self.dom, row_el) {
            if let Some(column) = self.build_column(col_el) {
                columns.push(column);
            }
        }
        if columns.is_empty() {
            return None;
        }

        let surface = structure::extract_surface(self.dom, row_el, false);
        self.counters.row += 1;

        Some(Row {
            id: self.ids.next_id(),
            cells: vec![1; columns.len()],
            columns,
            values: RowValues {
                columns_background_color: surface.background_color,
                background_image: if surface.background_image.is_empty() {
                    BackgroundImage::default()
                } else {
                    BackgroundImage::with_url(surface.background_image)
                },
                meta: Meta {
                    html_id: html_id("row", self.counters.row),
                    ..Meta::default()
                },
                ..RowValues::default()
            },
        })
    }

    /// Build one column, or `None` when it yields no content blocks.
    fn build_column(&mut self, col_el: NodeId) -> Option<Column> {
        let contents = content::collect_blocks(self, col_el);
        if contents.is_empty() {
            return None;
        }

        let style = effective_style(self.dom, col_el, self.index);
        let background_color = {
            let resolved = normalize_color(prop_or(&style, "background-color", ""));
            if resolved.is_empty() {
                structure::extract_surface(self.dom, col_el, true).background_color
            } else {
                resolved
            }
        };
        let border = style
            .get("border")
            .and_then(|value| parse_border_shorthand(value))
            .map(|(width, line_style, color)| Border::uniform(width, line_style, color));

        self.counters.column += 1;
        Some(Column {
            id: self.ids.next_id(),
            contents,
            values: ColumnValues {
                background_color,
                border,
                border_radius: prop_or(&style, "border-radius", "0px").to_string(),
                meta: Meta {
                    html_id: html_id("column", self.counters.column),
                    ..Meta::default()
                },
                ..ColumnValues::default()
            },
        })
    }
}

/// Document-wide defaults, resolved from the body element (a `body { … }`
/// rule in a style block participates).
fn body_values(dom: &Dom, index: &StyleIndex, body_el: NodeId) -> BodyValues {
    let style = effective_style(dom, body_el, index);

    let background_color = {
        let mut resolved = normalize_color(prop_or(&style, "background-color", ""));
        if resolved.is_empty()
            && let Some(bgcolor) = dom.attr(body_el, "bgcolor")
        {
            resolved = normalize_color(bgcolor);
        }
        if resolved.is_empty() {
            "#ffffff".to_string()
        } else {
            resolved
        }
    };

    BodyValues {
        content_width: "600px".to_string(),
        font_family: FontFamily::default(),
        text_color: prop_or(&style, "color", "#000000").to_string(),
        background_color,
        background_image: BackgroundImage::default(),
        link_style: LinkStyle::default(),
        meta: Meta {
            html_id: "body".to_string(),
            ..Meta::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentBlock;
    use crate::ids::SequentialIds;

    fn convert_det(html: &str) -> DesignDocument {
        let mut ids = SequentialIds::new();
        convert_with_ids(html, &mut ids).expect("conversion should succeed")
    }

    #[test]
    fn single_cell_table_becomes_row_column_text() {
        let doc = convert_det(
            r#"<table class="es-content-body"><tr><td><p style="color:#111;font-size:40px">Hi</p></td></tr></table>"#,
        );

        assert_eq!(doc.body.rows.len(), 1);
        let row = &doc.body.rows[0];
        assert_eq!(row.columns.len(), 1);
        assert_eq!(row.cells, vec![1]);

        match &row.columns[0].contents[0] {
            ContentBlock::Text { values, .. } => {
                assert_eq!(values.font_size, "36px");
                assert_eq!(values.color, "#111");
                assert!(values.text.contains("Hi"));
            }
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[test]
    fn empty_rows_are_dropped() {
        let doc = convert_det(
            r#"<table class="es-content-body"><tr><td>   </td></tr></table>
               <table class="es-content-body"><tr><td><p>keep</p></td></tr></table>"#,
        );
        assert_eq!(doc.body.rows.len(), 1);
        assert_eq!(doc.counters.row, 1);
    }

    #[test]
    fn body_defaults_resolve_from_style_block() {
        let doc = convert_det(
            r#"<style>body { background-color: #eeeeee; color: #333333; }</style>
               <table class="es-content-body"><tr><td><p>x</p></td></tr></table>"#,
        );
        assert_eq!(doc.body.values.background_color, "#eeeeee");
        assert_eq!(doc.body.values.text_color, "#333333");
        assert_eq!(doc.body.values.content_width, "600px");
    }

    #[test]
    fn column_border_descriptor_only_when_resolved() {
        let doc = convert_det(
            r#"<table class="es-content-body"><tr>
                 <td style="border: 2px dashed #ccc"><p>a</p></td>
                 <td><p>b</p></td>
               </tr></table>"#,
        );
        let columns = &doc.body.rows[0].columns;
        let border = columns[0].values.border.as_ref().expect("border");
        assert_eq!(border.border_top_width, "2px");
        assert_eq!(border.border_left_style, "dashed");
        assert!(columns[1].values.border.is_none());
    }

    #[test]
    fn row_background_lands_in_columns_background_color() {
        let doc = convert_det(
            r#"<table class="es-content-body" style="background-color: #fafafa">
                 <tr><td><p>x</p></td></tr>
               </table>"#,
        );
        assert_eq!(
            doc.body.rows[0].values.columns_background_color,
            "#fafafa"
        );
    }
}
