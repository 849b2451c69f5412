//! The design document: the typed tree the visual editor loads.
//!
//! Field names serialize to the editor's camelCase JSON contract. The tree is
//! built once per conversion and finalized by [`DesignDocument::recount`],
//! which makes the counters and `_meta.htmlID` values authoritative.

use serde::Serialize;

/// Version of the document model the editor expects.
pub const SCHEMA_VERSION: u32 = 16;

/// Root of the converter's output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DesignDocument {
    pub counters: Counters,
    pub body: Body,
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,
}

impl DesignDocument {
    /// JSON form consumed by the editor's load-design call.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Recompute every counter and `_meta.htmlID` from the finished tree.
    ///
    /// Ids assigned during the build are provisional; rows, columns and
    /// blocks can be discarded after being numbered, so this final walk is
    /// what makes the counters and the per-node ids mutually consistent.
    /// Idempotent.
    pub fn recount(&mut self) {
        let mut counters = Counters::default();

        for row in &mut self.body.rows {
            counters.row += 1;
            row.values.meta.html_id = html_id("row", counters.row);

            for column in &mut row.columns {
                counters.column += 1;
                column.values.meta.html_id = html_id("column", counters.column);

                for block in &mut column.contents {
                    match block {
                        ContentBlock::Text { values, .. } => {
                            counters.text += 1;
                            values.meta.html_id = html_id("text", counters.text);
                        }
                        ContentBlock::Image { values, .. } => {
                            counters.image += 1;
                            values.meta.html_id = html_id("image", counters.image);
                        }
                        ContentBlock::Button { values, .. } => {
                            counters.button += 1;
                            values.meta.html_id = html_id("button", counters.button);
                        }
                    }
                }
            }
        }

        self.counters = counters;
    }
}

/// Mint a stable per-type HTML id, e.g. `text_3`.
pub fn html_id(kind: &str, n: u32) -> String {
    format!("{kind}_{n}")
}

/// Per-type block totals; mirrors the final tree after [`DesignDocument::recount`].
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Counters {
    pub row: u32,
    pub column: u32,
    pub text: u32,
    pub image: u32,
    pub button: u32,
    /// Reserved block types the converter never emits.
    pub social: u32,
    pub carousel: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Body {
    pub rows: Vec<Row>,
    /// Reserved for forward compatibility; always empty here.
    pub headers: Vec<serde_json::Value>,
    pub footers: Vec<serde_json::Value>,
    pub values: BodyValues,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BodyValues {
    pub content_width: String,
    pub font_family: FontFamily,
    pub text_color: String,
    pub background_color: String,
    pub background_image: BackgroundImage,
    pub link_style: LinkStyle,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FontFamily {
    pub label: String,
    pub value: String,
}

impl Default for FontFamily {
    fn default() -> Self {
        Self {
            label: "Cabin".to_string(),
            value: "'Cabin',sans-serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    pub url: String,
    pub full_width: bool,
    pub repeat: String,
    pub size: String,
    pub position: String,
}

impl BackgroundImage {
    pub fn with_url(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }
}

impl Default for BackgroundImage {
    fn default() -> Self {
        Self {
            url: String::new(),
            full_width: true,
            repeat: "no-repeat".to_string(),
            size: "custom".to_string(),
            position: "center".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkStyle {
    pub body: bool,
    pub link_color: String,
    pub link_hover_color: String,
    pub link_underline: bool,
    pub link_hover_underline: bool,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            body: true,
            link_color: "#0000ee".to_string(),
            link_hover_color: "#0000ee".to_string(),
            link_underline: true,
            link_hover_underline: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(rename = "htmlID")]
    pub html_id: String,
    pub html_class_names: String,
}

/// One horizontal section of the email.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Row {
    pub id: String,
    /// One placeholder weight per column; widths are not preserved.
    pub cells: Vec<u32>,
    pub columns: Vec<Column>,
    pub values: RowValues,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowValues {
    pub columns_background_color: String,
    pub background_image: BackgroundImage,
    pub padding: String,
    pub border_radius: String,
    pub selectable: bool,
    pub draggable: bool,
    pub duplicatable: bool,
    pub deletable: bool,
    pub hideable: bool,
    pub locked: bool,
    pub hide_mobile: bool,
    pub no_stack_mobile: bool,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

impl Default for RowValues {
    fn default() -> Self {
        Self {
            columns_background_color: String::new(),
            background_image: BackgroundImage::default(),
            padding: "0px".to_string(),
            border_radius: "0px".to_string(),
            selectable: true,
            draggable: true,
            duplicatable: true,
            deletable: true,
            hideable: true,
            locked: false,
            hide_mobile: false,
            no_stack_mobile: false,
            meta: Meta::default(),
        }
    }
}

/// One vertical slot within a row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Column {
    pub id: String,
    pub contents: Vec<ContentBlock>,
    pub values: ColumnValues,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnValues {
    pub background_color: String,
    pub vertical_align: String,
    pub border_radius: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    pub deletable: bool,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

impl Default for ColumnValues {
    fn default() -> Self {
        Self {
            background_color: String::new(),
            vertical_align: "middle".to_string(),
            border_radius: "0px".to_string(),
            border: None,
            deletable: true,
            meta: Meta::default(),
        }
    }
}

/// Four-sided border descriptor built from a resolved `border` shorthand.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub border_top_width: String,
    pub border_top_style: String,
    pub border_top_color: String,
    pub border_right_width: String,
    pub border_right_style: String,
    pub border_right_color: String,
    pub border_bottom_width: String,
    pub border_bottom_style: String,
    pub border_bottom_color: String,
    pub border_left_width: String,
    pub border_left_style: String,
    pub border_left_color: String,
}

impl Border {
    pub fn uniform(width: String, style: String, color: String) -> Self {
        Self {
            border_top_width: width.clone(),
            border_top_style: style.clone(),
            border_top_color: color.clone(),
            border_right_width: width.clone(),
            border_right_style: style.clone(),
            border_right_color: color.clone(),
            border_bottom_width: width.clone(),
            border_bottom_style: style.clone(),
            border_bottom_color: color.clone(),
            border_left_width: width,
            border_left_style: style,
            border_left_color: color,
        }
    }
}

/// Leaf node of the design tree.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { id: String, values: TextValues },
    Image { id: String, values: ImageValues },
    Button { id: String, values: ButtonValues },
}

impl ContentBlock {
    pub fn id(&self) -> &str {
        match self {
            ContentBlock::Text { id, .. }
            | ContentBlock::Image { id, .. }
            | ContentBlock::Button { id, .. } => id,
        }
    }
}

/// Shared editor capability flags carried by every block's values record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockFlags {
    pub selectable: bool,
    pub draggable: bool,
    pub duplicatable: bool,
    pub deletable: bool,
    pub hideable: bool,
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self {
            selectable: true,
            draggable: true,
            duplicatable: true,
            deletable: true,
            hideable: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextValues {
    pub container_padding: String,
    pub font_size: String,
    pub line_height: String,
    pub text_align: String,
    pub color: String,
    pub font_family: String,
    pub font_weight: String,
    pub text: String,
    #[serde(flatten)]
    pub flags: BlockFlags,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageValues {
    pub container_padding: String,
    pub src: ImageSource,
    pub alt_text: String,
    pub action: LinkAction,
    pub text_align: String,
    pub border_radius: String,
    #[serde(flatten)]
    pub flags: BlockFlags,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub url: String,
    pub width: String,
    pub height: String,
    pub max_width: String,
    pub auto_width: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkAction {
    pub name: String,
    pub values: LinkValues,
}

impl LinkAction {
    pub fn web(href: String, target: String) -> Self {
        Self {
            name: "web".to_string(),
            values: LinkValues { href, target },
        }
    }
}

impl Default for LinkAction {
    fn default() -> Self {
        Self::web(String::new(), String::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LinkValues {
    pub href: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonValues {
    pub container_padding: String,
    pub href: LinkAction,
    pub button_colors: ButtonColors,
    pub font_size: String,
    pub padding: String,
    pub text_align: String,
    pub border_radius: String,
    pub text: String,
    #[serde(flatten)]
    pub flags: BlockFlags,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

/// Hover colors mirror the base colors; distinct hover styles are not inferred.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonColors {
    pub color: String,
    pub background_color: String,
    pub hover_color: String,
    pub hover_background_color: String,
}

impl ButtonColors {
    pub fn new(color: String, background_color: String) -> Self {
        Self {
            hover_color: color.clone(),
            hover_background_color: background_color.clone(),
            color,
            background_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(n: u32) -> ContentBlock {
        ContentBlock::Text {
            id: format!("tok{n}"),
            values: TextValues {
                container_padding: "10px 20px".into(),
                font_size: "14px".into(),
                line_height: "1.4".into(),
                text_align: "center".into(),
                color: "#000000".into(),
                font_family: "'Cabin', sans-serif".into(),
                font_weight: "normal".into(),
                text: "<p>x</p>".into(),
                flags: BlockFlags::default(),
                meta: Meta {
                    html_id: "text_99".into(),
                    html_class_names: String::new(),
                },
            },
        }
    }

    fn document_with_blocks(blocks: Vec<ContentBlock>) -> DesignDocument {
        DesignDocument {
            counters: Counters::default(),
            body: Body {
                rows: vec![Row {
                    id: "r1".into(),
                    cells: vec![1],
                    columns: vec![Column {
                        id: "c1".into(),
                        contents: blocks,
                        values: ColumnValues::default(),
                    }],
                    values: RowValues::default(),
                }],
                headers: vec![],
                footers: vec![],
                values: BodyValues {
                    content_width: "600px".into(),
                    font_family: FontFamily::default(),
                    text_color: "#000000".into(),
                    background_color: "#ffffff".into(),
                    background_image: BackgroundImage::default(),
                    link_style: LinkStyle::default(),
                    meta: Meta::default(),
                },
            },
            schema_version: SCHEMA_VERSION,
        }
    }

    #[test]
    fn recount_overwrites_provisional_ids() {
        let mut doc = document_with_blocks(vec![text_block(1), text_block(2)]);
        doc.recount();

        assert_eq!(doc.counters.row, 1);
        assert_eq!(doc.counters.column, 1);
        assert_eq!(doc.counters.text, 2);
        assert_eq!(doc.counters.image, 0);

        let row = &doc.body.rows[0];
        assert_eq!(row.values.meta.html_id, "row_1");
        match &row.columns[0].contents[1] {
            ContentBlock::Text { values, .. } => assert_eq!(values.meta.html_id, "text_2"),
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[test]
    fn recount_is_idempotent() {
        let mut doc = document_with_blocks(vec![text_block(1)]);
        doc.recount();
        let first = doc.clone();
        doc.recount();
        assert_eq!(doc, first);
    }

    #[test]
    fn serializes_to_editor_json_shape() {
        let mut doc = document_with_blocks(vec![text_block(1)]);
        doc.recount();
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(json["schemaVersion"], 16);
        assert_eq!(json["counters"]["row"], 1);
        let block = &json["body"]["rows"][0]["columns"][0]["contents"][0];
        assert_eq!(block["type"], "text");
        assert_eq!(block["values"]["fontSize"], "14px");
        assert_eq!(block["values"]["_meta"]["htmlID"], "text_1");
        assert_eq!(block["values"]["selectable"], true);
    }

    #[test]
    fn absent_border_is_omitted_from_json() {
        let values = ColumnValues::default();
        let json = serde_json::to_value(&values).unwrap();
        assert!(json.get("border").is_none());
        assert_eq!(json["verticalAlign"], "middle");
    }
}
