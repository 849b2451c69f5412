//! Content classification: turning a column's subtree into content blocks.

use crate::document::{
    BlockFlags, ButtonColors, ButtonValues, ContentBlock, ImageSource, ImageValues, LinkAction,
    Meta, TextValues, html_id,
};
use crate::dom::{Dom, NodeId, inner_html};
use crate::style::{clamp_font_size, color_or_accent, effective_style, normalize_color, prop_or};

use super::Builder;

/// Tags that may become (or contain) content blocks.
const CANDIDATE_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "img", "button", "a", "td", "th", "span", "div",
];

/// Text heuristically identifying email-client utility links with no
/// authoring value; anchors carrying it are dropped outright.
const VIEW_IN_BROWSER: &str = "view in browser";

/// Walk the column subtree and classify candidates into blocks, in
/// traversal (visual top-to-bottom) order.
pub(super) fn collect_blocks(b: &mut Builder<'_, '_>, column_root: NodeId) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    walk(b, column_root, &mut blocks);
    blocks
}

fn walk(b: &mut Builder<'_, '_>, node: NodeId, out: &mut Vec<ContentBlock>) {
    if !b.dom.is_element(node) {
        return;
    }

    if is_candidate(b.dom, node) {
        match classify(b, node) {
            Outcome::Block(block) => {
                // The block owns this subtree; descending further would
                // classify the same content twice.
                out.push(block);
                return;
            }
            Outcome::Consumed => return,
            Outcome::Descend => {}
        }
    }

    let children: Vec<_> = b.dom.children(node).collect();
    for child in children {
        walk(b, child, out);
    }
}

fn is_candidate(dom: &Dom, id: NodeId) -> bool {
    dom.tag_name(id)
        .is_some_and(|tag| CANDIDATE_TAGS.contains(&tag.as_ref()))
}

enum Outcome {
    /// Candidate became a block; its subtree is spoken for.
    Block(ContentBlock),
    /// Candidate (and its subtree) dropped silently.
    Consumed,
    /// No block here; keep walking into children.
    Descend,
}

fn classify(b: &mut Builder<'_, '_>, id: NodeId) -> Outcome {
    let dom = b.dom;
    let tag = match dom.tag_name(id) {
        Some(tag) => tag.as_ref().to_string(),
        None => return Outcome::Descend,
    };

    match tag.as_str() {
        "img" => Outcome::Block(build_image(b, id, None)),
        "a" | "button" => {
            if let Some(img) = find_descendant_img(dom, id) {
                // An anchor wrapping an image is a linked image, never a button.
                return Outcome::Block(build_image(b, img, Some(id)));
            }
            let text = dom.text_content(id);
            if text.trim().to_lowercase().contains(VIEW_IN_BROWSER) {
                return Outcome::Consumed;
            }
            Outcome::Block(build_button(b, id, &text))
        }
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "span" | "div" => {
            if dom.text_content(id).trim().is_empty() {
                Outcome::Descend
            } else {
                Outcome::Block(build_text(b, id))
            }
        }
        // Cells and the rest carry no content of their own.
        _ => Outcome::Descend,
    }
}

fn find_descendant_img(dom: &Dom, id: NodeId) -> Option<NodeId> {
    dom.descendants(id).find(|&d| dom.is_tag(d, "img"))
}

fn build_text(b: &mut Builder<'_, '_>, id: NodeId) -> ContentBlock {
    let style = effective_style(b.dom, id, b.index);
    let text = format!("<p>{}</p>", inner_html(b.dom, id).trim());

    b.counters.text += 1;
    ContentBlock::Text {
        id: b.ids.next_id(),
        values: TextValues {
            container_padding: prop_or(&style, "padding", "10px 20px").to_string(),
            font_size: clamp_font_size(prop_or(&style, "font-size", "14px")),
            line_height: prop_or(&style, "line-height", "1.4").to_string(),
            text_align: prop_or(&style, "text-align", "center").to_string(),
            color: prop_or(&style, "color", "#000000").to_string(),
            font_family: prop_or(&style, "font-family", "'Cabin', sans-serif").to_string(),
            font_weight: prop_or(&style, "font-weight", "normal").to_string(),
            text,
            flags: BlockFlags::default(),
            meta: Meta {
                html_id: html_id("text", b.counters.text),
                ..Meta::default()
            },
        },
    }
}

fn build_image(b: &mut Builder<'_, '_>, img: NodeId, link: Option<NodeId>) -> ContentBlock {
    let dom = b.dom;
    let action = link
        .map(|a| {
            LinkAction::web(
                dom.attr(a, "href").unwrap_or_default().to_string(),
                dom.attr(a, "target").unwrap_or_default().to_string(),
            )
        })
        .unwrap_or_default();

    b.counters.image += 1;
    ContentBlock::Image {
        id: b.ids.next_id(),
        values: ImageValues {
            container_padding: "10px".to_string(),
            src: ImageSource {
                url: dom.attr(img, "src").unwrap_or_default().to_string(),
                width: pixel_dimension(dom.attr(img, "width"), "100px"),
                height: pixel_dimension(dom.attr(img, "height"), "auto"),
                max_width: "100%".to_string(),
                auto_width: true,
            },
            alt_text: dom
                .attr(img, "alt")
                .filter(|alt| !alt.is_empty())
                .unwrap_or("Image")
                .to_string(),
            action,
            text_align: "center".to_string(),
            border_radius: "0px".to_string(),
            flags: BlockFlags::default(),
            meta: Meta {
                html_id: html_id("image", b.counters.image),
                ..Meta::default()
            },
        },
    }
}

/// Attribute dimensions are bare numbers in legacy markup; give them units.
fn pixel_dimension(attr: Option<&str>, default: &str) -> String {
    match attr.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) if value.bytes().all(|b| b.is_ascii_digit()) => format!("{value}px"),
        Some(value) => value.to_string(),
        None => default.to_string(),
    }
}

fn build_button(b: &mut Builder<'_, '_>, id: NodeId, text: &str) -> ContentBlock {
    let dom = b.dom;
    let style = effective_style(dom, id, b.index);

    let background = color_or_accent(prop_or(&style, "background-color", ""));
    let color = {
        let resolved = normalize_color(prop_or(&style, "color", ""));
        if resolved.is_empty() {
            "#ffffff".to_string()
        } else {
            resolved
        }
    };

    b.counters.button += 1;
    ContentBlock::Button {
        id: b.ids.next_id(),
        values: ButtonValues {
            container_padding: "10px".to_string(),
            href: LinkAction::web(
                dom.attr(id, "href").unwrap_or_default().to_string(),
                dom.attr(id, "target").unwrap_or_default().to_string(),
            ),
            button_colors: ButtonColors::new(color, background),
            font_size: prop_or(&style, "font-size", "14px").to_string(),
            padding: prop_or(&style, "padding", "10px 20px").to_string(),
            text_align: prop_or(&style, "text-align", "center").to_string(),
            border_radius: prop_or(&style, "border-radius", "4px").to_string(),
            text: format!("<span>{}</span>", text.trim()),
            flags: BlockFlags::default(),
            meta: Meta {
                html_id: html_id("button", b.counters.button),
                ..Meta::default()
            },
        },
    }
}
