//! HTML parsing into an arena DOM.

mod arena;
mod serialize;
mod sink;

pub use arena::{Attr, Dom, NodeData, NodeId};
pub use serialize::inner_html;
pub use sink::{DomSink, Handle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document (or body fragment) into a [`Dom`].
///
/// html5ever recovers from malformed markup the way a browser does, so this
/// accepts essentially anything and synthesizes the html/head/body skeleton
/// around fragments.
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
