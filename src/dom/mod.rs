//! HTML parsing into an arena DOM.

mod arena;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter};
pub use tree_sink::ArenaSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

/// Parse an HTML document or fragment.
///
/// Fragments are wrapped in synthesized `html`/`head`/`body` elements by the
/// tree builder, so callers can always start their walk at `<body>`.
/// Scripting is off, so `<noscript>` content is parsed as ordinary markup.
pub fn parse_html(html: &str) -> ArenaDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(ArenaSink::new(), opts)
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
