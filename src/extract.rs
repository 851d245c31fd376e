//! Structural element extraction from an HTML fragment.
//!
//! The fragment is parsed into an [`ArenaDom`] and walked in document order.
//! Recognized blocks become [`StructuralElement`]s with their inline markup
//! flattened to plain text:
//!
//! | Tag | Element |
//! |---|---|
//! | `h1`–`h6` | `Heading(level)` |
//! | `p` | `Paragraph` |
//! | `pre` | `CodeBlock` |
//! | `li` | `ListItem` (kind from the nearest `ul`/`ol`) |
//! | `blockquote` | `Blockquote` |
//!
//! `li` and `blockquote` are containers. Their text includes nested
//! paragraphs, but nested list items, quotes, headings and code blocks become
//! elements of their own. A container's text is cut at each such block, and
//! every run of text is emitted as a separate element of the container's
//! kind, so the output follows the source order. List containers produce
//! nothing themselves.
//!
//! Text outside every recognized block is never dropped. It is gathered up to
//! the next block boundary and emitted as `PlainText`; whitespace-only runs are
//! discarded. A fragment that yields no element at all but is not blank
//! (a lone rule, an image without alt text, a comment) becomes one
//! `PlainText` holding whatever content it has.

use crate::dom::{self, ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::model::{ListKind, StructuralElement};

/// Nesting depth past which subtrees are flattened instead of walked.
const MAX_DEPTH: usize = 256;

/// Separator placed between table cells of one row.
const CELL_SEPARATOR: &str = " | ";

/// Stands in for `<hr>` when a fragment has nothing else to show.
const RULE_PLACEHOLDER: &str = "---";

/// Extract structural elements from an HTML fragment, in document order.
///
/// # Example
///
/// ```
/// use mdstyle::{extract_elements, StructuralElement};
///
/// let elements = extract_elements("<h1>Title</h1><p>Hello <b>world</b>.</p>");
/// assert_eq!(
///     elements,
///     vec![
///         StructuralElement::heading(1, "Title"),
///         StructuralElement::paragraph("Hello world."),
///     ]
/// );
/// ```
pub fn extract_elements(html: &str) -> Vec<StructuralElement> {
    let dom = dom::parse_html(html);
    let mut extractor = Extractor {
        dom: &dom,
        out: Vec::new(),
        pending: String::new(),
    };
    extractor.walk_children(dom.document(), 0);
    extractor.flush();
    let mut elements = extractor.out;

    let html = html.trim();
    if elements.is_empty() && !html.is_empty() {
        let leftover = leftover_text(&dom);
        tracing::debug!("no block recognized, keeping leftover content");
        elements.push(StructuralElement::plain_text(if leftover.is_empty() {
            html.to_string()
        } else {
            leftover
        }));
    }

    tracing::debug!(elements = elements.len(), "extracted structural elements");
    elements
}

/// How text below a recognized element is gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// Inline markup flattened, block children separated by newlines.
    Flat,
    /// Text exactly as written (code blocks).
    Raw,
}

/// The element kind a container's text runs are emitted as.
#[derive(Debug, Clone, Copy)]
enum Container {
    Item(ListKind),
    Quote,
}

impl Container {
    fn element(self, text: &str) -> StructuralElement {
        match self {
            Container::Item(list) => StructuralElement::list_item(list, text),
            Container::Quote => StructuralElement::blockquote(text),
        }
    }
}

enum Step {
    Enter(ArenaNodeId),
    Break,
}

struct Extractor<'a> {
    dom: &'a ArenaDom,
    out: Vec<StructuralElement>,
    /// Unclaimed text waiting for the next block boundary.
    pending: String,
}

impl Extractor<'_> {
    fn walk_children(&mut self, id: ArenaNodeId, depth: usize) {
        let children: Vec<_> = self.dom.children(id).collect();
        for child in children {
            self.walk(child, depth + 1);
        }
    }

    fn walk(&mut self, id: ArenaNodeId, depth: usize) {
        let dom = self.dom;
        let Some(node) = dom.get(id) else {
            return;
        };
        let tag = match &node.data {
            ArenaNodeData::Text(text) => {
                self.pending.push_str(text);
                return;
            }
            ArenaNodeData::Element { name, .. } => name.local.as_ref(),
            ArenaNodeData::Document => {
                self.walk_children(id, depth);
                return;
            }
            ArenaNodeData::Comment(_) | ArenaNodeData::Other => return,
        };

        if is_ignored(tag) {
            return;
        }

        if depth > MAX_DEPTH {
            self.flush();
            let text = self.collect_text(id, Capture::Flat);
            self.pending.push_str(&text);
            self.flush();
            return;
        }

        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                let level = tag.as_bytes()[1] - b'0';
                let text = self.collect_text(id, Capture::Flat);
                self.emit(text.trim(), |t| StructuralElement::heading(level, t));
            }
            "p" => {
                self.flush();
                let text = self.collect_text(id, Capture::Flat);
                self.emit(text.trim(), StructuralElement::paragraph);
            }
            "pre" => {
                self.flush();
                let text = self.collect_text(id, Capture::Raw);
                self.emit(text.trim(), StructuralElement::code_block);
            }
            "li" => {
                self.flush();
                let list = self.list_kind(id);
                self.walk_container(id, Container::Item(list), depth);
            }
            "blockquote" => {
                self.flush();
                self.walk_container(id, Container::Quote, depth);
            }
            "br" => self.pending.push('\n'),
            "img" => self.pending.push_str(image_text(dom, id)),
            "td" | "th" => {
                let trimmed = self.pending.trim_end().len();
                if self.pending[..trimmed].trim_start().is_empty() {
                    self.pending.clear();
                } else {
                    self.pending.truncate(trimmed);
                    self.pending.push_str(CELL_SEPARATOR);
                }
                self.walk_children(id, depth);
            }
            _ if is_inline(tag) => self.walk_children(id, depth),
            _ => {
                self.flush();
                self.walk_children(id, depth);
                self.flush();
            }
        }
    }

    /// Walk a list item or quote, cutting its text at every nested block.
    fn walk_container(&mut self, id: ArenaNodeId, container: Container, depth: usize) {
        let dom = self.dom;
        let mut segment = String::new();
        let mut stack: Vec<Step> = dom.children(id).map(Step::Enter).collect();
        stack.reverse();

        while let Some(step) = stack.pop() {
            let child = match step {
                Step::Break => {
                    push_break(&mut segment);
                    continue;
                }
                Step::Enter(child) => child,
            };
            match dom.get(child).map(|n| &n.data) {
                Some(ArenaNodeData::Text(text)) => push_text(&mut segment, text, Capture::Flat),
                Some(ArenaNodeData::Element { name, .. }) => {
                    let tag = name.local.as_ref();
                    if is_separate_block(tag) {
                        self.emit(segment.trim(), |t| container.element(&t));
                        segment.clear();
                        self.walk(child, depth + 1);
                    } else {
                        self.enter(child, tag, Capture::Flat, &mut segment, &mut stack);
                    }
                }
                _ => {}
            }
        }
        self.emit(segment.trim(), |t| container.element(&t));
    }

    fn emit(&mut self, text: &str, make: impl FnOnce(String) -> StructuralElement) {
        if !text.is_empty() {
            self.out.push(make(text.to_string()));
        }
    }

    fn flush(&mut self) {
        let text = self.pending.trim();
        if !text.is_empty() {
            self.out.push(StructuralElement::plain_text(text));
        }
        self.pending.clear();
    }

    fn list_kind(&self, id: ArenaNodeId) -> ListKind {
        self.dom
            .ancestors(id)
            .find_map(|a| match self.dom.element_name(a).map(|n| n.as_ref()) {
                Some("ol") => Some(ListKind::Number),
                Some("ul") | Some("menu") => Some(ListKind::Bullet),
                _ => None,
            })
            .unwrap_or(ListKind::Bullet)
    }

    fn collect_text(&self, root: ArenaNodeId, capture: Capture) -> String {
        let mut out = String::new();
        let mut stack: Vec<Step> = self.dom.children(root).map(Step::Enter).collect();
        stack.reverse();

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Break => {
                    push_break(&mut out);
                    continue;
                }
                Step::Enter(id) => id,
            };
            match self.dom.get(id).map(|n| &n.data) {
                Some(ArenaNodeData::Text(text)) => push_text(&mut out, text, capture),
                Some(ArenaNodeData::Element { name, .. }) => {
                    self.enter(id, name.local.as_ref(), capture, &mut out, &mut stack);
                }
                _ => {}
            }
        }
        out
    }

    /// Write an element's own text to `out`, or queue its children.
    fn enter(
        &self,
        id: ArenaNodeId,
        tag: &str,
        capture: Capture,
        out: &mut String,
        stack: &mut Vec<Step>,
    ) {
        match tag {
            _ if is_ignored(tag) => {}
            "br" => out.push('\n'),
            "img" => out.push_str(image_text(self.dom, id)),
            _ => {
                if capture == Capture::Flat && !is_inline(tag) {
                    push_break(out);
                    stack.push(Step::Break);
                }
                let start = stack.len();
                stack.extend(self.dom.children(id).map(Step::Enter));
                stack[start..].reverse();
            }
        }
    }
}

fn push_text(out: &mut String, text: &str, capture: Capture) {
    // Newlines in the source between blocks or after <br> are layout, not
    // content.
    if capture == Capture::Flat && (out.is_empty() || out.ends_with('\n')) {
        out.push_str(text.trim_start_matches(['\n', '\r']));
    } else {
        out.push_str(text);
    }
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Alt text, or the image source when the alt text is blank.
fn image_text(dom: &ArenaDom, id: ArenaNodeId) -> &str {
    dom.get_attr(id, "alt")
        .filter(|alt| !alt.trim().is_empty())
        .or_else(|| dom.get_attr(id, "src"))
        .unwrap_or_default()
}

/// Everything left in a fragment that produced no element: text the walk
/// skipped, comments, images and rules, one piece per line.
fn leftover_text(dom: &ArenaDom) -> String {
    let mut pieces = Vec::new();
    let mut stack = vec![dom.document()];
    while let Some(id) = stack.pop() {
        let Some(node) = dom.get(id) else {
            continue;
        };
        let piece = match &node.data {
            ArenaNodeData::Text(text) | ArenaNodeData::Comment(text) => text.trim(),
            ArenaNodeData::Element { name, .. } => match name.local.as_ref() {
                "hr" => RULE_PLACEHOLDER,
                "img" => image_text(dom, id).trim(),
                _ => "",
            },
            ArenaNodeData::Document | ArenaNodeData::Other => "",
        };
        if !piece.is_empty() {
            pieces.push(piece);
        }
        let start = stack.len();
        stack.extend(dom.children(id));
        stack[start..].reverse();
    }
    pieces.join("\n")
}

/// Blocks inside a container that become elements of their own.
fn is_separate_block(tag: &str) -> bool {
    matches!(
        tag,
        "li" | "ul" | "ol" | "menu" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

/// Elements whose content is never document text.
fn is_ignored(tag: &str) -> bool {
    matches!(tag, "head" | "script" | "style" | "template")
}

/// Phrasing elements that do not start a new block.
fn is_inline(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "b"
            | "bdi"
            | "bdo"
            | "cite"
            | "code"
            | "data"
            | "del"
            | "dfn"
            | "em"
            | "font"
            | "i"
            | "img"
            | "input"
            | "ins"
            | "kbd"
            | "label"
            | "mark"
            | "q"
            | "s"
            | "samp"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "time"
            | "tt"
            | "u"
            | "var"
            | "wbr"
    )
}
