//! Arena-allocated DOM for parsed HTML fragments.
//!
//! html5ever parses into this tree through [`ArenaSink`](super::ArenaSink).
//! Nodes live in one vector and refer to each other by index, which keeps the
//! extractor's pre-order walk cheap and borrow-friendly.

use html5ever::{LocalName, QualName};

/// Index of a node in its [`ArenaDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(u32);

impl ArenaNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    /// Doctypes and processing instructions. Kept so the tree builder has a
    /// handle to attach, never read.
    Other,
}

/// Element attribute with its value decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// One node and its tree links.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: Option<ArenaNodeId>,
    pub first_child: Option<ArenaNodeId>,
    pub last_child: Option<ArenaNodeId>,
    pub prev_sibling: Option<ArenaNodeId>,
    pub next_sibling: Option<ArenaNodeId>,
}

impl From<ArenaNodeData> for ArenaNode {
    fn from(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Tree of nodes rooted at a document node. Nodes are never freed; a
/// detached node simply has no parent.
#[derive(Debug)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    const ROOT: ArenaNodeId = ArenaNodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::from(ArenaNodeData::Document)],
        }
    }

    pub fn document(&self) -> ArenaNodeId {
        Self::ROOT
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but its document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn push(&mut self, data: ArenaNodeData) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode::from(data));
        id
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.push(ArenaNodeData::Element { name, attrs })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> ArenaNodeId {
        self.push(ArenaNodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> ArenaNodeId {
        self.push(ArenaNodeData::Comment(text.into()))
    }

    pub fn create_other(&mut self) -> ArenaNodeId {
        self.push(ArenaNodeData::Other)
    }

    fn parent_of(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Make `child` the last child of `parent`. `child` must be detached.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let Some(last) = self.get(parent).map(|n| n.last_child) else {
            return;
        };
        self.link(parent, last, child, None);
    }

    /// Place `node` right before `sibling`, under the same parent.
    /// `node` must be detached.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, node: ArenaNodeId) {
        let Some((Some(parent), prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling))
        else {
            return;
        };
        self.link(parent, prev, node, Some(sibling));
    }

    /// Splice `node` between `prev` and `next` under `parent`.
    fn link(
        &mut self,
        parent: ArenaNodeId,
        prev: Option<ArenaNodeId>,
        node: ArenaNodeId,
        next: Option<ArenaNodeId>,
    ) {
        if let Some(n) = self.get_mut(node) {
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = next;
        }
        match prev.and_then(|p| self.get_mut(p)) {
            Some(p) => p.next_sibling = Some(node),
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = Some(node);
                }
            }
        }
        match next.and_then(|n| self.get_mut(n)) {
            Some(n) => n.prev_sibling = Some(node),
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = Some(node);
                }
            }
        }
    }

    /// Append text under `parent`; adjacent text is merged into one node.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last = self.get(parent).and_then(|n| n.last_child);
        if let Some(ArenaNode {
            data: ArenaNodeData::Text(existing),
            ..
        }) = last.and_then(|id| self.get_mut(id))
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text);
        self.append(parent, node);
    }

    /// Remove `node` from its parent. Its own children stay attached to it.
    pub fn detach(&mut self, node: ArenaNodeId) {
        let Some((parent, prev, next)) = self
            .get(node)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };
        let Some(parent) = parent else {
            return;
        };

        match prev.and_then(|p| self.get_mut(p)) {
            Some(p) => p.next_sibling = next,
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        match next.and_then(|n| self.get_mut(n)) {
            Some(n) => n.prev_sibling = prev,
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = prev;
                }
            }
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        }
    }

    /// Children of `id`, first to last.
    pub fn children(&self, id: ArenaNodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            dom: self,
            next: self.get(id).and_then(|n| n.first_child),
        }
    }

    /// Ancestors of `id`, nearest first, up to and including the document.
    pub fn ancestors(&self, id: ArenaNodeId) -> impl Iterator<Item = ArenaNodeId> + '_ {
        std::iter::successors(self.parent_of(id), move |&p| self.parent_of(p))
    }

    /// First element named `tag` in document order.
    #[cfg(test)]
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        let mut stack = vec![self.document()];
        while let Some(id) = stack.pop() {
            if self.element_name(id).is_some_and(|n| n.as_ref() == tag) {
                return Some(id);
            }
            let before = stack.len();
            stack.extend(self.children(id));
            stack[before..].reverse();
        }
        None
    }

    /// Tag name of an element node.
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        }
    }

    /// Value of the attribute with local name `attr`.
    pub fn get_attr(&self, id: ArenaNodeId, attr: &str) -> Option<&str> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Content of a text node.
    #[cfg(test)]
    pub fn text(&self, id: ArenaNodeId) -> Option<&str> {
        match &self.get(id)?.data {
            ArenaNodeData::Text(text) => Some(text),
            _ => None,
        }
    }
}

pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    next: Option<ArenaNodeId>,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<ArenaNodeId> {
        let id = self.next?;
        self.next = self.dom.get(id).and_then(|n| n.next_sibling);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn element(dom: &mut ArenaDom, tag: &str) -> ArenaNodeId {
        dom.create_element(QualName::new(None, ns!(html), LocalName::from(tag)), vec![])
    }

    #[test]
    fn test_append_keeps_order() {
        let mut dom = ArenaDom::new();
        let ul = element(&mut dom, "ul");
        let first = element(&mut dom, "li");
        let second = element(&mut dom, "li");
        dom.append(dom.document(), ul);
        dom.append(ul, first);
        dom.append(ul, second);

        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(dom.find_by_tag("li"), Some(first));
        assert!(!dom.is_empty());
    }

    #[test]
    fn test_adjacent_text_merges() {
        let mut dom = ArenaDom::new();
        let p = element(&mut dom, "p");
        dom.append(dom.document(), p);
        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_insert_before_first_and_middle() {
        let mut dom = ArenaDom::new();
        let ol = element(&mut dom, "ol");
        let a = element(&mut dom, "li");
        let b = element(&mut dom, "li");
        let c = element(&mut dom, "li");
        dom.append(dom.document(), ol);
        dom.append(ol, c);
        dom.insert_before(c, a);
        dom.insert_before(c, b);

        assert_eq!(dom.children(ol).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(dom.get(ol).and_then(|n| n.first_child), Some(a));
        assert_eq!(dom.get(ol).and_then(|n| n.last_child), Some(c));
    }

    #[test]
    fn test_detach() {
        let mut dom = ArenaDom::new();
        let ol = element(&mut dom, "ol");
        let a = element(&mut dom, "li");
        let b = element(&mut dom, "li");
        dom.append(dom.document(), ol);
        dom.append(ol, a);
        dom.append(ol, b);

        dom.detach(a);
        assert_eq!(dom.children(ol).collect::<Vec<_>>(), vec![b]);
        assert!(dom.get(a).is_some_and(|n| n.parent.is_none()));

        dom.detach(b);
        assert_eq!(dom.children(ol).count(), 0);
        assert_eq!(dom.get(ol).and_then(|n| n.last_child), None);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut dom = ArenaDom::new();
        let ul = element(&mut dom, "ul");
        let li = element(&mut dom, "li");
        dom.append(dom.document(), ul);
        dom.append(ul, li);

        assert_eq!(dom.ancestors(li).collect::<Vec<_>>(), vec![ul, dom.document()]);
        assert_eq!(dom.ancestors(dom.document()).count(), 0);
    }
}
