//! Arena-backed document tree.

/// Handle to a node inside a [`Document`].
///
/// Ids are only meaningful for the document that created them. Detached nodes
/// keep their id; they are simply no longer reachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element tag with ordered attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// Create an element with no attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_owned(), value));
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root, always node 0.
    Root,
    /// `<!DOCTYPE ...>` declaration content.
    Doctype(String),
    /// Element node.
    Element(Element),
    /// Text node (already unescaped).
    Text(String),
    /// Comment body.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// HTML document as an arena of nodes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    /// Create a detached doctype node.
    pub fn create_doctype(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Doctype(content.into()))
    }

    /// Node payload.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Element payload, if `id` is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload, if `id` is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable text payload, if `id` is a text node.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.nodes[id.0].data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether `id` is an element with the given tag (ASCII case-insensitive).
    #[must_use]
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|el| el.is(tag))
    }

    /// Parent of `id`, `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Parent of `id` if it is an element (not the root).
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.element(p).is_some())
    }

    /// Ordered children of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Remove `id` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` as the first child of `parent`, detaching it first.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    /// Put `new` at the position of `old` and detach `old`.
    ///
    /// Returns `false` when `old` has no parent; nothing changes in that case.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        self.detach(new);
        let siblings = &mut self.nodes[parent.0].children;
        let Some(pos) = siblings.iter().position(|&c| c == old) else {
            return false;
        };
        siblings[pos] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        true
    }

    /// Attribute value of an element.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Set an attribute on an element. No-op for non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    /// Whether an element carries `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add `class` to an element's class list if missing.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if el.has_class(class) {
            return;
        }
        let joined = match el.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        el.set_attr("class", joined);
    }

    /// Remove `class` from an element's class list.
    ///
    /// The `class` attribute is dropped when the list becomes empty.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if !el.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = el.classes().filter(|&c| c != class).collect();
        if remaining.is_empty() {
            el.remove_attr("class");
        } else {
            let joined = remaining.join(" ");
            el.set_attr("class", joined);
        }
    }

    /// Concatenated text of `id` and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out, false);
        out
    }

    /// Text as a reader sees it inside preformatted content.
    ///
    /// Whitespace is kept verbatim and `<br>` becomes a newline. Comments
    /// contribute nothing.
    #[must_use]
    pub fn rendered_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out, true);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String, rendered: bool) {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) if rendered && el.is("br") => out.push('\n'),
            NodeData::Element(_) | NodeData::Root => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out, rendered);
                }
            }
            NodeData::Doctype(_) | NodeData::Comment(_) => {}
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
        let text = text.into();
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Elements with `tag`, in document order.
    #[must_use]
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.is_element(id, tag))
            .collect()
    }

    /// Elements matching the `parent > child` selector, in document order.
    #[must_use]
    pub fn select_children(&self, parent_tag: &str, child_tag: &str) -> Vec<NodeId> {
        self.elements_by_tag(child_tag)
            .into_iter()
            .filter(|&id| {
                self.parent(id)
                    .is_some_and(|parent| self.is_element(parent, parent_tag))
            })
            .collect()
    }

    /// Element with the given `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&id| self.attr(id, "id") == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre_code(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
        let pre = doc.create_element("pre");
        let code = doc.create_element("code");
        let text = doc.create_text(text);
        doc.append_child(code, text);
        doc.append_child(pre, code);
        let root = doc.root();
        doc.append_child(root, pre);
        (pre, code)
    }

    #[test]
    fn test_append_and_prepend_order() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(div, a);
        doc.prepend_child(div, b);

        assert_eq!(doc.children(div), &[b, a]);
        assert_eq!(doc.parent(a), Some(div));
        assert_eq!(doc.first_child(div), Some(b));
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut doc = Document::new();
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(first, span);
        doc.append_child(second, span);

        assert!(doc.children(first).is_empty());
        assert_eq!(doc.children(second), &[span]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = Document::new();
        let root = doc.root();
        let p1 = doc.create_element("p");
        let (pre, _) = pre_code(&mut doc, "x");
        let p2 = doc.create_element("p");
        doc.prepend_child(root, p1);
        doc.append_child(root, p2);

        let div = doc.create_element("div");
        assert!(doc.replace(pre, div));

        assert_eq!(doc.children(root), &[p1, div, p2]);
        assert_eq!(doc.parent(pre), None);
        assert_eq!(doc.parent(div), Some(root));
    }

    #[test]
    fn test_replace_detached_is_noop() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        assert!(!doc.replace(a, b));
    }

    #[test]
    fn test_class_manipulation() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.add_class(button, "copy-button");
        doc.add_class(button, "copied");
        doc.add_class(button, "copied");
        assert_eq!(doc.attr(button, "class"), Some("copy-button copied"));

        doc.remove_class(button, "copied");
        assert_eq!(doc.attr(button, "class"), Some("copy-button"));
        assert!(!doc.has_class(button, "copied"));

        doc.remove_class(button, "copy-button");
        assert_eq!(doc.attr(button, "class"), None);
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = Element::new("pre");
        el.set_attr("data-enhanced", "false");
        el.set_attr("class", "x");
        el.set_attr("data-enhanced", "true");
        assert_eq!(
            el.attrs,
            vec![
                ("data-enhanced".to_owned(), "true".to_owned()),
                ("class".to_owned(), "x".to_owned()),
            ]
        );
    }

    #[test]
    fn test_rendered_text_keeps_whitespace_and_breaks() {
        let mut doc = Document::new();
        let (_, code) = pre_code(&mut doc, "  a\n\tb");
        let br = doc.create_element("br");
        doc.append_child(code, br);
        let tail = doc.create_text("c ");
        doc.append_child(code, tail);

        assert_eq!(doc.rendered_text(code), "  a\n\tb\nc ");
        assert_eq!(doc.text_content(code), "  a\n\tbc ");
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.set_text_content(button, "Copy");
        doc.set_text_content(button, "Copied");
        assert_eq!(doc.children(button).len(), 1);
        assert_eq!(doc.text_content(button), "Copied");
    }

    #[test]
    fn test_select_children_document_order() {
        let mut doc = Document::new();
        let (_, first) = pre_code(&mut doc, "1");
        let root = doc.root();
        let loose = doc.create_element("code");
        doc.append_child(root, loose);
        let (_, second) = pre_code(&mut doc, "2");

        assert_eq!(doc.select_children("pre", "code"), vec![first, second]);
        assert_eq!(doc.elements_by_tag("code"), vec![first, loose, second]);
    }

    #[test]
    fn test_element_by_id() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div");
        doc.set_attr(div, "id", "target");
        doc.append_child(root, div);

        assert_eq!(doc.element_by_id("target"), Some(div));
        assert_eq!(doc.element_by_id("missing"), None);
    }
}
