use ego_tree::{NodeId, Tree};
use scraper::{Html, Node as HtmlNode};

/// One node of the mutable page tree: an element with attributes, or a
/// text node. Comments and doctypes are dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNode {
    Element(ElementData),
    Text(String),
}

impl PageNode {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            PageNode::Element(data) => Some(data),
            PageNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PageNode::Text(text) => Some(text),
            PageNode::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attrs<I, K, V>(name: impl Into<String>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let merged = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }
}

/// Mutable element tree parsed from an HTML snapshot. The root is a
/// synthetic `#document` element; `body` (when present) sits below it in
/// the usual place.
#[derive(Debug, Clone)]
pub struct PageDom {
    tree: Tree<PageNode>,
}

impl PageDom {
    /// Parses an HTML snapshot into a page tree, keeping only elements and
    /// text nodes.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut dom = Self {
            tree: Tree::new(PageNode::Element(ElementData::new("#document"))),
        };
        let root = dom.tree.root().id();

        let mut stack: Vec<(ego_tree::NodeId, NodeId)> = parsed
            .tree
            .root()
            .children()
            .rev()
            .map(|child| (child.id(), root))
            .collect();
        while let Some((src_id, parent)) = stack.pop() {
            let Some(src) = parsed.tree.get(src_id) else {
                continue;
            };
            let value = match src.value() {
                HtmlNode::Element(el) => PageNode::Element(ElementData::with_attrs(
                    el.name(),
                    el.attrs().map(|(k, v)| (k, v)),
                )),
                HtmlNode::Text(text) => PageNode::Text(text.text.to_string()),
                _ => continue,
            };
            let Some(mut parent_mut) = dom.tree.get_mut(parent) else {
                continue;
            };
            let id = parent_mut.append(value).id();
            for child in src.children().rev() {
                stack.push((child.id(), id));
            }
        }
        dom
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&PageNode> {
        self.tree.get(id).map(|node| node.value())
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(PageNode::as_element)
    }

    /// Runs `f` against the element value of `id`, if it is one.
    pub fn update_element<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            PageNode::Element(data) => Some(f(data)),
            PageNode::Text(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|p| p.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|node| node.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Depth-first pre-order walk of the subtree, including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|node| node.descendants().map(|d| d.id()).collect())
            .unwrap_or_default()
    }

    /// Descendant elements (excluding `id` itself) with the given tag name.
    pub fn descendant_elements(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&d| d != id)
            .filter(|&d| self.element(d).map(|el| el.name() == tag).unwrap_or(false))
            .collect()
    }

    /// Nearest ancestor-or-self element with the given tag name.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        if self.element(id).map(|el| el.name() == tag).unwrap_or(false) {
            return Some(id);
        }
        let node = self.tree.get(id)?;
        node.ancestors()
            .find(|a| {
                a.value()
                    .as_element()
                    .map(|el| el.name() == tag)
                    .unwrap_or(false)
            })
            .map(|a| a.id())
    }

    /// True when any text node under `id` equals `text` after trimming.
    pub fn has_exact_text(&self, id: NodeId, text: &str) -> bool {
        self.descendants(id).into_iter().any(|d| {
            self.node(d)
                .and_then(PageNode::as_text)
                .map(|t| t.trim() == text)
                .unwrap_or(false)
        })
    }

    /// Replaces the first occurrence of `find` in the first text node that
    /// contains it. Returns whether a replacement happened.
    pub fn replace_text(&mut self, id: NodeId, find: &str, replace: &str) -> bool {
        for d in self.descendants(id) {
            let contains = self
                .node(d)
                .and_then(PageNode::as_text)
                .map(|t| t.contains(find))
                .unwrap_or(false);
            if !contains {
                continue;
            }
            if let Some(mut node) = self.tree.get_mut(d) {
                if let PageNode::Text(text) = node.value() {
                    *text = text.replacen(find, replace, 1);
                    return true;
                }
            }
        }
        false
    }

    /// Deep-copies the subtree rooted at `src` into a detached node and
    /// returns the copy's root.
    pub fn clone_subtree(&mut self, src: NodeId) -> Option<NodeId> {
        let mut clone_root = None;
        let mut stack = vec![(src, None::<NodeId>)];
        while let Some((src_id, clone_parent)) = stack.pop() {
            let value = self.tree.get(src_id)?.value().clone();
            let clone_id = match clone_parent {
                None => self.tree.orphan(value).id(),
                Some(parent) => self.tree.get_mut(parent)?.append(value).id(),
            };
            if clone_parent.is_none() {
                clone_root = Some(clone_id);
            }
            let children: Vec<NodeId> =
                self.tree.get(src_id)?.children().map(|c| c.id()).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(clone_id)));
            }
        }
        clone_root
    }

    /// Creates a detached element node.
    pub fn orphan_element(&mut self, data: ElementData) -> NodeId {
        self.tree.orphan(PageNode::Element(data)).id()
    }

    pub fn append_child(&mut self, parent: NodeId, value: PageNode) -> Option<NodeId> {
        Some(self.tree.get_mut(parent)?.append(value).id())
    }

    /// Attaches `new_root` (a detached subtree) as the next sibling of
    /// `anchor`. Returns false when either node is missing.
    pub fn insert_after(&mut self, anchor: NodeId, new_root: NodeId) -> bool {
        if self.tree.get(new_root).is_none() {
            return false;
        }
        match self.tree.get_mut(anchor) {
            Some(mut node) => {
                node.insert_id_after(new_root);
                true
            }
            None => false,
        }
    }

    /// Attaches `new_root` (a detached subtree) as the previous sibling of
    /// `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, new_root: NodeId) -> bool {
        if self.tree.get(new_root).is_none() {
            return false;
        }
        match self.tree.get_mut(anchor) {
            Some(mut node) => {
                node.insert_id_before(new_root);
                true
            }
            None => false,
        }
    }

    /// Detaches the subtree rooted at `id` from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
    }

    /// `src` attributes of `img` descendants whose value contains
    /// `pattern`, in document order, duplicates included.
    pub fn img_srcs(&self, root: NodeId, pattern: &str) -> Vec<String> {
        self.descendant_elements(root, "img")
            .into_iter()
            .filter_map(|id| self.element(id).and_then(|el| el.attr("src")))
            .filter(|src| src.contains(pattern))
            .map(str::to_string)
            .collect()
    }
}
