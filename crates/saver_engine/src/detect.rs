use ego_tree::NodeId;
use saver_logging::saver_debug;

use crate::page::{ElementData, PageDom, PageNode};

/// Exact (trimmed) label of the anchor control we clone. Partial or
/// localized labels are not recognized.
pub const ANCHOR_TEXT: &str = "Like";
/// Label the injected clone carries.
pub const CONTROL_TEXT: &str = "Save";
/// Class marking an injected control, used for idempotency checks.
pub const MARKER_CLASS: &str = "mj-style-saver-btn";

const ICON_PATH: &str =
    "M3 16.5v2.25A2.25 2.25 0 005.25 21h13.5A2.25 2.25 0 0021 18.75V16.5M16.5 12L12 16.5m0 0L7.5 12m4.5 4.5V3";

/// Watches for added page nodes and injects a save control next to each
/// qualifying anchor.
#[derive(Debug, Default)]
pub struct GridDetector;

impl GridDetector {
    pub fn new() -> Self {
        Self
    }

    /// Mutation callback: scans each added node for an anchor and injects
    /// at most one control per anchor. Returns the injected control ids.
    pub fn nodes_added(&self, dom: &mut PageDom, added: &[NodeId]) -> Vec<NodeId> {
        let mut injected = Vec::new();
        for &node in added {
            if dom.element(node).is_none() {
                continue;
            }

            // Check downwards from the new node first, then retry from the
            // nearest button ancestor.
            let anchor = self.find_anchor(dom, node).or_else(|| {
                dom.closest(node, "button")
                    .and_then(|button| self.find_anchor(dom, button))
            });

            let Some(anchor) = anchor else {
                continue;
            };
            if self.already_injected(dom, anchor) {
                continue;
            }
            if let Some(control) = self.inject(dom, anchor) {
                saver_debug!("injected save control next to anchor");
                injected.push(control);
            }
        }
        injected
    }

    /// Finds a button that carries both an svg icon and the exact anchor
    /// label, searching `node` itself and its descendants.
    fn find_anchor(&self, dom: &PageDom, node: NodeId) -> Option<NodeId> {
        let is_button = dom
            .element(node)
            .map(|el| el.name() == "button")
            .unwrap_or(false);
        let candidates = if is_button {
            vec![node]
        } else {
            dom.descendant_elements(node, "button")
        };

        candidates.into_iter().find(|&button| {
            !dom.descendant_elements(button, "svg").is_empty()
                && dom.has_exact_text(button, ANCHOR_TEXT)
        })
    }

    /// True when a marked clone already sits under the anchor's parent.
    fn already_injected(&self, dom: &PageDom, anchor: NodeId) -> bool {
        let Some(parent) = dom.parent(anchor) else {
            return false;
        };
        dom.children(parent).into_iter().any(|sibling| {
            dom.element(sibling)
                .map(|el| el.has_class(MARKER_CLASS))
                .unwrap_or(false)
        })
    }

    /// Clones the anchor, rewrites its label and icon, and attaches the
    /// clone as the anchor's next sibling.
    fn inject(&self, dom: &mut PageDom, anchor: NodeId) -> Option<NodeId> {
        let control = dom.clone_subtree(anchor)?;
        dom.update_element(control, |el| {
            el.add_class(MARKER_CLASS);
            el.remove_attr("id");
        })?;
        dom.replace_text(control, ANCHOR_TEXT, CONTROL_TEXT);
        self.swap_icon(dom, control);

        if dom.insert_after(anchor, control) {
            Some(control)
        } else {
            None
        }
    }

    /// Replaces the first svg under the control with the download icon.
    /// A control without an svg keeps its markup untouched.
    fn swap_icon(&self, dom: &mut PageDom, control: NodeId) {
        let Some(old_icon) = dom.descendant_elements(control, "svg").into_iter().next() else {
            return;
        };
        let icon = download_icon(dom);
        if dom.insert_before(old_icon, icon) {
            dom.detach(old_icon);
        }
    }
}

fn download_icon(dom: &mut PageDom) -> NodeId {
    let svg = dom.orphan_element(ElementData::with_attrs(
        "svg",
        [
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("fill", "none"),
            ("viewBox", "0 0 24 24"),
            ("stroke-width", "2"),
            ("stroke", "currentColor"),
            ("height", "18"),
            ("width", "18"),
            ("class", "inline-block shrink-0"),
        ],
    ));
    dom.append_child(
        svg,
        PageNode::Element(ElementData::with_attrs(
            "path",
            [
                ("stroke-linecap", "round"),
                ("stroke-linejoin", "round"),
                ("d", ICON_PATH),
            ],
        )),
    );
    svg
}
