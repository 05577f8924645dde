use std::collections::HashMap;

use crate::dom::NodeId;

/// Vertical placement of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutBox {
    pub top: i64,
    pub height: i64,
}

impl LayoutBox {
    pub fn new(top: i64, height: i64) -> Self {
        Self {
            top,
            height: height.max(0),
        }
    }
}

/// Window scroll state plus the layout the embedder reported. Elements with
/// no reported layout sit at the top of the document with zero height.
#[derive(Debug, Clone)]
pub(crate) struct Viewport {
    scroll_y: i64,
    height: i64,
    layouts: HashMap<NodeId, LayoutBox>,
}

impl Viewport {
    pub(crate) fn new(height: i64) -> Self {
        Self {
            scroll_y: 0,
            height: height.max(0),
            layouts: HashMap::new(),
        }
    }

    pub(crate) fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    pub(crate) fn set_scroll_y(&mut self, offset: i64) {
        self.scroll_y = offset.max(0);
    }

    pub(crate) fn set_height(&mut self, height: i64) {
        self.height = height.max(0);
    }

    pub(crate) fn set_layout(&mut self, node: NodeId, layout: LayoutBox) {
        self.layouts.insert(node, layout);
    }

    pub(crate) fn layout(&self, node: NodeId) -> LayoutBox {
        self.layouts.get(&node).copied().unwrap_or_default()
    }

    /// Edge-adjacent boxes count as intersecting, zero-area ones included.
    pub(crate) fn intersects(&self, node: NodeId, root_margin: i64) -> bool {
        let layout = self.layout(node);
        let top = self.scroll_y - root_margin;
        let bottom = self.scroll_y + self.height + root_margin;
        layout.top <= bottom && layout.top + layout.height >= top
    }
}

/// Observes a set of targets and reports the ones that entered the viewport.
#[derive(Debug, Clone, Default)]
pub(crate) struct IntersectionObserver {
    targets: Vec<NodeId>,
    root_margin: i64,
}

impl IntersectionObserver {
    pub(crate) fn new(root_margin: i64) -> Self {
        Self {
            targets: Vec::new(),
            root_margin,
        }
    }

    pub(crate) fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.targets.push(target);
        }
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|node| *node != target);
    }

    pub(crate) fn is_observing(&self, target: NodeId) -> bool {
        self.targets.contains(&target)
    }

    pub(crate) fn observed(&self) -> &[NodeId] {
        &self.targets
    }

    /// Targets currently intersecting, in observation order.
    pub(crate) fn intersecting(&self, viewport: &Viewport) -> Vec<NodeId> {
        self.targets
            .iter()
            .copied()
            .filter(|target| viewport.intersects(*target, self.root_margin))
            .collect()
    }
}
