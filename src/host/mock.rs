//! Scripted host used by the unit tests.
//!
//! Mirrors the browser primitives closely enough to exercise the engine:
//! structural records queue one per mutation and survive a disconnect until
//! they are taken,
//! size watchers deliver one batch covering every observed node (including
//! an initial batch right after `observe`), load listeners fire once, and
//! frames are delivered after every other queued notification.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::Positioning;
use crate::geometry::Size;
use crate::pack::StripPacker;
use crate::runtime::LayoutInstance;
use crate::style::PositionDirective;

use super::{BoxSizing, Host, HostEvent, ResizeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MockNode(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Element,
    Text,
    Image { complete: bool },
}

#[derive(Debug, Clone, Copy)]
struct NodeState {
    kind: NodeKind,
    size: Size,
}

#[derive(Debug, Default)]
pub struct MockHost {
    next_id: u32,
    nodes: HashMap<MockNode, NodeState>,
    children: Vec<MockNode>,
    container_width: f64,
    container_height: Option<f64>,
    transforms: HashMap<MockNode, PositionDirective>,
    insets: HashMap<MockNode, PositionDirective>,
    observing_children: bool,
    records: VecDeque<(Vec<MockNode>, Vec<MockNode>)>,
    observed: Vec<MockNode>,
    size_batch_pending: bool,
    observing_container: bool,
    container_batch_pending: bool,
    load_listeners: HashSet<MockNode>,
    loaded: VecDeque<MockNode>,
    frame_requested: bool,
    frame_requests: usize,
    position_writes: usize,
}

impl MockHost {
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    fn create(&mut self, kind: NodeKind, size: Size) -> MockNode {
        let node = MockNode(self.next_id);
        self.next_id += 1;
        self.nodes.insert(node, NodeState { kind, size });
        node
    }

    pub fn create_element(&mut self, size: Size) -> MockNode {
        self.create(NodeKind::Element, size)
    }

    fn record(&mut self, added: Vec<MockNode>, removed: Vec<MockNode>) {
        if self.observing_children {
            self.records.push_back((added, removed));
        }
    }

    fn insert_at(&mut self, index: usize, node: MockNode) -> MockNode {
        self.children.insert(index, node);
        self.record(vec![node], Vec::new());
        node
    }

    pub fn append_element(&mut self, size: Size) -> MockNode {
        let node = self.create(NodeKind::Element, size);
        self.insert_at(self.children.len(), node)
    }

    pub fn prepend_element(&mut self, size: Size) -> MockNode {
        let node = self.create(NodeKind::Element, size);
        self.insert_at(0, node)
    }

    pub fn append_text(&mut self) -> MockNode {
        let node = self.create(NodeKind::Text, Size::default());
        self.insert_at(self.children.len(), node)
    }

    pub fn append_image(&mut self, size: Size, complete: bool) -> MockNode {
        let node = self.create(NodeKind::Image { complete }, size);
        self.insert_at(self.children.len(), node)
    }

    pub fn remove_child(&mut self, node: MockNode) {
        let before = self.children.len();
        self.children.retain(|child| *child != node);
        if self.children.len() != before {
            self.record(Vec::new(), vec![node]);
        }
    }

    /// Swap the whole child list in one mutation.
    pub fn replace_children(&mut self, children: Vec<MockNode>) {
        let removed: Vec<_> = self
            .children
            .iter()
            .filter(|child| !children.contains(child))
            .copied()
            .collect();
        let added: Vec<_> = children
            .iter()
            .filter(|child| !self.children.contains(child))
            .copied()
            .collect();
        self.children = children;
        self.record(added, removed);
    }

    pub fn resize_child(&mut self, node: MockNode, size: Size) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.size = size;
        }
        if self.observed.contains(&node) {
            self.size_batch_pending = true;
        }
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
        if self.observing_container {
            self.container_batch_pending = true;
        }
    }

    /// Finish loading an image: its box takes `size` and any listener fires once.
    pub fn complete_image(&mut self, node: MockNode, size: Size) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.kind = NodeKind::Image { complete: true };
            state.size = size;
        }
        if self.load_listeners.remove(&node) {
            self.loaded.push_back(node);
        }
    }

    /// Next notification in delivery order, if any is queued.
    pub fn next_event(&mut self) -> Option<HostEvent<MockNode>> {
        if let Some((added, removed)) = self.records.pop_front() {
            return Some(HostEvent::ChildrenMutated { added, removed });
        }
        if let Some(node) = self.loaded.pop_front() {
            return Some(HostEvent::AssetLoaded(node));
        }
        if self.container_batch_pending {
            self.container_batch_pending = false;
            return Some(HostEvent::ContainerResized {
                width: self.container_width,
            });
        }
        if self.size_batch_pending {
            self.size_batch_pending = false;
            let entries = self
                .observed
                .iter()
                .filter_map(|node| {
                    self.nodes
                        .get(node)
                        .map(|state| ResizeEntry::new(*node, state.size))
                })
                .collect();
            return Some(HostEvent::ChildrenResized(entries));
        }
        if self.frame_requested {
            self.frame_requested = false;
            return Some(HostEvent::Frame);
        }
        None
    }

    pub fn transform_of(&self, node: MockNode) -> Option<PositionDirective> {
        self.transforms.get(&node).copied()
    }

    pub fn inset_of(&self, node: MockNode) -> Option<PositionDirective> {
        self.insets.get(&node).copied()
    }

    pub fn container_height(&self) -> Option<f64> {
        self.container_height
    }

    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    pub fn position_writes(&self) -> usize {
        self.position_writes
    }

    pub fn is_observing_children(&self) -> bool {
        self.observing_children
    }

    pub fn observed_sizes(&self) -> &[MockNode] {
        &self.observed
    }

    pub fn is_observing_container(&self) -> bool {
        self.observing_container
    }

    pub fn load_listener_count(&self) -> usize {
        self.load_listeners.len()
    }

    pub fn has_load_listener(&self, node: MockNode) -> bool {
        self.load_listeners.contains(&node)
    }
}

impl Host for MockHost {
    type Node = MockNode;

    fn children(&self) -> Vec<MockNode> {
        self.children.clone()
    }

    fn is_positionable(&self, node: &MockNode) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|state| state.kind != NodeKind::Text)
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn loading_assets(&self) -> Vec<MockNode> {
        self.children
            .iter()
            .filter(|node| {
                matches!(
                    self.nodes.get(*node).map(|state| state.kind),
                    Some(NodeKind::Image { complete: false })
                )
            })
            .copied()
            .collect()
    }

    fn observe_children(&mut self) {
        self.observing_children = true;
    }

    fn take_mutation_records(&mut self) -> usize {
        let taken = self.records.len();
        self.records.clear();
        taken
    }

    /// Records queued before the disconnect stay deliverable until taken.
    fn disconnect_children(&mut self) {
        self.observing_children = false;
    }

    fn observe_child_size(&mut self, node: &MockNode, sizing: BoxSizing) {
        assert_eq!(sizing, BoxSizing::BorderBox, "children are measured by border box");
        if !self.observed.contains(node) {
            self.observed.push(*node);
        }
        self.size_batch_pending = true;
    }

    fn disconnect_child_sizes(&mut self) {
        self.observed.clear();
        self.size_batch_pending = false;
    }

    fn observe_container_size(&mut self, sizing: BoxSizing) {
        assert_eq!(sizing, BoxSizing::ContentBox, "the container is measured by content box");
        self.observing_container = true;
        self.container_batch_pending = true;
    }

    fn disconnect_container_size(&mut self) {
        self.observing_container = false;
        self.container_batch_pending = false;
    }

    fn listen_for_load(&mut self, asset: &MockNode) {
        self.load_listeners.insert(*asset);
    }

    fn unlisten_for_load(&mut self, asset: &MockNode) {
        self.load_listeners.remove(asset);
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
        self.frame_requests += 1;
    }

    fn write_position(&mut self, node: &MockNode, directive: &PositionDirective) {
        self.position_writes += 1;
        match directive.positioning() {
            Positioning::Transform => self.transforms.insert(*node, *directive),
            Positioning::Offset => self.insets.insert(*node, *directive),
        };
    }

    fn clear_position(&mut self, node: &MockNode, positioning: Positioning) {
        match positioning {
            Positioning::Transform => self.transforms.remove(node),
            Positioning::Offset => self.insets.remove(node),
        };
    }

    fn set_container_height(&mut self, height: Option<f64>) {
        self.container_height = height;
    }
}

/// Deliver queued notifications until the host goes quiet. Panics when the
/// engine keeps generating work, which would be an observer feedback loop.
pub fn settle<P: StripPacker>(instance: &mut LayoutInstance<MockHost, P>) -> usize {
    let mut delivered = 0;
    while let Some(event) = instance.host_mut().next_event() {
        instance.handle(event);
        delivered += 1;
        assert!(delivered < 256, "host never settled; notification feedback loop");
    }
    delivered
}
