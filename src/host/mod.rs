//! Environment contract.
//!
//! A [`Host`] wraps a container, its children host and the notification
//! primitives around them. The host owns delivery: it queues notifications
//! while watchers are live and routes each one into
//! [`LayoutInstance::handle`](crate::runtime::LayoutInstance::handle) as a
//! [`HostEvent`]. The instance drives the watchers through this trait but
//! never stores callbacks of its own.

use std::fmt::Debug;
use std::hash::Hash;

use crate::config::Positioning;
use crate::geometry::Size;
use crate::style::PositionDirective;

#[cfg(test)]
pub(crate) mod mock;

/// Which box a dimension watcher reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSizing {
    /// Includes padding and border; used for children.
    BorderBox,
    /// Excludes padding and border; used for the container.
    ContentBox,
}

/// One node's measurement inside a dimensional batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeEntry<N> {
    pub node: N,
    /// Absent when the host could not measure the box; treated as 0×0.
    pub border_box: Option<Size>,
}

impl<N> ResizeEntry<N> {
    pub fn new(node: N, size: Size) -> Self {
        Self {
            node,
            border_box: Some(size),
        }
    }

    pub fn size(&self) -> Size {
        self.border_box.unwrap_or_default()
    }
}

/// Notifications delivered by the host while watchers are live.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<N> {
    /// The children host's direct child list changed.
    ChildrenMutated { added: Vec<N>, removed: Vec<N> },
    /// Border-box sizes for every node currently under dimensional watch.
    ChildrenResized(Vec<ResizeEntry<N>>),
    /// The container's content-box width changed.
    ContainerResized { width: f64 },
    /// A tracked asset finished loading. Listeners are one-shot.
    AssetLoaded(N),
    /// The frame boundary requested through [`Host::request_frame`].
    Frame,
}

impl<N> HostEvent<N> {
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::ChildrenMutated { .. } => "children_mutated",
            HostEvent::ChildrenResized(_) => "children_resized",
            HostEvent::ContainerResized { .. } => "container_resized",
            HostEvent::AssetLoaded(_) => "asset_loaded",
            HostEvent::Frame => "frame",
        }
    }
}

pub trait Host {
    type Node: Clone + Eq + Hash + Debug;

    /// Direct children of the children host, in document order. Includes
    /// nodes that carry no geometry (text).
    fn children(&self) -> Vec<Self::Node>;

    /// Whether a node can carry visual geometry.
    fn is_positionable(&self, node: &Self::Node) -> bool;

    /// Current content-box width of the container.
    fn container_width(&self) -> f64;

    /// Visual assets under the children host that have not finished loading.
    fn loading_assets(&self) -> Vec<Self::Node>;

    fn observe_children(&mut self);

    /// Drop notifications that were queued but not yet delivered; returns
    /// how many were discarded.
    fn take_mutation_records(&mut self) -> usize;

    fn disconnect_children(&mut self);

    fn observe_child_size(&mut self, node: &Self::Node, sizing: BoxSizing);

    fn disconnect_child_sizes(&mut self);

    fn observe_container_size(&mut self, sizing: BoxSizing);

    fn disconnect_container_size(&mut self);

    fn listen_for_load(&mut self, asset: &Self::Node);

    fn unlisten_for_load(&mut self, asset: &Self::Node);

    /// Schedule a single [`HostEvent::Frame`] before the next paint.
    fn request_frame(&mut self);

    fn write_position(&mut self, node: &Self::Node, directive: &PositionDirective);

    /// Unset whatever the given positioning mode writes on `node`.
    fn clear_position(&mut self, node: &Self::Node, positioning: Positioning);

    /// `None` removes the height override.
    fn set_container_height(&mut self, height: Option<f64>);
}
