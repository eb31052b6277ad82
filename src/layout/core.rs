use crate::geometry::{Point, Size};
use crate::pack::StripPacker;

/// Cached border-box measurement for one positionable child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildGeometry<N> {
    pub node: N,
    pub width: f64,
    pub height: f64,
}

impl<N> ChildGeometry<N> {
    pub fn new(node: N, size: Size) -> Self {
        Self {
            node,
            width: size.width,
            height: size.height,
        }
    }
}

/// Packed top-left coordinate assigned to a child.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<N> {
    pub node: N,
    pub point: Point,
}

impl<N> Placement<N> {
    pub fn new(node: N, point: Point) -> Self {
        Self { node, point }
    }
}

/// Pack every child in order and return its placement.
///
/// Widths are clamped to the strip for packing only. Children with a zero
/// width or height reserve nothing: they are parked at a cursor that trails
/// the previous child, so a run of hidden children stays next to the last
/// visible one instead of collapsing to the origin. The packer is consumed
/// as-is; callers reset it first when they want a fresh pass.
pub fn compute_placements<N, P>(children: &[ChildGeometry<N>], packer: &mut P) -> Vec<Placement<N>>
where
    N: Clone,
    P: StripPacker,
{
    let strip_width = packer.strip_width();
    let mut hidden = Point::ORIGIN;
    let mut placements = Vec::with_capacity(children.len());

    for child in children {
        let width = child.width.min(strip_width);
        let point = if width <= 0.0 || child.height <= 0.0 {
            hidden
        } else {
            packer.insert(width, child.height)
        };

        placements.push(Placement::new(child.node.clone(), point));
        hidden = Point::new(point.x + width.max(0.0), point.y);
    }

    placements
}
