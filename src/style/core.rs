use std::fmt;

use serde::Serialize;

use crate::config::{LayoutConfig, Positioning, XDirection, YDirection};
use crate::geometry::Point;
use crate::host::Host;
use crate::layout::Placement;
use crate::registry::PlacementRegistry;

/// Concrete positioning write for one child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PositionDirective {
    /// Signed translation from the child's null position.
    Translate { x: f64, y: f64 },
    /// Edge offsets; `None` edges are left `auto`.
    Inset {
        top: Option<f64>,
        right: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
    },
}

impl PositionDirective {
    pub fn for_point(point: Point, config: &LayoutConfig) -> Self {
        match config.positioning {
            Positioning::Transform => {
                let x = match config.x_direction {
                    XDirection::Ltr => point.x,
                    XDirection::Rtl => -point.x,
                };
                let y = match config.y_direction {
                    YDirection::Ttb => point.y,
                    YDirection::Btt => -point.y,
                };
                PositionDirective::Translate { x, y }
            }
            Positioning::Offset => {
                let (left, right) = match config.x_direction {
                    XDirection::Ltr => (Some(point.x), None),
                    XDirection::Rtl => (None, Some(point.x)),
                };
                let (top, bottom) = match config.y_direction {
                    YDirection::Ttb => (Some(point.y), None),
                    YDirection::Btt => (None, Some(point.y)),
                };
                PositionDirective::Inset {
                    top,
                    right,
                    bottom,
                    left,
                }
            }
        }
    }

    pub fn positioning(&self) -> Positioning {
        match self {
            PositionDirective::Translate { .. } => Positioning::Transform,
            PositionDirective::Inset { .. } => Positioning::Offset,
        }
    }
}

struct Px(f64);

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}px", self.0)
        }
    }
}

struct Edge(Option<f64>);

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(&Px(value), f),
            None => f.write_str("auto"),
        }
    }
}

/// CSS text: the `transform` value for translations, the `inset` shorthand
/// for offsets.
impl fmt::Display for PositionDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PositionDirective::Translate { x, y } => write!(f, "translate({}, {})", Px(x), Px(y)),
            PositionDirective::Inset {
                top,
                right,
                bottom,
                left,
            } => write!(
                f,
                "{} {} {} {}",
                Edge(top),
                Edge(right),
                Edge(bottom),
                Edge(left)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub written: usize,
    pub unchanged: usize,
    pub released: usize,
}

/// Write placements onto their nodes and size the container to the packed
/// height. Directives identical to the last pass are skipped; nodes that
/// dropped out of the placement set have their positioning cleared.
pub fn apply<H: Host>(
    host: &mut H,
    registry: &mut PlacementRegistry<H::Node>,
    placements: &[Placement<H::Node>],
    config: &LayoutConfig,
    packed_height: f64,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for stale in registry.retain_live(placements.iter().map(|placement| &placement.node)) {
        host.clear_position(&stale, config.positioning);
        outcome.released += 1;
    }

    for placement in placements {
        let directive = PositionDirective::for_point(placement.point, config);
        if registry.record(&placement.node, directive) {
            host.write_position(&placement.node, &directive);
            outcome.written += 1;
        } else {
            outcome.unchanged += 1;
        }
    }

    host.set_container_height(Some(packed_height));
    outcome
}

/// Unset every positioning write made through `registry` and drop the
/// container height override. Returns the number of nodes cleared.
pub fn reset<H: Host>(
    host: &mut H,
    registry: &mut PlacementRegistry<H::Node>,
    config: &LayoutConfig,
) -> usize {
    let nodes = registry.drain();
    for node in &nodes {
        host.clear_position(node, config.positioning);
    }
    host.set_container_height(None);
    nodes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::host::mock::{MockHost, MockNode};

    fn config(positioning: &str, x: &str, y: &str) -> LayoutConfig {
        LayoutConfig::from_attributes(Some(positioning), Some(x), Some(y))
    }

    #[test]
    fn transform_flips_sign_for_reversed_axes() {
        let point = Point::new(50.0, 25.0);
        assert_eq!(
            PositionDirective::for_point(point, &config("transform", "ltr", "ttb")),
            PositionDirective::Translate { x: 50.0, y: 25.0 }
        );
        assert_eq!(
            PositionDirective::for_point(point, &config("transform", "rtl", "btt")),
            PositionDirective::Translate { x: -50.0, y: -25.0 }
        );
    }

    #[test]
    fn offset_picks_edges_without_sign_flip() {
        let point = Point::new(50.0, 25.0);
        assert_eq!(
            PositionDirective::for_point(point, &config("offset", "rtl", "ttb")),
            PositionDirective::Inset {
                top: Some(25.0),
                right: Some(50.0),
                bottom: None,
                left: None
            }
        );
        assert_eq!(
            PositionDirective::for_point(point, &config("offset", "ltr", "btt")),
            PositionDirective::Inset {
                top: None,
                right: None,
                bottom: Some(25.0),
                left: Some(50.0)
            }
        );
    }

    #[test]
    fn renders_css_text() {
        let translate = PositionDirective::for_point(Point::new(100.0, 0.0), &LayoutConfig::default());
        assert_eq!(translate.to_string(), "translate(100px, 0)");

        let flipped = PositionDirective::for_point(
            Point::new(0.0, 12.5),
            &config("transform", "rtl", "btt"),
        );
        assert_eq!(flipped.to_string(), "translate(0, -12.5px)");

        let inset = PositionDirective::for_point(Point::new(50.0, 0.0), &config("offset", "rtl", "btt"));
        assert_eq!(inset.to_string(), "auto 50px 0 auto");
    }

    #[test]
    fn apply_skips_unchanged_and_releases_stale_nodes() {
        let mut host = MockHost::new(200.0);
        let a = host.append_element(Size::new(50.0, 25.0));
        let b = host.append_element(Size::new(50.0, 25.0));
        let mut registry = PlacementRegistry::new();
        let config = LayoutConfig::default();

        let first = [
            Placement::new(a, Point::new(0.0, 0.0)),
            Placement::new(b, Point::new(50.0, 0.0)),
        ];
        let outcome = apply(&mut host, &mut registry, &first, &config, 25.0);
        assert_eq!(outcome, ApplyOutcome { written: 2, unchanged: 0, released: 0 });
        assert_eq!(host.container_height(), Some(25.0));

        let second = [Placement::new(b, Point::new(50.0, 0.0))];
        let outcome = apply(&mut host, &mut registry, &second, &config, 25.0);
        assert_eq!(outcome, ApplyOutcome { written: 0, unchanged: 1, released: 1 });
        assert_eq!(host.transform_of(a), None);
        assert_eq!(host.transform_of(b), Some(PositionDirective::Translate { x: 50.0, y: 0.0 }));
    }

    #[test]
    fn reset_clears_every_recorded_node() {
        let mut host = MockHost::new(200.0);
        let nodes: Vec<MockNode> = (0..3).map(|_| host.append_element(Size::new(10.0, 10.0))).collect();
        let mut registry = PlacementRegistry::new();
        let config = config("offset", "ltr", "ttb");
        let placements: Vec<_> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| Placement::new(*node, Point::new(i as f64 * 10.0, 0.0)))
            .collect();
        apply(&mut host, &mut registry, &placements, &config, 10.0);
        assert!(nodes.iter().all(|node| host.inset_of(*node).is_some()));

        assert_eq!(reset(&mut host, &mut registry, &config), 3);
        assert!(nodes.iter().all(|node| host.inset_of(*node).is_none()));
        assert_eq!(host.container_height(), None);
        assert_eq!(reset(&mut host, &mut registry, &config), 0);
    }
}
