use crate::geometry::Point;

use super::StripPacker;

/// Slack used when comparing fractional pixel widths and heights.
const EPSILON: f64 = 1e-6;

/// Horizontal run of the skyline at a uniform height.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    x: f64,
    width: f64,
    y: f64,
}

/// Online best-fit strip packer.
///
/// The free space is tracked as a skyline: contiguous segments covering
/// `[0, strip_width)`, each with the height already consumed above it. Every
/// insert goes into the lowest segment (leftmost on ties). When that segment
/// is too narrow, it is raised to its lower neighbour and merged, and the
/// search repeats. The area left below a raised segment is never reused.
#[derive(Debug, Clone)]
pub struct BestFitStripPack {
    strip_width: f64,
    skyline: Vec<Segment>,
    packed_height: f64,
}

impl BestFitStripPack {
    /// # Panics
    /// Panics if `strip_width` is not a positive, finite number.
    pub fn new(strip_width: f64) -> Self {
        assert!(
            strip_width.is_finite() && strip_width > 0.0,
            "strip width must be positive and finite"
        );
        Self {
            strip_width,
            skyline: vec![Self::floor(strip_width)],
            packed_height: 0.0,
        }
    }

    fn floor(strip_width: f64) -> Segment {
        Segment {
            x: 0.0,
            width: strip_width,
            y: 0.0,
        }
    }

    fn lowest_segment(&self) -> usize {
        let mut lowest = 0;
        for (idx, segment) in self.skyline.iter().enumerate().skip(1) {
            if segment.y < self.skyline[lowest].y {
                lowest = idx;
            }
        }
        lowest
    }

    /// Lift a segment to the lower of its neighbours so it merges into a wider gap.
    fn raise(&mut self, idx: usize) {
        let left = idx.checked_sub(1).map(|i| self.skyline[i].y);
        let right = self.skyline.get(idx + 1).map(|segment| segment.y);
        let target = match (left, right) {
            (Some(l), Some(r)) => l.min(r),
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => return,
        };
        self.skyline[idx].y = target;
        self.merge();
    }

    fn merge(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.skyline.len());
        for segment in self.skyline.drain(..) {
            match merged.last_mut() {
                Some(last) if (last.y - segment.y).abs() <= EPSILON => {
                    last.width += segment.width;
                }
                _ => merged.push(segment),
            }
        }
        self.skyline = merged;
    }

    fn place(&mut self, idx: usize, width: f64, height: f64) -> Point {
        let segment = self.skyline[idx];
        let top = segment.y + height;
        let rest = segment.width - width;

        let mut replacement = Vec::with_capacity(2);
        if rest > EPSILON {
            replacement.push(Segment {
                x: segment.x,
                width,
                y: top,
            });
            replacement.push(Segment {
                x: segment.x + width,
                width: rest,
                y: segment.y,
            });
        } else {
            replacement.push(Segment { y: top, ..segment });
        }

        self.skyline.splice(idx..=idx, replacement);
        self.merge();
        self.packed_height = self.packed_height.max(top);
        Point::new(segment.x, segment.y)
    }

    /// Items wider than the strip sit at the left edge on top of everything.
    fn place_above_all(&mut self, height: f64) -> Point {
        let y = self.packed_height;
        self.skyline = vec![Segment {
            y: y + height,
            ..Self::floor(self.strip_width)
        }];
        self.packed_height = y + height;
        Point::new(0.0, y)
    }
}

impl StripPacker for BestFitStripPack {
    fn with_strip_width(strip_width: f64) -> Self {
        Self::new(strip_width)
    }

    fn strip_width(&self) -> f64 {
        self.strip_width
    }

    fn packed_height(&self) -> f64 {
        self.packed_height
    }

    fn insert(&mut self, width: f64, height: f64) -> Point {
        assert!(
            width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0,
            "packed items must have positive, finite dimensions"
        );

        if width > self.strip_width + EPSILON {
            return self.place_above_all(height);
        }

        loop {
            let idx = self.lowest_segment();
            if self.skyline[idx].width + EPSILON >= width {
                return self.place(idx, width, height);
            }
            // Every raise merges at least two segments, so this terminates
            // once the skyline collapses to the full strip.
            self.raise(idx);
        }
    }

    fn reset(&mut self) {
        self.skyline.clear();
        self.skyline.push(Self::floor(self.strip_width));
        self.packed_height = 0.0;
    }
}
