//! Deterministic connector routing between two task bars.
//!
//! `(x1, y1)` is always the right-center exit of the predecessor bar and
//! `(x2, y2)` the left-center entry of the dependent bar, regardless of
//! where the bars sit relative to each other. Every produced path starts
//! and ends at exactly those points.

use egui::Pos2;

/// Horizontal gaps narrower than this route as an L through the column
/// midpoint instead of a turn beside the destination.
pub const SHORT_HOP_PX: f32 = 80.0;
/// Gap between a vertical turn segment and the bar it runs beside.
pub const TURN_OFFSET_PX: f32 = 20.0;
/// Corner radius for the curved style on multi-segment paths.
pub const CORNER_RADIUS_PX: f32 = 5.0;

const CUBIC_SAMPLES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Curved,
    Squared,
}

/// One piece of a connector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line {
        from: Pos2,
        to: Pos2,
    },
    Cubic {
        from: Pos2,
        ctrl1: Pos2,
        ctrl2: Pos2,
        to: Pos2,
    },
}

impl PathSegment {
    pub fn start(&self) -> Pos2 {
        match *self {
            PathSegment::Line { from, .. } | PathSegment::Cubic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Pos2 {
        match *self {
            PathSegment::Line { to, .. } | PathSegment::Cubic { to, .. } => to,
        }
    }

    fn closest_point(&self, p: Pos2) -> Pos2 {
        match *self {
            PathSegment::Line { from, to } => project_on_segment(from, to, p),
            PathSegment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                // Project onto a sampled polyline of the curve.
                let mut best = from;
                let mut best_d2 = f32::MAX;
                let mut prev = from;
                for i in 1..=CUBIC_SAMPLES {
                    let t = i as f32 / CUBIC_SAMPLES as f32;
                    let next = cubic_point(from, ctrl1, ctrl2, to, t);
                    let candidate = project_on_segment(prev, next, p);
                    let d2 = (candidate - p).length_sq();
                    if d2 < best_d2 {
                        best_d2 = d2;
                        best = candidate;
                    }
                    prev = next;
                }
                best
            }
        }
    }
}

/// An ordered list of segments forming one connector.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    pub segments: Vec<PathSegment>,
}

impl PathDescriptor {
    pub fn start(&self) -> Option<Pos2> {
        self.segments.first().map(|s| s.start())
    }

    pub fn end(&self) -> Option<Pos2> {
        self.segments.last().map(|s| s.end())
    }

    /// Nearest point on the path to the pointer: the anchor for the
    /// delete affordance. Recomputed on every pointer-move while the
    /// connector is hovered.
    pub fn closest_point(&self, pointer: Pos2) -> Option<Pos2> {
        self.segments
            .iter()
            .map(|s| s.closest_point(pointer))
            .min_by(|a, b| {
                (*a - pointer)
                    .length_sq()
                    .total_cmp(&(*b - pointer).length_sq())
            })
    }
}

/// Read-only view of bar extents per row, injected by the host so the
/// router can keep vertical turns outside intervening bars.
pub trait BarGeometry {
    /// Horizontal `[left, right]` span of the bar occupying `row`, if any.
    fn bar_span(&self, row: usize) -> Option<(f32, f32)>;
}

/// Accessor for charts with no intervening-bar information.
pub struct NoBars;

impl BarGeometry for NoBars {
    fn bar_span(&self, _row: usize) -> Option<(f32, f32)> {
        None
    }
}

impl<F> BarGeometry for F
where
    F: Fn(usize) -> Option<(f32, f32)>,
{
    fn bar_span(&self, row: usize) -> Option<(f32, f32)> {
        self(row)
    }
}

/// Pure routing: geometry in, path out. Holds only the injected bar
/// accessor; never mutates state.
pub struct ConnectorRouter<'a> {
    bars: &'a dyn BarGeometry,
}

impl<'a> ConnectorRouter<'a> {
    pub fn new(bars: &'a dyn BarGeometry) -> Self {
        Self { bars }
    }

    /// Route from the source exit `(x1, y1)` to the destination entry
    /// `(x2, y2)`.
    #[allow(clippy::too_many_arguments)]
    pub fn route(
        &self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        from_row: usize,
        to_row: usize,
        style: LineStyle,
    ) -> PathDescriptor {
        let a = Pos2::new(x1, y1);
        let b = Pos2::new(x2, y2);

        if from_row == to_row {
            return match style {
                LineStyle::Curved => {
                    let offset = ((x2 - x1).abs() / 3.0).min(30.0);
                    PathDescriptor {
                        segments: vec![PathSegment::Cubic {
                            from: a,
                            ctrl1: Pos2::new(x1 + offset, y1),
                            ctrl2: Pos2::new(x2 - offset, y2),
                            to: b,
                        }],
                    }
                }
                LineStyle::Squared => PathDescriptor {
                    segments: vec![PathSegment::Line { from: a, to: b }],
                },
            };
        }

        let dx = x2 - x1;
        if dx.abs() < SHORT_HOP_PX {
            // L-shaped jog through the column midpoint.
            let mid_x = (x1 + x2) / 2.0;
            let points = [a, Pos2::new(mid_x, y1), Pos2::new(mid_x, y2), b];
            return polyline(&points, style);
        }

        if dx > 0.0 {
            // Forward: turn immediately left of the destination, pushed
            // right past any intervening bar. The rightmost candidate
            // always wins so the line stays outside all bars in between.
            let mut turn_x = x2 - TURN_OFFSET_PX;
            let (lo, hi) = (from_row.min(to_row), from_row.max(to_row));
            for _ in lo..=hi {
                let mut bumped = false;
                for row in (lo + 1)..hi {
                    if let Some((left, right)) = self.bars.bar_span(row) {
                        if turn_x >= left && turn_x <= right {
                            turn_x = right + TURN_OFFSET_PX;
                            bumped = true;
                        }
                    }
                }
                if !bumped {
                    break;
                }
            }
            if turn_x < x2 {
                let points = [a, Pos2::new(turn_x, y1), Pos2::new(turn_x, y2), b];
                return polyline(&points, style);
            }
            // No turn column fits left of the destination; bridge instead.
        }

        self.bridge(a, b, style)
    }

    /// Five-segment backward path: exit right, move to a bridge row
    /// between the two bands, run left past the destination column, drop
    /// the rest immediately left of the destination bar, enter from the
    /// left. The long horizontal never lies inside either bar's row band.
    fn bridge(&self, a: Pos2, b: Pos2, style: LineStyle) -> PathDescriptor {
        let exit_x = a.x + TURN_OFFSET_PX;
        let entry_x = b.x - TURN_OFFSET_PX;
        let bridge_y = (a.y + b.y) / 2.0;
        let points = [
            a,
            Pos2::new(exit_x, a.y),
            Pos2::new(exit_x, bridge_y),
            Pos2::new(entry_x, bridge_y),
            Pos2::new(entry_x, b.y),
            b,
        ];
        polyline(&points, style)
    }
}

/// Build a path from corner points: straight lines for the squared style,
/// lines with small rounded corners for the curved style.
fn polyline(points: &[Pos2], style: LineStyle) -> PathDescriptor {
    match style {
        LineStyle::Squared => PathDescriptor {
            segments: points
                .windows(2)
                .map(|w| PathSegment::Line { from: w[0], to: w[1] })
                .collect(),
        },
        LineStyle::Curved => rounded_polyline(points, CORNER_RADIUS_PX),
    }
}

fn rounded_polyline(points: &[Pos2], radius: f32) -> PathDescriptor {
    let mut segments = Vec::new();
    let mut cursor = points[0];
    for i in 1..points.len() - 1 {
        let corner = points[i];
        let next = points[i + 1];
        let len_in = (corner - cursor).length();
        let len_out = (next - corner).length();
        let r = radius.min(len_in / 2.0).min(len_out / 2.0);
        if r <= f32::EPSILON {
            segments.push(PathSegment::Line {
                from: cursor,
                to: corner,
            });
            cursor = corner;
            continue;
        }
        let dir_in = (corner - cursor) / len_in;
        let dir_out = (next - corner) / len_out;
        let before = corner - dir_in * r;
        let after = corner + dir_out * r;
        if before != cursor {
            segments.push(PathSegment::Line {
                from: cursor,
                to: before,
            });
        }
        segments.push(PathSegment::Cubic {
            from: before,
            ctrl1: corner,
            ctrl2: corner,
            to: after,
        });
        cursor = after;
    }
    let last = points[points.len() - 1];
    segments.push(PathSegment::Line {
        from: cursor,
        to: last,
    });
    PathDescriptor { segments }
}

fn cubic_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Pos2::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

fn project_on_segment(a: Pos2, b: Pos2, p: Pos2) -> Pos2 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
