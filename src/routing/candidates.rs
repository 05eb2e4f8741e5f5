use crate::geometry::{Bounds, LayoutConfig, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

pub const SIDE_PAIRS: [(Side, Side); 4] = [
    (Side::Right, Side::Left),
    (Side::Right, Side::Right),
    (Side::Left, Side::Left),
    (Side::Left, Side::Right),
];

pub fn side_x(bounds: &Bounds, side: Side) -> f64 {
    match side {
        Side::Left => bounds.left,
        Side::Right => bounds.right,
    }
}

/// Builds the H-V-H skeleton through an intermediate vertical runway at
/// `mid_x`, dropping any segment that would have zero length.
pub fn build_hvh(src: Point, tgt: Point, mid_x: f64) -> Vec<Point> {
    let mut points = vec![src];
    if (src.x - mid_x).abs() > f64::EPSILON {
        points.push(Point::new(mid_x, src.y));
    }
    if (src.y - tgt.y).abs() > 1.0 {
        points.push(Point::new(mid_x, tgt.y));
    }
    if (mid_x - tgt.x).abs() > f64::EPSILON {
        points.push(Point::new(tgt.x, tgt.y));
    }
    let needs_final = points
        .last()
        .map(|p| (p.x - tgt.x).abs() > f64::EPSILON || (p.y - tgt.y).abs() > f64::EPSILON)
        .unwrap_or(true);
    if needs_final {
        points.push(tgt);
    }
    points
}

/// Collapses consecutive duplicate points and merges runs of collinear
/// points into a single segment, so the result alternates strictly between
/// horizontal and vertical segments with no zero-length or redundant hops.
pub fn simplify_polyline(points: &[Point]) -> Vec<Point> {
    let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        let is_dup = deduped
            .last()
            .map(|last: &Point| (last.x - p.x).abs() < f64::EPSILON && (last.y - p.y).abs() < f64::EPSILON)
            .unwrap_or(false);
        if !is_dup {
            deduped.push(p);
        }
    }

    let mut out: Vec<Point> = Vec::with_capacity(deduped.len());
    for p in deduped {
        if out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let collinear_h = (a.y - b.y).abs() < f64::EPSILON && (b.y - p.y).abs() < f64::EPSILON;
            let collinear_v = (a.x - b.x).abs() < f64::EPSILON && (b.x - p.x).abs() < f64::EPSILON;
            if collinear_h || collinear_v {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

fn segment_blocked(p0: Point, p1: Point, obstacles: &[&Bounds]) -> bool {
    let horizontal = (p0.y - p1.y).abs() < f64::EPSILON;
    obstacles.iter().any(|b| {
        if horizontal {
            let y = p0.y;
            b.top <= y && y <= b.bottom && p0.x.max(p1.x) > b.left && p0.x.min(p1.x) < b.right
        } else {
            let x = p0.x;
            b.left <= x && x <= b.right && p0.y.max(p1.y) > b.top && p0.y.min(p1.y) < b.bottom
        }
    })
}

pub fn path_blocked(points: &[Point], obstacles: &[&Bounds]) -> bool {
    points.windows(2).any(|w| segment_blocked(w[0], w[1], obstacles))
}

/// Direct H-V-H candidate. Requires both horizontal legs to clear the
/// minimum half-width, the runway to lie on the correct side of each node,
/// and no segment to cross an obstacle card. Returns `None` when any of
/// those fail — unlike the jog candidates, direct routes are disqualified
/// rather than merely penalised.
pub fn direct_candidate(
    src: Point,
    tgt: Point,
    src_side: Side,
    tgt_side: Side,
    config: &LayoutConfig,
    obstacles: &[&Bounds],
) -> Option<Vec<Point>> {
    let mid_x = (src.x + tgt.x) / 2.0;
    let h1 = (mid_x - src.x).abs();
    let h2 = (tgt.x - mid_x).abs();
    if h1 < config.min_direct_half_width || h2 < config.min_direct_half_width {
        return None;
    }

    let src_ok = match src_side {
        Side::Right => mid_x > src.x,
        Side::Left => mid_x < src.x,
    };
    let tgt_ok = match tgt_side {
        Side::Right => mid_x < tgt.x,
        Side::Left => mid_x > tgt.x,
    };
    if !src_ok || !tgt_ok {
        return None;
    }

    let points = build_hvh(src, tgt, mid_x);
    if path_blocked(&points, obstacles) {
        return None;
    }
    Some(points)
}

/// Outer wrap candidate via a runway past the leftmost/rightmost obstacle
/// edge. Only meaningful when both ends exit on the same side.
pub fn outer_candidate(src: Point, tgt: Point, runway_x: f64, obstacles: &[&Bounds]) -> Option<Vec<Point>> {
    let points = build_hvh(src, tgt, runway_x);
    if path_blocked(&points, obstacles) {
        None
    } else {
        Some(points)
    }
}

/// Short jog: a small step past the source's own edge. Always emitted —
/// scoring, not disqualification, penalises it when it crosses a node.
pub fn short_jog_candidate(src: Point, tgt: Point, src_side: Side, config: &LayoutConfig) -> Vec<Point> {
    let runway = match src_side {
        Side::Right => src.x + config.short_jog,
        Side::Left => src.x - config.short_jog,
    };
    build_hvh(src, tgt, runway)
}

/// Wide jog: a runway at the same obstacle extent an outer wrap would use,
/// but emitted unconditionally rather than gated on the side pair or on
/// clearing every obstacle.
pub fn wide_jog_candidate(src: Point, tgt: Point, runway_x: f64) -> Vec<Point> {
    build_hvh(src, tgt, runway_x)
}

/// Extent of every obstacle's bounding box, used to place outer and wide
/// runways clear of the densest part of the diagram. `None` when there are
/// no obstacles at all (nothing to route wide around).
pub fn obstacle_extent(obstacles: &[&Bounds]) -> Option<(f64, f64)> {
    if obstacles.is_empty() {
        return None;
    }
    let left = obstacles.iter().map(|b| b.left).fold(f64::INFINITY, f64::min);
    let right = obstacles.iter().map(|b| b.right).fold(f64::NEG_INFINITY, f64::max);
    Some((left, right))
}
