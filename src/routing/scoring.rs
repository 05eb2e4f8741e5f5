use crate::geometry::{Bounds, LayoutConfig, Point};

pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| (w[1].x - w[0].x).abs() + (w[1].y - w[0].y).abs()).sum()
}

/// Every interior vertex of a simplified (collinearity-merged) polyline is a
/// genuine 90 degree turn, so the count falls straight out of its length.
pub fn count_turns(points: &[Point]) -> usize {
    points.len().saturating_sub(2)
}

fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    let eps = 1e-6;
    let a_horiz = (a0.y - a1.y).abs() < f64::EPSILON;
    let b_horiz = (b0.y - b1.y).abs() < f64::EPSILON;

    if a_horiz == b_horiz {
        if a_horiz {
            if (a0.y - b0.y).abs() > eps {
                return false;
            }
            let (a_min, a_max) = (a0.x.min(a1.x), a0.x.max(a1.x));
            let (b_min, b_max) = (b0.x.min(b1.x), b0.x.max(b1.x));
            a_min.max(b_min) < a_max.min(b_max) - eps
        } else {
            if (a0.x - b0.x).abs() > eps {
                return false;
            }
            let (a_min, a_max) = (a0.y.min(a1.y), a0.y.max(a1.y));
            let (b_min, b_max) = (b0.y.min(b1.y), b0.y.max(b1.y));
            a_min.max(b_min) < a_max.min(b_max) - eps
        }
    } else {
        let (h0, h1, v0, v1) = if a_horiz { (a0, a1, b0, b1) } else { (b0, b1, a0, a1) };
        let y = h0.y;
        let x = v0.x;
        let within_h = x > h0.x.min(h1.x) + eps && x < h0.x.max(h1.x) - eps;
        let within_v = y > v0.y.min(v1.y) + eps && y < v0.y.max(v1.y) - eps;
        within_h && within_v
    }
}

/// Counts proper crossings between `candidate` and every already-placed
/// route's segments. Shared endpoints don't count as crossings.
pub fn count_crossings(candidate: &[Point], placed: &[Vec<Point>]) -> usize {
    let mut total = 0;
    for w in candidate.windows(2) {
        for route in placed {
            for w2 in route.windows(2) {
                if segments_cross(w[0], w[1], w2[0], w2[1]) {
                    total += 1;
                }
            }
        }
    }
    total
}

/// For each obstacle (a node that is neither this edge's source nor target),
/// 1 if any segment's axis-aligned bounding box overlaps the obstacle's
/// bounds, else 0.
pub fn count_node_touches(points: &[Point], obstacles: &[&Bounds]) -> usize {
    obstacles
        .iter()
        .filter(|b| {
            points.windows(2).any(|w| {
                let seg_min_x = w[0].x.min(w[1].x);
                let seg_max_x = w[0].x.max(w[1].x);
                let seg_min_y = w[0].y.min(w[1].y);
                let seg_max_y = w[0].y.max(w[1].y);
                seg_max_x >= b.left && seg_min_x <= b.right && seg_max_y >= b.top && seg_min_y <= b.bottom
            })
        })
        .count()
}

pub fn score(points: &[Point], placed: &[Vec<Point>], obstacles: &[&Bounds], config: &LayoutConfig) -> f64 {
    let length = polyline_length(points);
    let turns = count_turns(points) as f64;
    let crossings = count_crossings(points, placed) as f64;
    let touches = count_node_touches(points, obstacles) as f64;
    config.score_length_weight * length
        + config.score_turn_weight * turns
        + config.score_crossing_weight * crossings
        + config.score_node_touch_weight * touches
}
