//! Polygon ring encoding module
//!
//! Converts coordinate rings into WKT polygon strings for the spatial
//! store. Pure functions, no I/O.

/// A single `(x, y)` coordinate pair in storage axis order (lon, lat).
pub type Coordinate = [f64; 2];

/// Encode a coordinate ring as a closed WKT polygon.
///
/// The caller must have validated the ring already: at least 3 pairs,
/// each pair exactly two numbers. An open ring (first != last) is
/// closed by appending a copy of the first coordinate; an already
/// closed ring is passed through unchanged.
///
/// No reordering, deduplication or geometry validation is performed —
/// self-intersecting and degenerate rings are encoded verbatim and left
/// for the spatial store to interpret.
pub fn ring_to_wkt(ring: &[Coordinate]) -> String {
    debug_assert!(ring.len() >= 3, "ring must contain at least 3 points");

    let mut points: Vec<Coordinate> = ring.to_vec();
    let first = points[0];
    let last = points[points.len() - 1];
    if first[0] != last[0] || first[1] != last[1] {
        points.push(first);
    }

    let inner = points
        .iter()
        .map(|p| format!("{} {}", p[0], p[1]))
        .collect::<Vec<_>>()
        .join(", ");

    format!("POLYGON(({inner}))")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ring_gets_closed() {
        let wkt = ring_to_wkt(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        assert_eq!(wkt, "POLYGON((0 0, 1 0, 1 1, 0 0))");
    }

    #[test]
    fn test_closed_ring_unchanged() {
        let wkt = ring_to_wkt(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        assert_eq!(wkt, "POLYGON((0 0, 1 0, 1 1, 0 0))");
    }

    #[test]
    fn test_closure_is_idempotent() {
        let open = [[2.5, -1.0], [3.0, 4.0], [0.0, 4.0]];
        let once = ring_to_wkt(&open);
        let closed = [[2.5, -1.0], [3.0, 4.0], [0.0, 4.0], [2.5, -1.0]];
        assert_eq!(once, ring_to_wkt(&closed));
    }

    #[test]
    fn test_partial_match_still_closes() {
        // Same x but different y on the last point: not closed
        let wkt = ring_to_wkt(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(wkt, "POLYGON((0 0, 1 0, 0 1, 0 0))");
    }

    #[test]
    fn test_fractional_coordinates() {
        let wkt = ring_to_wkt(&[[30.25, 59.5], [30.5, 59.5], [30.5, 59.75]]);
        assert_eq!(
            wkt,
            "POLYGON((30.25 59.5, 30.5 59.5, 30.5 59.75, 30.25 59.5))"
        );
    }

    #[test]
    fn test_degenerate_ring_passes_through() {
        // Collinear points are not our problem; the store decides
        let wkt = ring_to_wkt(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(wkt, "POLYGON((0 0, 1 1, 2 2, 0 0))");
    }
}
