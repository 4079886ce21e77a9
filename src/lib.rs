//! Planar Voronoi diagrams with Fortune's sweep line algorithm.
//!
//! The sweep line moves left to right. Arcs of the beachline are ordered
//! bottom to top, and the breakpoints between them trace the edges of the
//! diagram.
//!
//! https://en.wikipedia.org/wiki/Fortune%27s_algorithm

mod beachline;
mod config;
mod diagram;
mod error;
mod event_queue;
mod fortune;
mod geometry;
mod logger;
mod request;

use std::collections::HashSet;

pub use ordered_float::{FloatIsNan, NotNan};

pub use crate::config::{BoundaryHint, Bounds, VoronoiConfig};
pub use crate::diagram::{Diagram, SweepStats};
pub use crate::error::{Result, VoronoiError};
pub use crate::event_queue::EventQueue;
pub use crate::geometry::{breakpoint, circumcircle, Circle, LineSegment, Point};
pub use crate::logger::{DiscardLogger, FortuneLogMessage, FortuneLogger, PrintlnLogger, TracingLogger};
pub use crate::request::{VoronoiRequest, VoronoiResponse};

/// Returns the first element that shows up more than once.
fn first_duplicate<T>(elements: &[T]) -> Option<&T>
where
    T: Eq + ::std::hash::Hash,
{
    let mut scanned = HashSet::new();
    elements.iter().find(|element| !scanned.insert(*element))
}

/// Check the sites are something the sweep can work with.
pub fn validate_sites(sites: &[Point]) -> Result<()> {
    if sites.len() < 2 {
        return Err(VoronoiError::TooFewSites { count: sites.len() });
    }

    if let Some(site) = sites.iter().find(|site| !site.is_finite()) {
        return Err(VoronoiError::NonFiniteSite { x: site.x(), y: site.y() });
    }

    if let Some(site) = first_duplicate(sites) {
        return Err(VoronoiError::DuplicateSite { x: site.x(), y: site.y() });
    }

    Ok(())
}

/// The Voronoi diagram of `sites`, with the default configuration.
pub fn compute_voronoi(sites: &[Point], hint: Option<BoundaryHint>) -> Result<Diagram> {
    compute_voronoi_with_config(sites, hint, &VoronoiConfig::default())
}

pub fn compute_voronoi_with_config(sites: &[Point], hint: Option<BoundaryHint>, config: &VoronoiConfig) -> Result<Diagram> {
    compute_voronoi_with_logger(sites, hint, config, DiscardLogger)
}

pub fn compute_voronoi_with_logger<L>(sites: &[Point], hint: Option<BoundaryHint>, config: &VoronoiConfig, logger: L) -> Result<Diagram>
where L: FortuneLogger
{
    validate_sites(sites)?;
    if let Some(ref hint) = hint {
        hint.validate()?;
    }

    let bounds = Bounds::around(sites, hint, config);
    fortune::fortune(sites, bounds, config, logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn p(x: f64, y: f64) -> Point {
        Point::new_unwrap(x, y)
    }

    fn is_vertical_at(edge: &LineSegment, x: f64) -> bool {
        (edge.from.x() - x).abs() < 1e-6 && (edge.to.x() - x).abs() < 1e-6
    }

    fn sorted_edges(diagram: &Diagram) -> Vec<LineSegment> {
        let mut edges: Vec<LineSegment> = diagram.edges().iter().map(LineSegment::normalized).collect();
        edges.sort();
        edges
    }

    fn check_euler(diagram: &Diagram) {
        let (edges, vertices, sites) = (diagram.edges().len(), diagram.vertices().len(), diagram.sites().len());
        assert_eq!(edges, vertices + sites - 1, "{} edges, {} vertices, {} sites", edges, vertices, sites);
    }

    fn random_sites(seed: u64, count: usize) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count).map(|_| p(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))).collect()
    }

    /// Sites on a small integer lattice, so many share an `x` or a circle.
    fn lattice_sites(seed: u64, count: usize, side: i32) -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sites: Vec<Point> = (0..count).map(|_| p(rng.gen_range(0..side) as f64, rng.gen_range(0..side) as f64)).collect();
        sites.sort();
        sites.dedup();
        sites
    }

    /// Distances from `point` to every site, nearest first.
    fn nearest_sites(sites: &[Point], point: &Point) -> Vec<(f64, Point)> {
        let mut by_distance: Vec<(f64, Point)> = sites.iter().map(|site| (site.distance(point), *site)).collect();
        by_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        by_distance
    }

    fn same_distance(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    /// Every point of every edge is equally far from its two nearest sites,
    /// and an edge leaves each of its vertices away from the vertex's third
    /// site.
    fn check_edges(diagram: &Diagram) {
        let sites = diagram.sites();
        let vertices = diagram.vertices();

        for edge in diagram.edges() {
            for &t in &[0.1, 0.5, 0.9] {
                let point = p(edge.from.x() + t * edge.dx(), edge.from.y() + t * edge.dy());
                let nearest = nearest_sites(sites, &point);
                assert!(
                    same_distance(nearest[0].0, nearest[1].0),
                    "{} on {} is closer to {} than to {}", point, edge, nearest[0].1, nearest[1].1
                );
            }

            let pair = nearest_sites(sites, &edge.midpoint());
            let (a, b) = (pair[0].1, pair[1].1);

            for &(vertex, other) in &[(edge.from, edge.to), (edge.to, edge.from)] {
                let tolerance = 1e-6 * vertex.magnitude().max(1.0);
                if !vertices.iter().any(|v| v.approx_eq(&vertex, tolerance)) {
                    continue;
                }

                let around = nearest_sites(sites, &vertex);
                if around.len() > 3 && same_distance(around[2].0, around[3].0) {
                    // Co-circular, no single third site.
                    continue;
                }

                let third = match around.iter().take(3).map(|&(_, site)| site).find(|&site| site != a && site != b) {
                    Some(third) => third,
                    None => continue
                };
                let outward = (other.x() - vertex.x()) * (third.x() - a.x()) + (other.y() - vertex.y()) * (third.y() - a.y());
                assert!(outward < 0.0, "{} heads towards {} from {}", edge, third, vertex);
            }
        }
    }

    #[test]
    fn first_duplicate_finds_repeats() {
        assert_eq!(first_duplicate::<u32>(&[]), None);
        assert_eq!(first_duplicate(&[0u32, 1, 2]), None);
        assert_eq!(first_duplicate(&[0u32, 1, 0]), Some(&0));
        assert_eq!(first_duplicate(&[3u32, 1, 1, 3]), Some(&1));
    }

    #[test]
    fn rejects_too_few_sites() {
        assert_eq!(compute_voronoi(&[], None).unwrap_err(), VoronoiError::TooFewSites { count: 0 });
        assert_eq!(compute_voronoi(&[p(1.0, 1.0)], None).unwrap_err(), VoronoiError::TooFewSites { count: 1 });
    }

    #[test]
    fn rejects_duplicate_sites() {
        let err = compute_voronoi(&[p(0.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)], None).unwrap_err();

        assert_eq!(err, VoronoiError::DuplicateSite { x: 0.0, y: 0.0 });
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_infinite_sites() {
        let err = compute_voronoi(&[p(0.0, 0.0), p(::std::f64::INFINITY, 1.0)], None).unwrap_err();

        assert!(matches!(err, VoronoiError::NonFiniteSite { .. }));
    }

    #[test]
    fn rejects_bad_hint() {
        let hint = BoundaryHint { min_x: 5.0, min_y: 0.0, max_x: 0.0, max_y: 5.0 };

        assert!(matches!(compute_voronoi(&[p(0.0, 0.0), p(1.0, 1.0)], Some(hint)), Err(VoronoiError::InvalidBoundary(..))));
    }

    #[test]
    fn two_sites_make_one_vertical_edge() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(2.0, 0.0)], None).unwrap();
        let edges = diagram.edges();

        assert_eq!(edges.len(), 1);
        assert!(is_vertical_at(&edges[0], 1.0));

        let (low, high) = (edges[0].from.y().min(edges[0].to.y()), edges[0].from.y().max(edges[0].to.y()));
        let bounds = diagram.bounds();
        assert!(low < bounds.min_y - bounds.height());
        assert!(high > bounds.max_y + bounds.height());
        assert!(diagram.vertices().is_empty());
    }

    #[test]
    fn equilateral_triangle_meets_at_its_circumcenter() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.4641)], None).unwrap();
        let center = p(2.0, 1.1547);

        let edges = diagram.edges();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|edge| edge.has_endpoint(&center, 1e-3)));

        let vertices = diagram.vertices();
        assert_eq!(vertices.len(), 1);
        assert!(vertices[0].approx_eq(&center, 1e-3));
        assert_eq!(diagram.stats().circle_events, 1);
        check_edges(&diagram);
    }

    #[test]
    fn collinear_sites_make_parallel_edges() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)], None).unwrap();
        let edges = diagram.edges();

        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|edge| is_vertical_at(edge, 0.5)));
        assert!(edges.iter().any(|edge| is_vertical_at(edge, 1.5)));
        assert!(diagram.vertices().is_empty());
        assert_eq!(diagram.stats().circles_scheduled, 0);
    }

    #[test]
    fn unit_square_meets_in_the_middle() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)], None).unwrap();
        let center = p(0.5, 0.5);

        let edges = diagram.edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|edge| edge.has_endpoint(&center, 1e-9)));
        assert_eq!(diagram.vertices(), vec![center]);
        check_edges(&diagram);
    }

    #[test]
    fn vertically_stacked_sites_make_horizontal_edges() {
        let diagram = compute_voronoi(&[p(0.0, 2.0), p(0.0, 0.0), p(0.0, 1.0)], None).unwrap();
        let edges = diagram.edges();

        assert_eq!(edges.len(), 2);
        for edge in &edges {
            assert!((edge.from.y() - edge.to.y()).abs() < 1e-9);
            assert!(edge.from.x().min(edge.to.x()) <= diagram.bounds().min_x);
        }
    }

    #[test]
    fn site_on_a_breakpoint() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(0.0, 2.0), p(1.0, 1.0)], None).unwrap();
        let vertex = p(0.0, 1.0);

        assert_eq!(diagram.edges().len(), 3);
        assert_eq!(diagram.vertices(), vec![vertex]);
        assert!(diagram.edges().iter().all(|edge| edge.has_endpoint(&vertex, 1e-9)));
    }

    #[test]
    fn grid_collapses_co_circular_arcs() {
        let sites: Vec<Point> = (0..3).flat_map(|x| (0..3).map(move |y| p(x as f64, y as f64))).collect();
        let diagram = compute_voronoi(&sites, None).unwrap();

        assert_eq!(diagram.vertices(), vec![p(0.5, 0.5), p(0.5, 1.5), p(1.5, 0.5), p(1.5, 1.5)]);
        assert_eq!(diagram.edges().len(), 12);
        check_edges(&diagram);
    }

    #[test]
    fn nearly_collinear_hull_points_its_ray_outwards() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(10.0, 0.5), p(20.0, 0.0)], None).unwrap();
        let vertex = p(10.0, -99.75);

        assert_eq!(diagram.vertices().len(), 1);
        assert!(diagram.vertices()[0].approx_eq(&vertex, 1e-9));

        // Between (0, 0) and (20, 0), heading down and away from (10, 0.5).
        let ray = diagram.edges().into_iter().find(|edge| is_vertical_at(edge, 10.0)).unwrap();
        let far = if ray.from.approx_eq(&vertex, 1e-9) { ray.to } else { ray.from };
        assert!(ray.has_endpoint(&vertex, 1e-9));
        assert!(far.y() < vertex.y());

        check_edges(&diagram);
    }

    #[test]
    fn first_column_edge_comes_in_from_past_its_vertex() {
        let diagram = compute_voronoi(&[p(0.0, 0.0), p(0.0, 1.0), p(0.1, 0.5)], None).unwrap();
        let vertex = p(-1.2, 0.5);

        assert!(diagram.vertices()[0].approx_eq(&vertex, 1e-9));

        // The bisector of the first column runs left from the vertex only.
        let horizontal = diagram.edges().into_iter()
            .find(|edge| edge.dy().abs() < 1e-9)
            .unwrap();
        assert!(horizontal.has_endpoint(&vertex, 1e-9));
        assert!(horizontal.from.x().max(horizontal.to.x()) <= vertex.x() + 1e-9);
        assert!(horizontal.from.x().min(horizontal.to.x()) < diagram.bounds().min_x);

        check_edges(&diagram);
    }

    #[test]
    fn lattice_clouds_have_true_edges() {
        for seed in 0..30 {
            let sites = lattice_sites(seed, 12, 6);
            if sites.len() < 2 {
                continue;
            }

            let diagram = compute_voronoi(&sites, None).unwrap();
            check_edges(&diagram);
        }
    }

    #[test]
    fn hint_widens_the_bounds_only() {
        let sites = [p(0.0, 0.0), p(2.0, 0.0), p(1.0, 2.0)];
        let hint = BoundaryHint { min_x: -50.0, min_y: -50.0, max_x: 50.0, max_y: 50.0 };

        let hinted = compute_voronoi(&sites, Some(hint)).unwrap();
        let plain = compute_voronoi(&sites, None).unwrap();

        assert!(hinted.bounds().min_x < plain.bounds().min_x);
        assert_eq!(hinted.edges().len(), plain.edges().len());
        assert_eq!(hinted.vertices(), plain.vertices());
    }

    #[test]
    fn random_clouds_satisfy_euler() {
        for seed in 0..20 {
            let diagram = compute_voronoi(&random_sites(seed, 60), None).unwrap();
            check_euler(&diagram);
            check_edges(&diagram);
        }
    }

    #[test]
    fn every_vertex_is_equidistant_from_its_nearest_sites() {
        let sites = random_sites(7, 40);
        let diagram = compute_voronoi(&sites, None).unwrap();

        for vertex in diagram.vertices() {
            let mut distances: Vec<f64> = sites.iter().map(|site| site.distance(&vertex)).collect();
            distances.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert!((distances[2] - distances[0]).abs() < 1e-6, "{} is not a Voronoi vertex", vertex);
        }
    }

    #[test]
    fn tracing_logger_runs() {
        let sites = random_sites(3, 10);
        let diagram = compute_voronoi_with_logger(&sites, None, &VoronoiConfig::default(), TracingLogger).unwrap();

        check_euler(&diagram);
    }

    fn distinct_sites() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 2..30)
            .prop_map(|coords| coords.into_iter().map(|(x, y)| p(x, y)).collect::<Vec<_>>())
            .prop_filter("sites too close together", |sites: &Vec<Point>| {
                sites.iter().enumerate().all(|(ix, a)| sites[ix + 1..].iter().all(|b| a.distance(b) > 1e-3))
            })
    }

    proptest! {
        #[test]
        fn site_order_does_not_matter(sites in distinct_sites(), rotate in 0usize..30) {
            let forward = compute_voronoi(&sites, None).unwrap();

            let mut shuffled = sites.clone();
            shuffled.reverse();
            let len = shuffled.len();
            shuffled.rotate_left(rotate % len);
            let shuffled = compute_voronoi(&shuffled, None).unwrap();

            prop_assert_eq!(sorted_edges(&forward), sorted_edges(&shuffled));
        }

        #[test]
        fn euler_relation_holds(sites in distinct_sites()) {
            let diagram = compute_voronoi(&sites, None).unwrap();

            prop_assert_eq!(diagram.edges().len(), diagram.vertices().len() + sites.len() - 1);
        }

        #[test]
        fn edges_lie_between_their_nearest_sites(sites in distinct_sites()) {
            check_edges(&compute_voronoi(&sites, None).unwrap());
        }

        #[test]
        fn sweep_never_moves_backwards(sites in distinct_sites()) {
            let mut messages = Vec::new();
            compute_voronoi_with_logger(&sites, None, &VoronoiConfig::default(), &mut messages).unwrap();

            let xs: Vec<f64> = messages.iter().filter_map(FortuneLogMessage::sweep_x).collect();
            prop_assert!(xs.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
