//! Behavioural tests for [`RingAssembler`].

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::collections::HashSet;
use stitchmap_core::{AssembledPolygon, Point, Ring, RingAssembler, Segment};

fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Coord { x, y }).collect()
}

#[fixture]
fn segments() -> RefCell<Vec<Segment>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn rings() -> RefCell<Vec<Ring>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn polygon() -> RefCell<Option<AssembledPolygon>> {
    RefCell::new(None)
}

// --- Given steps ---

#[given("four outer ways forming a square out of order")]
fn square_ways(#[from(segments)] segments: &RefCell<Vec<Segment>>) {
    *segments.borrow_mut() = vec![
        Segment::outer(points(&[(0.0, 0.0), (1.0, 0.0)])),
        Segment::outer(points(&[(1.0, 0.0), (1.0, 1.0)])),
        Segment::outer(points(&[(0.0, 1.0), (0.0, 0.0)])),
        Segment::outer(points(&[(0.0, 1.0), (1.0, 1.0)])),
    ];
}

#[given("two disjoint closed squares")]
fn disjoint_squares(#[from(segments)] segments: &RefCell<Vec<Segment>>) {
    *segments.borrow_mut() = vec![
        Segment::outer(points(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ])),
        Segment::outer(points(&[
            (5.0, 5.0),
            (6.0, 5.0),
            (6.0, 6.0),
            (5.0, 6.0),
            (5.0, 5.0),
        ])),
    ];
}

#[given("two ways whose junctions differ by less than the tolerance")]
fn noisy_ways(#[from(segments)] segments: &RefCell<Vec<Segment>>) {
    *segments.borrow_mut() = vec![
        Segment::outer(points(&[(10.0, 50.0), (10.5, 50.0), (10.5, 50.5)])),
        Segment::outer(points(&[
            (10.00004, 50.00006),
            (10.0, 50.5),
            (10.50009, 50.49992),
        ])),
    ];
}

#[given("two ways that share only one endpoint")]
fn open_chain(#[from(segments)] segments: &RefCell<Vec<Segment>>) {
    *segments.borrow_mut() = vec![
        Segment::outer(points(&[(0.0, 0.0), (1.0, 0.0)])),
        Segment::outer(points(&[(2.0, 1.0), (1.0, 0.0)])),
    ];
}

#[given("a closed outer way with a hole split into two inner ways")]
fn shell_with_split_hole(#[from(segments)] segments: &RefCell<Vec<Segment>>) {
    *segments.borrow_mut() = vec![
        Segment::outer(points(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ])),
        Segment::inner(points(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0)])),
        Segment::inner(points(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0)])),
    ];
}

// --- When steps ---

#[when("I assemble the rings")]
fn assemble(
    #[from(segments)] segments: &RefCell<Vec<Segment>>,
    #[from(rings)] rings: &RefCell<Vec<Ring>>,
) {
    *rings.borrow_mut() = stitchmap_core::assemble_rings(&segments.borrow());
}

#[when("I assemble the polygon")]
fn assemble_polygon(
    #[from(segments)] segments: &RefCell<Vec<Segment>>,
    #[from(polygon)] polygon: &RefCell<Option<AssembledPolygon>>,
) {
    *polygon.borrow_mut() = Some(RingAssembler::new().assemble_polygon(&segments.borrow()));
}

// --- Then steps ---

#[then("exactly one closed ring is produced")]
fn one_closed_ring(#[from(rings)] rings: &RefCell<Vec<Ring>>) {
    let rings = rings.borrow();
    assert_eq!(rings.len(), 1, "expected a single ring, got {rings:?}");
    assert!(rings[0].is_closed(), "expected the ring to close");
}

#[then("exactly one open ring is produced")]
fn one_open_ring(#[from(rings)] rings: &RefCell<Vec<Ring>>) {
    let rings = rings.borrow();
    assert_eq!(rings.len(), 1, "expected a single ring, got {rings:?}");
    assert!(!rings[0].is_closed(), "expected the ring to stay open");
    assert_eq!(rings[0].len(), 3);
}

#[then("two closed rings are produced")]
fn two_closed_rings(#[from(rings)] rings: &RefCell<Vec<Ring>>) {
    let rings = rings.borrow();
    assert_eq!(rings.len(), 2, "expected two rings, got {rings:?}");
    assert!(rings.iter().all(Ring::is_closed));
}

#[then("the ring visits the square corners")]
fn visits_corners(#[from(rings)] rings: &RefCell<Vec<Ring>>) {
    let rings = rings.borrow();
    let ring = rings.first().expect("one ring present");
    // Five points: four corners plus the repeated closing point.
    assert_eq!(ring.len(), 5);
    let corners: HashSet<(i64, i64)> = ring
        .points()
        .iter()
        .map(|p| (p.x.round() as i64, p.y.round() as i64))
        .collect();
    let expected: HashSet<(i64, i64)> = [(0, 0), (1, 0), (1, 1), (0, 1)].into_iter().collect();
    assert_eq!(corners, expected);
}

#[then("the polygon has one outer ring and one hole")]
fn one_shell_one_hole(#[from(polygon)] polygon: &RefCell<Option<AssembledPolygon>>) {
    let polygon = polygon.borrow();
    let polygon = polygon.as_ref().expect("polygon assembled");
    assert_eq!(polygon.outer.len(), 1);
    assert_eq!(polygon.holes.len(), 1);
    assert!(polygon.holes[0].is_closed(), "hole should close");
    assert_eq!(polygon.holes[0].len(), 5);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $index:literal) => {
        #[scenario(path = "tests/features/ring_assembly.feature", index = $index)]
        fn $fn_name(
            segments: RefCell<Vec<Segment>>,
            rings: RefCell<Vec<Ring>>,
            polygon: RefCell<Option<AssembledPolygon>>,
        ) {
            let _ = (segments, rings, polygon);
        }
    };
}

register_scenario!(stitching_four_ways, 0);
register_scenario!(keeping_disjoint_squares_apart, 1);
register_scenario!(tolerating_coordinate_noise, 2);
register_scenario!(emitting_open_ring, 3);
register_scenario!(assembling_holes_for_single_outer_way, 4);
