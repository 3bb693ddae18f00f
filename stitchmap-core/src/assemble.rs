//! Greedy endpoint stitching of OSM member ways into rings.
//!
//! OSM encodes large polygons as relations whose member ways arrive in no
//! particular order or direction. [`RingAssembler`] rebuilds the loops by
//! repeatedly splicing the first unused way whose endpoint coincides with
//! either open end of the ring under construction.
//!
//! The assembler is pure: it copies its input, never fabricates points and
//! never fails. Rings that cannot be closed are emitted as they stand.

use log::debug;

use crate::geometry::{COINCIDENCE_EPSILON, Point, Ring, Role, Segment, coincident, is_closed_run};

/// Stitches point runs into rings by matching endpoints within a tolerance.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stitchmap_core::RingAssembler;
///
/// let pt = |x, y| Coord { x, y };
/// let a = vec![pt(0.0, 0.0), pt(1.0, 0.0)];
/// let b = vec![pt(1.0, 0.0), pt(1.0, 1.0)];
/// let c = vec![pt(0.0, 1.0), pt(0.0, 0.0)];
/// let d = vec![pt(1.0, 1.0), pt(0.0, 1.0)];
///
/// let rings = RingAssembler::new().assemble([a, b, c, d]);
/// assert_eq!(rings.len(), 1);
/// assert!(rings[0].is_closed());
/// assert_eq!(rings[0].len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingAssembler {
    epsilon: f64,
}

impl Default for RingAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// A ring together with the input positions stitched into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRing {
    /// The stitched ring.
    pub ring: Ring,
    /// Input indices consumed by this ring, in splice order. The seed comes first.
    pub members: Vec<usize>,
}

/// Outer shells and holes assembled independently from one relation.
///
/// Renderers fill `outer` and `holes` together with an even-odd rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssembledPolygon {
    /// Rings built from outer members.
    pub outer: Vec<Ring>,
    /// Rings built from inner members.
    pub holes: Vec<Ring>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Splice {
    /// Ring end meets candidate start.
    Append,
    /// Ring end meets candidate end.
    AppendReversed,
    /// Ring start meets candidate end.
    Prepend,
    /// Ring start meets candidate start.
    PrependReversed,
}

impl RingAssembler {
    /// Assembler using [`COINCIDENCE_EPSILON`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            epsilon: COINCIDENCE_EPSILON,
        }
    }

    /// Assembler with a custom per-axis tolerance in degrees.
    #[must_use]
    pub const fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Tolerance used for endpoint matching.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Stitch point runs of a single role into rings.
    ///
    /// Empty runs are discarded. An empty input yields no rings.
    pub fn assemble<I, S>(&self, runs: I) -> Vec<Ring>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Point]>,
    {
        self.assemble_indexed(runs)
            .into_iter()
            .map(|assembled| assembled.ring)
            .collect()
    }

    /// Stitch point runs into rings, reporting which inputs formed each ring.
    ///
    /// Indices refer to positions in `runs`, including discarded empty runs,
    /// and every index appears in at most one ring.
    pub fn assemble_indexed<I, S>(&self, runs: I) -> Vec<AssembledRing>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[Point]>,
    {
        let runs: Vec<S> = runs.into_iter().collect();
        let mut unused: Vec<(usize, &[Point])> = runs
            .iter()
            .map(<S as AsRef<[Point]>>::as_ref)
            .enumerate()
            .filter(|(_, points)| !points.is_empty())
            .collect();

        let mut rings = Vec::new();
        while !unused.is_empty() {
            // `unused` stays sorted by input index, so the seed is the lowest one.
            let (seed_index, seed) = unused.remove(0);
            let mut points = seed.to_vec();
            let mut members = vec![seed_index];

            while !is_closed_run(&points, self.epsilon) {
                let found = unused.iter().enumerate().find_map(|(slot, (_, candidate))| {
                    self.find_splice(&points, candidate)
                        .map(|splice| (slot, splice))
                });
                let Some((slot, splice)) = found else {
                    break;
                };
                let (index, candidate) = unused.remove(slot);
                apply_splice(&mut points, candidate, splice);
                members.push(index);
            }

            rings.push(AssembledRing {
                ring: Ring::from(points),
                members,
            });
        }

        debug!(
            "assembled {} rings from {} runs ({} closed)",
            rings.len(),
            runs.len(),
            rings.iter().filter(|r| r.ring.is_closed()).count()
        );
        rings
    }

    /// Assemble outer and inner members of one relation independently.
    ///
    /// Holes are always assembled, even when there is a single outer way.
    /// Segments with [`Role::Other`] are ignored.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use stitchmap_core::{RingAssembler, Segment};
    ///
    /// let pt = |x, y| Coord { x, y };
    /// let shell = Segment::outer(vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 4.0), pt(0.0, 0.0)]);
    /// let hole_a = Segment::inner(vec![pt(1.0, 1.0), pt(2.0, 1.0), pt(2.0, 2.0)]);
    /// let hole_b = Segment::inner(vec![pt(2.0, 2.0), pt(1.0, 1.0)]);
    ///
    /// let polygon = RingAssembler::new().assemble_polygon(&[shell, hole_a, hole_b]);
    /// assert_eq!(polygon.outer.len(), 1);
    /// assert_eq!(polygon.holes.len(), 1);
    /// assert!(polygon.holes[0].is_closed());
    /// ```
    #[must_use]
    pub fn assemble_polygon(&self, segments: &[Segment]) -> AssembledPolygon {
        AssembledPolygon {
            outer: self.assemble(runs_with_role(segments, Role::Outer)),
            holes: self.assemble(runs_with_role(segments, Role::Inner)),
        }
    }

    fn find_splice(&self, ring: &[Point], candidate: &[Point]) -> Option<Splice> {
        let (ring_first, ring_last) = (*ring.first()?, *ring.last()?);
        let (cand_first, cand_last) = (*candidate.first()?, *candidate.last()?);
        let eps = self.epsilon;

        if coincident(ring_last, cand_first, eps) {
            Some(Splice::Append)
        } else if coincident(ring_last, cand_last, eps) {
            Some(Splice::AppendReversed)
        } else if coincident(ring_first, cand_last, eps) {
            Some(Splice::Prepend)
        } else if coincident(ring_first, cand_first, eps) {
            Some(Splice::PrependReversed)
        } else {
            None
        }
    }
}

/// Assemble segments that share one role using the default tolerance.
///
/// Segments tagged [`Role::Other`] are skipped; callers split outer and inner
/// members before calling this, or use [`RingAssembler::assemble_polygon`].
#[must_use]
pub fn assemble_rings(segments: &[Segment]) -> Vec<Ring> {
    RingAssembler::new().assemble(
        segments
            .iter()
            .filter(|segment| segment.role != Role::Other)
            .map(|segment| segment.points.as_slice()),
    )
}

fn runs_with_role(segments: &[Segment], role: Role) -> impl Iterator<Item = &[Point]> {
    segments
        .iter()
        .filter(move |segment| segment.role == role)
        .map(|segment| segment.points.as_slice())
}

/// Join `candidate` onto `ring`, dropping the one duplicated junction point.
fn apply_splice(ring: &mut Vec<Point>, candidate: &[Point], splice: Splice) {
    match splice {
        Splice::Append => {
            ring.pop();
            ring.extend_from_slice(candidate);
        }
        Splice::AppendReversed => {
            ring.pop();
            ring.extend(candidate.iter().rev().copied());
        }
        Splice::Prepend => {
            let head = candidate.split_last().map_or(&[][..], |(_, rest)| rest);
            prepend(ring, head.iter().copied());
        }
        Splice::PrependReversed => {
            let tail = candidate.split_first().map_or(&[][..], |(_, rest)| rest);
            prepend(ring, tail.iter().rev().copied());
        }
    }
}

fn prepend(ring: &mut Vec<Point>, head: impl ExactSizeIterator<Item = Point>) {
    let mut joined = Vec::with_capacity(head.len() + ring.len());
    joined.extend(head);
    joined.append(ring);
    *ring = joined;
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn pt(x: f64, y: f64) -> Point {
        Coord { x, y }
    }

    fn run(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| pt(x, y)).collect()
    }

    #[fixture]
    fn assembler() -> RingAssembler {
        RingAssembler::new()
    }

    #[rstest]
    fn empty_input_yields_no_rings(assembler: RingAssembler) {
        let rings = assembler.assemble(Vec::<Vec<Point>>::new());
        assert!(rings.is_empty());
    }

    #[rstest]
    fn empty_runs_are_discarded(assembler: RingAssembler) {
        let rings = assembler.assemble_indexed([Vec::new(), run(&[(0.0, 0.0), (1.0, 0.0)])]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].members, vec![1]);
    }

    #[rstest]
    fn closed_single_run_is_returned_unchanged(assembler: RingAssembler) {
        let square = run(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let rings = assembler.assemble([square.clone()]);
        assert_eq!(rings, vec![Ring::from(square)]);
    }

    #[rstest]
    #[case::append(
        run(&[(0.0, 0.0), (1.0, 0.0)]),
        run(&[(1.0, 0.0), (2.0, 0.0)]),
        run(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
    )]
    #[case::append_reversed(
        run(&[(0.0, 0.0), (1.0, 0.0)]),
        run(&[(2.0, 0.0), (1.0, 0.0)]),
        run(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
    )]
    #[case::prepend(
        run(&[(1.0, 0.0), (2.0, 0.0)]),
        run(&[(0.0, 0.0), (1.0, 0.0)]),
        run(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
    )]
    #[case::prepend_reversed(
        run(&[(1.0, 0.0), (2.0, 0.0)]),
        run(&[(1.0, 0.0), (0.0, 0.0)]),
        run(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
    )]
    fn splices_each_adjacency_case(
        assembler: RingAssembler,
        #[case] seed: Vec<Point>,
        #[case] candidate: Vec<Point>,
        #[case] expected: Vec<Point>,
    ) {
        let rings = assembler.assemble([seed, candidate]);
        assert_eq!(rings, vec![Ring::from(expected)]);
    }

    #[rstest]
    fn candidate_order_beats_adjacency_case(assembler: RingAssembler) {
        // Candidate 1 only touches the ring start, candidate 2 the ring end.
        // All four cases are tried per candidate, so index order decides.
        let seed = run(&[(1.0, 0.0), (2.0, 0.0)]);
        let touches_start = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let touches_end = run(&[(2.0, 0.0), (3.0, 0.0)]);
        let rings = assembler.assemble_indexed([seed, touches_start, touches_end]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].members, vec![0, 1, 2]);
    }

    #[rstest]
    fn lowest_index_candidate_wins_ties(assembler: RingAssembler) {
        let seed = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let first = run(&[(1.0, 0.0), (1.0, 1.0)]);
        let second = run(&[(1.0, 0.0), (1.0, -1.0)]);
        let rings = assembler.assemble_indexed([seed, first, second]);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].members, vec![0, 1]);
        assert_eq!(rings[1].members, vec![2]);
    }

    #[rstest]
    fn tolerates_endpoint_noise(assembler: RingAssembler) {
        let a = run(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let b = run(&[(1.00008, 1.00003), (0.0, 1.0), (0.00002, -0.00009)]);
        let rings = assembler.assemble([a, b]);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].is_closed());
        assert_eq!(rings[0].len(), 5);
    }

    #[rstest]
    fn closed_rings_that_touch_stay_separate(assembler: RingAssembler) {
        let left = run(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let right = run(&[(0.0, 0.0), (-1.0, 0.0), (-1.0, -1.0), (0.0, 0.0)]);
        let rings = assembler.assemble([left.clone(), right.clone()]);
        assert_eq!(rings, vec![Ring::from(left), Ring::from(right)]);
    }

    #[rstest]
    fn three_sided_chain_stitches_from_both_ends(assembler: RingAssembler) {
        let a = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = run(&[(1.0, 0.0), (1.0, 1.0)]);
        let c = run(&[(0.0, 1.0), (0.0, 0.0)]);
        let rings = assembler.assemble([a, b, c]);
        assert_eq!(
            rings,
            vec![Ring::from(run(&[
                (0.0, 1.0),
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0)
            ]))]
        );
    }

    #[rstest]
    fn unmatched_chain_is_emitted_open(assembler: RingAssembler) {
        let a = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = run(&[(1.0, 0.0), (2.0, 1.0)]);
        let rings = assembler.assemble([a, b]);
        assert_eq!(rings.len(), 1);
        assert!(!rings[0].is_closed());
    }

    #[rstest]
    fn single_point_run_becomes_degenerate_ring(assembler: RingAssembler) {
        let rings = assembler.assemble([run(&[(5.0, 5.0)])]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 1);
        assert!(!rings[0].is_fillable());
    }

    #[rstest]
    fn does_not_mutate_caller_input(assembler: RingAssembler) {
        let a = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = run(&[(2.0, 0.0), (1.0, 0.0)]);
        let input = vec![a.clone(), b.clone()];
        let _rings = assembler.assemble(&input);
        assert_eq!(input, vec![a, b]);
    }

    #[rstest]
    fn custom_epsilon_is_respected() {
        let a = run(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = run(&[(1.01, 0.0), (2.0, 0.0)]);
        assert_eq!(RingAssembler::new().assemble([&a, &b]).len(), 2);
        assert_eq!(RingAssembler::with_epsilon(0.05).assemble([&a, &b]).len(), 1);
    }

    #[rstest]
    fn polygon_assembles_holes_with_single_outer_way(assembler: RingAssembler) {
        let segments = vec![
            Segment::outer(run(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)])),
            Segment::inner(run(&[(1.0, 1.0), (2.0, 1.0)])),
            Segment::new(Role::Other, run(&[(2.0, 2.0)])),
            Segment::inner(run(&[(2.0, 2.0), (1.0, 1.0)])),
            Segment::inner(run(&[(2.0, 1.0), (2.0, 2.0)])),
        ];
        let polygon = assembler.assemble_polygon(&segments);
        assert_eq!(polygon.outer.len(), 1);
        assert_eq!(polygon.holes.len(), 1);
        assert!(polygon.holes[0].is_closed());
        assert_eq!(polygon.holes[0].len(), 4);
    }

    #[rstest]
    fn assemble_rings_skips_other_roles() {
        let segments = vec![
            Segment::new(Role::Other, run(&[(9.0, 9.0), (8.0, 8.0)])),
            Segment::outer(run(&[(0.0, 0.0), (1.0, 0.0)])),
        ];
        let rings = assemble_rings(&segments);
        assert_eq!(rings, vec![Ring::from(run(&[(0.0, 0.0), (1.0, 0.0)]))]);
    }
}
