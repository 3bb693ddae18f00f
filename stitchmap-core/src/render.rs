//! Paint features onto an abstract drawing surface.
//!
//! Canvas primitives stay outside this crate: anything implementing
//! [`Surface`] can receive paths. Projection from degrees to pixels is the
//! surface's business.

use crate::{Feature, Point, Ring};

/// Rule deciding which regions of a compound path are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// Regions crossed an odd number of times are filled, so holes punch out.
    EvenOdd,
    /// Regions with non-zero winding are filled.
    NonZero,
}

/// Drawing capability consumed by [`paint_feature`].
pub trait Surface {
    /// Start a new compound path.
    fn begin_path(&mut self);
    /// Start a new sub-path at `point`.
    fn move_to(&mut self, point: Point);
    /// Extend the current sub-path to `point`.
    fn line_to(&mut self, point: Point);
    /// Close the current sub-path.
    fn close_path(&mut self);
    /// Fill the current path.
    fn fill(&mut self, rule: FillRule);
    /// Stroke the current path.
    fn stroke(&mut self);
}

/// Split a point run wherever consecutive longitudes jump by more than 180°.
///
/// Such jumps cross the antimeridian; drawing them straight would smear a
/// line across the whole map. The input itself is left untouched.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stitchmap_core::render::split_at_antimeridian;
///
/// let run = [
///     Coord { x: 179.0, y: 0.0 },
///     Coord { x: 179.9, y: 1.0 },
///     Coord { x: -179.9, y: 1.0 },
///     Coord { x: -179.0, y: 0.0 },
/// ];
/// let parts = split_at_antimeridian(&run);
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].len(), 2);
/// assert_eq!(parts[1].len(), 2);
/// ```
#[must_use]
pub fn split_at_antimeridian(points: &[Point]) -> Vec<&[Point]> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut start = 0;
    for (index, pair) in points.windows(2).enumerate() {
        if let [a, b] = pair {
            if (a.x - b.x).abs() > 180.0 {
                parts.push(&points[start..=index]);
                start = index + 1;
            }
        }
    }
    parts.push(&points[start..]);
    parts
}

/// Paint one feature.
///
/// Area features trace every fillable ring and hole into a single path filled
/// with [`FillRule::EvenOdd`], then stroke the outline. Linear features are
/// only stroked. Rings are split at the antimeridian; split rings are left
/// open rather than closed across the map.
pub fn paint_feature<S: Surface + ?Sized>(surface: &mut S, feature: &Feature) {
    if feature.kind.is_area() {
        let fillable: Vec<&Ring> = feature
            .rings
            .iter()
            .chain(&feature.holes)
            .filter(|ring| ring.is_fillable())
            .collect();
        if fillable.is_empty() {
            return;
        }
        surface.begin_path();
        for ring in fillable {
            trace(surface, ring.points(), true);
        }
        surface.fill(FillRule::EvenOdd);
        surface.stroke();
    } else {
        surface.begin_path();
        for line in &feature.rings {
            trace(surface, line.points(), false);
        }
        surface.stroke();
    }
}

fn trace<S: Surface + ?Sized>(surface: &mut S, points: &[Point], close: bool) {
    let parts = split_at_antimeridian(points);
    let whole = parts.len() == 1;
    for part in parts {
        let Some((first, rest)) = part.split_first() else {
            continue;
        };
        surface.move_to(*first);
        for point in rest {
            surface.line_to(*point);
        }
        if close && whole {
            surface.close_path();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureKind;
    use crate::test_support::{points, square};
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Begin,
        Move(Point),
        Line(Point),
        Close,
        Fill(FillRule),
        Stroke,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn count(&self, wanted: fn(&Op) -> bool) -> usize {
            self.ops.iter().filter(|op| wanted(op)).count()
        }
    }

    impl Surface for Recorder {
        fn begin_path(&mut self) {
            self.ops.push(Op::Begin);
        }
        fn move_to(&mut self, point: Point) {
            self.ops.push(Op::Move(point));
        }
        fn line_to(&mut self, point: Point) {
            self.ops.push(Op::Line(point));
        }
        fn close_path(&mut self) {
            self.ops.push(Op::Close);
        }
        fn fill(&mut self, rule: FillRule) {
            self.ops.push(Op::Fill(rule));
        }
        fn stroke(&mut self) {
            self.ops.push(Op::Stroke);
        }
    }

    #[rstest]
    fn split_keeps_every_point() {
        let run = points(&[(170.0, 0.0), (-170.0, 0.0), (-160.0, 0.0), (175.0, 1.0)]);
        let parts = split_at_antimeridian(&run);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), run.len());
    }

    #[rstest]
    fn split_of_empty_run_is_empty() {
        assert!(split_at_antimeridian(&[]).is_empty());
    }

    #[rstest]
    fn area_with_hole_uses_one_even_odd_path() {
        let feature = Feature::new(FeatureKind::Water, vec![Ring::from(square(0.0, 0.0, 4.0))])
            .with_holes(vec![Ring::from(square(1.0, 1.0, 1.0))]);
        let mut recorder = Recorder::default();
        paint_feature(&mut recorder, &feature);

        assert_eq!(recorder.count(|op| matches!(op, Op::Begin)), 1);
        assert_eq!(recorder.count(|op| matches!(op, Op::Move(_))), 2);
        assert_eq!(recorder.count(|op| matches!(op, Op::Close)), 2);
        assert_eq!(
            recorder.count(|op| matches!(op, Op::Fill(FillRule::EvenOdd))),
            1
        );
    }

    #[rstest]
    fn degenerate_rings_are_not_filled() {
        let feature = Feature::new(
            FeatureKind::Park,
            vec![Ring::from(points(&[(0.0, 0.0), (1.0, 1.0)]))],
        );
        let mut recorder = Recorder::default();
        paint_feature(&mut recorder, &feature);
        assert!(recorder.ops.is_empty());
    }

    #[rstest]
    fn linear_features_are_stroked_only() {
        let feature = Feature::new(
            FeatureKind::Road,
            vec![Ring::from(points(&[(0.0, 0.0), (1.0, 1.0)]))],
        );
        let mut recorder = Recorder::default();
        paint_feature(&mut recorder, &feature);
        assert_eq!(
            recorder.ops,
            vec![
                Op::Begin,
                Op::Move(points(&[(0.0, 0.0)])[0]),
                Op::Line(points(&[(1.0, 1.0)])[0]),
                Op::Stroke,
            ]
        );
    }

    #[rstest]
    fn rings_crossing_antimeridian_stay_open() {
        let ring = Ring::from(points(&[
            (179.0, 0.0),
            (-179.0, 0.0),
            (-179.0, 1.0),
            (179.0, 1.0),
            (179.0, 0.0),
        ]));
        let feature = Feature::new(FeatureKind::Country, vec![ring]);
        let mut recorder = Recorder::default();
        paint_feature(&mut recorder, &feature);
        assert_eq!(recorder.count(|op| matches!(op, Op::Move(_))), 3);
        assert_eq!(recorder.count(|op| matches!(op, Op::Close)), 0);
    }
}
