use std::f64::consts::TAU;

use crate::geom::{
    FiberBundle, FrameError, PolylineSet, SamplingGrid, ShapeParams, TilingError, Vec3,
    centerline, fiber_curves, fiber_point, yarn_curves,
};

const SHAPE: ShapeParams = ShapeParams::new(0.2, 1.0, 0.3);

#[test]
fn parameters_tile_loops_in_order() {
    let grid = SamplingGrid::new(1, 2, 4, 0.0);
    let ts: Vec<f64> = grid.parameters().collect();
    assert_eq!(ts.len(), 8);
    assert_eq!(ts[0], 0.0);
    assert_eq!(ts[1], TAU / 4.0);
    assert_eq!(ts[4], TAU);
    assert_eq!(ts[7], TAU + (TAU / 4.0) * 3.0);
}

#[test]
fn yarn_single_loop_has_one_polyline() {
    let grid = SamplingGrid::new(1, 1, 4, 1.5);
    let (set, diag) = yarn_curves(grid, SHAPE).expect("valid grid");

    assert_eq!(set.vertex_count(), 4);
    assert_eq!(set.polylines, vec![vec![0, 1, 2, 3]]);
    assert_eq!(diag.vertex_count, 4);
    assert_eq!(diag.polyline_count, 1);
    assert!(diag.is_clean());
    assert_eq!(set.points[0], centerline(0.0, SHAPE));
}

#[test]
fn yarn_rows_are_shifted_along_wale() {
    let grid = SamplingGrid::new(3, 2, 8, 2.5);
    let (set, _) = yarn_curves(grid, SHAPE).unwrap();

    assert_eq!(set.polyline_count(), 3);
    for row in 0..3 {
        let base: Vec<Vec3> = set.polyline_points(0).collect();
        let shifted: Vec<Vec3> = set.polyline_points(row).collect();
        assert_eq!(shifted.len(), 16);
        for (p, q) in base.iter().zip(&shifted) {
            assert_eq!(p.x, q.x);
            assert_eq!(p.z, q.z);
            assert!((q.y - p.y - 2.5 * row as f64).abs() < 1e-12);
        }
    }
}

#[test]
fn polylines_are_contiguous_and_non_overlapping() {
    let grid = SamplingGrid::new(2, 3, 5, 1.0);
    let bundle = FiberBundle::new(0.05, 6.0, 4);
    let (set, diag) = fiber_curves(grid, SHAPE, bundle).unwrap();

    assert_eq!(set.polyline_count(), 8);
    assert_eq!(set.vertex_count(), 2 * 4 * 3 * 5);
    assert_eq!(diag.samples_per_polyline, 15);
    assert!(diag.max_frame_error < 1e-9);

    let mut expected = 0;
    for polyline in &set.polylines {
        assert_eq!(polyline.len(), 15);
        for &index in polyline {
            assert_eq!(index, expected);
            expected += 1;
        }
    }
}

#[test]
fn fiber_traversal_is_row_then_fiber() {
    let grid = SamplingGrid::new(2, 1, 6, 3.0);
    let bundle = FiberBundle::new(0.1, 5.0, 3);
    let (set, _) = fiber_curves(grid, SHAPE, bundle).unwrap();

    // Polyline 1 is row 0, fiber 1; polyline 4 is row 1, fiber 1.
    let first = set.points[set.polylines[1][0]];
    assert_eq!(first, fiber_point(0.0, SHAPE, bundle.fiber(1)).unwrap());

    let lifted = set.points[set.polylines[4][0]];
    assert_eq!(lifted.x, first.x);
    assert!((lifted.y - first.y - 3.0).abs() < 1e-12);
    assert_eq!(bundle.fiber(1).phase, TAU / 3.0);
}

#[test]
fn zero_radius_bundle_traces_the_yarn() {
    let grid = SamplingGrid::new(2, 2, 7, 1.25);
    let (yarn, _) = yarn_curves(grid, SHAPE).unwrap();
    let (fibers, _) = fiber_curves(grid, SHAPE, FiberBundle::new(0.0, 9.0, 2)).unwrap();

    for row in 0..2 {
        let yarn_row: Vec<Vec3> = yarn.polyline_points(row).collect();
        for fiber in 0..2 {
            let fiber_row: Vec<Vec3> = fibers.polyline_points(row * 2 + fiber).collect();
            assert_eq!(yarn_row, fiber_row);
        }
    }
}

#[test]
fn empty_loops_produce_empty_polylines_with_warning() {
    let (set, diag) = yarn_curves(SamplingGrid::new(2, 0, 4, 1.0), SHAPE).unwrap();
    assert_eq!(set.vertex_count(), 0);
    assert_eq!(set.polylines, vec![Vec::<usize>::new(), Vec::new()]);
    assert!(!diag.is_clean());
}

#[test]
fn invalid_sampling_is_rejected() {
    assert_eq!(
        yarn_curves(SamplingGrid::new(1, 1, 0, 0.0), SHAPE),
        Err(TilingError::ZeroSamplesPerLoop)
    );
    assert_eq!(
        fiber_curves(SamplingGrid::new(1, 1, 4, 0.0), SHAPE, FiberBundle::new(0.1, 1.0, 0)),
        Err(TilingError::ZeroFibers)
    );
    assert_eq!(
        fiber_curves(SamplingGrid::new(1, 1, 4, 0.0), SHAPE, FiberBundle::new(-0.1, 1.0, 2)),
        Err(TilingError::InvalidRadius(-0.1))
    );
    assert!(matches!(
        yarn_curves(SamplingGrid::new(1, 1, 4, f64::NAN), SHAPE),
        Err(TilingError::NonFiniteRowOffset(_))
    ));
    assert!(matches!(
        yarn_curves(SamplingGrid::new(1, 1, 4, 0.0), ShapeParams::new(f64::NAN, 1.0, 0.0)),
        Err(TilingError::NonFiniteShape { .. })
    ));
}

#[test]
fn degenerate_shape_fails_fiber_tiling() {
    let result = fiber_curves(
        SamplingGrid::new(1, 1, 4, 0.0),
        ShapeParams::new(0.0, 0.0, 0.0),
        FiberBundle::new(0.1, 1.0, 3),
    );
    assert!(matches!(
        result,
        Err(TilingError::Frame(FrameError::DegenerateNormal { t, .. })) if t == 0.0
    ));
}

#[test]
fn from_strips_numbers_points_in_order() {
    let set = PolylineSet::from_strips(vec![
        vec![Vec3::X, Vec3::Y],
        vec![],
        vec![Vec3::Z],
    ]);
    assert_eq!(set.points, vec![Vec3::X, Vec3::Y, Vec3::Z]);
    assert_eq!(set.polylines, vec![vec![0, 1], vec![], vec![2]]);
    assert_eq!(set.polyline_points(2).collect::<Vec<_>>(), vec![Vec3::Z]);
    assert_eq!(set.polyline_points(9).count(), 0);
}

#[test]
fn overflowing_counts_are_rejected() {
    assert!(matches!(
        yarn_curves(SamplingGrid::new(0, usize::MAX, 2, 0.0), SHAPE),
        Err(TilingError::GridTooLarge { rows: 0, loops: usize::MAX, .. })
    ));
    assert!(matches!(
        fiber_curves(SamplingGrid::new(usize::MAX, 0, 4, 0.0), SHAPE, FiberBundle::new(0.1, 1.0, 2)),
        Err(TilingError::GridTooLarge { polylines_per_row: 2, .. })
    ));
    assert_eq!(SamplingGrid::new(3, 2, 5, 0.0).checked_point_count(4), Ok(120));
}

#[test]
fn zero_rows_give_empty_output() {
    let (set, diag) =
        fiber_curves(SamplingGrid::new(0, 3, 8, 1.0), SHAPE, FiberBundle::new(0.1, 2.0, 4)).unwrap();
    assert_eq!(set, PolylineSet::default());
    assert_eq!(diag.samples_per_polyline, 24);
    assert!(diag.is_clean());
}

/// Fiber set built one point at a time, in traversal order, on the calling thread.
fn fibers_stitched_serially(grid: SamplingGrid, bundle: FiberBundle) -> PolylineSet {
    let mut strips = Vec::new();
    for row in 0..grid.rows {
        let y0 = grid.row_shift(row);
        for index in 0..bundle.count {
            let fiber = bundle.fiber(index);
            let strip: Vec<Vec3> = grid
                .parameters()
                .map(|t| {
                    let p = fiber_point(t, SHAPE, fiber).unwrap();
                    Vec3::new(p.x, p.y + y0, p.z)
                })
                .collect();
            strips.push(strip);
        }
    }
    PolylineSet::from_strips(strips)
}

#[test]
fn fiber_tiling_matches_serial_stitching() {
    let grid = SamplingGrid::new(3, 2, 12, 1.75);
    let bundle = FiberBundle::new(0.07, 5.0, 6);
    let (set, _) = fiber_curves(grid, SHAPE, bundle).unwrap();
    assert_eq!(set, fibers_stitched_serially(grid, bundle));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_tiling_matches_serial_stitching() {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let grid = SamplingGrid::new(4, 3, 16, 1.5);
    let bundle = FiberBundle::new(0.05, 7.0, 5);

    let (set, diag) = pool.install(|| fiber_curves(grid, SHAPE, bundle)).unwrap();
    assert_eq!(set, fibers_stitched_serially(grid, bundle));
    assert_eq!(diag.polyline_count, 20);

    let (yarn, _) = pool.install(|| yarn_curves(grid, SHAPE)).unwrap();
    let (zero_radius, _) =
        pool.install(|| fiber_curves(grid, SHAPE, FiberBundle::new(0.0, 7.0, 1))).unwrap();
    assert_eq!(yarn, zero_radius);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_tiling_reports_serial_error() {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let flat = ShapeParams::new(0.0, 0.0, 0.0);
    let serial = crate::geom::frenet_frame(0.0, flat).map(|_| ()).unwrap_err();

    let parallel = pool.install(|| {
        fiber_curves(SamplingGrid::new(6, 2, 8, 1.0), flat, FiberBundle::new(0.1, 1.0, 4))
    });
    assert_eq!(parallel, Err(TilingError::Frame(serial)));
}
