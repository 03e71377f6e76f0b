use std::f64::consts::{FRAC_PI_2, TAU};

use crate::geom::{
    FrameError, ParametricCurve, ShapeParams, Tolerance, Vec3, frenet_frame, frenet_frame_at,
};

const SHAPES: [ShapeParams; 3] = [
    ShapeParams::new(0.2, 1.0, 0.3),
    ShapeParams::new(0.35, 1.5, 0.6),
    ShapeParams::new(-0.1, 0.8, 0.2),
];

/// Circular helix with a textbook Frenet frame.
struct Helix {
    radius: f64,
    pitch: f64,
}

impl ParametricCurve for Helix {
    fn point_at(&self, t: f64) -> Vec3 {
        Vec3::new(self.radius * t.cos(), self.radius * t.sin(), self.pitch * t)
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        Vec3::new(-self.radius * t.sin(), self.radius * t.cos(), self.pitch)
    }

    fn second_derivative_at(&self, t: f64) -> Vec3 {
        Vec3::new(-self.radius * t.cos(), -self.radius * t.sin(), 0.0)
    }

    fn shape(&self) -> ShapeParams {
        ShapeParams::new(0.0, 0.0, 0.0)
    }
}

#[test]
fn frames_are_orthonormal_and_right_handed() {
    let tol = Tolerance::default_geom();
    for shape in SHAPES {
        for i in 0..200 {
            let t = -TAU + 0.0731 * f64::from(i);
            let frame = frenet_frame(t, shape).expect("non-degenerate shape");

            assert!(tol.approx_eq_f64(frame.tangent.length(), 1.0));
            assert!(tol.approx_eq_f64(frame.normal.length(), 1.0));
            assert!(tol.approx_eq_f64(frame.binormal.length(), 1.0));
            assert!(frame.tangent.dot(frame.normal).abs() < 1e-9, "t = {t}");
            assert!(frame.tangent.dot(frame.binormal).abs() < 1e-9);
            assert!(frame.normal.dot(frame.binormal).abs() < 1e-9);
            assert!(tol.approx_eq_vec3(frame.binormal, frame.tangent.cross(frame.normal)));
            assert!(frame.orthonormality_error() < 1e-9);
        }
    }
}

#[test]
fn tangent_follows_curve_direction() {
    let shape = SHAPES[0];
    let frame = frenet_frame(0.0, shape).unwrap();
    assert!(Tolerance::new(1e-12).approx_eq_vec3(frame.tangent, Vec3::X));

    // At t = 0 the curve bends toward -Y and -Z (γ'' = (0, -h, -4d)).
    let expected_normal = Vec3::new(0.0, -1.0, -1.2).normalized().unwrap();
    assert!(Tolerance::new(1e-12).approx_eq_vec3(frame.normal, expected_normal));
}

#[test]
fn frames_vary_continuously() {
    let shape = SHAPES[0];
    let step = TAU / 512.0;
    let mut previous = frenet_frame(0.0, shape).unwrap();
    for i in 1..=1024 {
        let frame = frenet_frame(step * f64::from(i), shape).unwrap();
        assert!(previous.tangent.dot(frame.tangent) > 0.5);
        assert!(previous.normal.dot(frame.normal) > 0.5, "normal flipped at sample {i}");
        previous = frame;
    }
}

#[test]
fn generic_solver_reproduces_helix_frame() {
    let helix = Helix { radius: 2.0, pitch: 0.5 };
    let speed = (2.0_f64 * 2.0 + 0.5 * 0.5).sqrt();
    let tol = Tolerance::new(1e-12);

    for t in [0.0, 0.3, FRAC_PI_2, 2.0, 5.5] {
        let frame = frenet_frame_at(&helix, t).unwrap();
        let (s, c) = t.sin_cos();
        assert!(tol.approx_eq_vec3(frame.tangent, Vec3::new(-2.0 * s, 2.0 * c, 0.5) / speed));
        assert!(tol.approx_eq_vec3(frame.normal, Vec3::new(-c, -s, 0.0)));
        assert!(tol.approx_eq_vec3(frame.binormal, Vec3::new(0.5 * s, -0.5 * c, 2.0) / speed));
    }
}

#[test]
fn straight_curve_has_degenerate_normal() {
    let flat = ShapeParams::new(0.0, 0.0, 0.0);
    let err = frenet_frame(0.5, flat).unwrap_err();
    assert_eq!(err, FrameError::DegenerateNormal { t: 0.5, a: 0.0, h: 0.0, d: 0.0 });
    assert!(err.to_string().contains("t = 0.5"));
}

#[test]
fn cusp_has_degenerate_tangent() {
    // x' = 1 + 2a·cos(2t) vanishes at t = 0 when a = -1/2, and y', z' vanish there too.
    let cusp = ShapeParams::new(-0.5, 1.0, 0.3);
    assert!(matches!(
        frenet_frame(0.0, cusp),
        Err(FrameError::DegenerateTangent { t, a, .. }) if t == 0.0 && a == -0.5
    ));
    assert!(frenet_frame(1.0, cusp).is_ok());
}

#[test]
fn non_finite_inputs_are_rejected() {
    assert!(matches!(
        frenet_frame(f64::NAN, SHAPES[0]),
        Err(FrameError::NonFiniteParameter(_))
    ));
    assert!(matches!(
        frenet_frame(1.0, ShapeParams::new(0.2, f64::INFINITY, 0.3)),
        Err(FrameError::NonFiniteShape { .. })
    ));
}
