use approx::{assert_abs_diff_eq, assert_relative_eq};
use resi_core::{
    estimate_residue, resolve_constant, BuiltinEvaluator, ComplexValue, NoProgress, ResiError,
    ResidueRequest,
};

fn residue(function: &str, center: (f64, f64), radius: f64, digits: u32) -> ComplexValue {
    let request = ResidueRequest::new(
        function,
        ComplexValue::new(center.0, center.1),
        radius,
        digits,
    );
    estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap()
}

fn error_from(value: &ComplexValue, expected: (f64, f64)) -> f64 {
    (value - &ComplexValue::new(expected.0, expected.1)).magnitude()
}

#[test]
fn test_reciprocal_at_origin_any_radius() {
    for radius in [0.01, 0.5, 1.0, 7.0] {
        for digits in [3, 4] {
            let r = residue("1/z", (0.0, 0.0), radius, digits);
            assert_relative_eq!(r.real(), 1.0, max_relative = 1e-3);
            assert_abs_diff_eq!(r.imaginary(), 0.0, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_reciprocal_at_extreme_radii() {
    // |w|^2 over- or underflows for these radii unless division rescales first
    for radius in [1e-200, 1e-170, 1e-100, 1e100, 1e160, 1e200] {
        let r = residue("1/z", (0.0, 0.0), radius, 3);
        assert_eq!(r.to_display_string(), "1.0000+0.0000i", "radius {radius:e}");
    }
}

#[test]
fn test_canonical_display() {
    let r = residue("1/z", (0.0, 0.0), 1.0, 5);
    assert_eq!(r.to_display_string(), "1.0000+0.0000i");
}

#[test]
fn test_center_resolved_from_text() {
    let center = resolve_constant(&BuiltinEvaluator, "0").unwrap();
    let request = ResidueRequest::new("1/z", center, 1.0, 3);
    let r = estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap();
    assert_abs_diff_eq!(r.real(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_analytic_function_has_zero_residue() {
    for (center, radius) in [((0.0, 0.0), 1.0), ((1.0, -2.0), 0.3), ((-4.5, 3.0), 2.0)] {
        let r = residue("z", center, radius, 3);
        assert_abs_diff_eq!(r.magnitude(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_shifted_and_weighted_poles() {
    let r = residue("1/(z-1)", (1.0, 0.0), 0.5, 3);
    assert_abs_diff_eq!(error_from(&r, (1.0, 0.0)), 0.0, epsilon = 1e-9);

    let r = residue("3/(z-I)", (0.0, 1.0), 0.25, 3);
    assert_abs_diff_eq!(error_from(&r, (3.0, 0.0)), 0.0, epsilon = 1e-9);

    // residue of 1/(z^2+1) at -i is i/2
    let r = residue("1/(z^2+1)", (0.0, -1.0), 0.5, 3);
    assert_abs_diff_eq!(error_from(&r, (0.0, 0.5)), 0.0, epsilon = 1e-9);
}

#[test]
fn test_second_order_pole() {
    // exp(z)/z^2 = 1/z^2 + 1/z + ...
    let r = residue("exp(z)/z^2", (0.0, 0.0), 0.5, 3);
    assert_abs_diff_eq!(error_from(&r, (1.0, 0.0)), 0.0, epsilon = 1e-9);

    let r = residue("sin(z)/z^2", (0.0, 0.0), 0.5, 3);
    assert_abs_diff_eq!(error_from(&r, (1.0, 0.0)), 0.0, epsilon = 1e-9);
}

#[test]
fn test_radius_invariance() {
    // poles at 0 (residue -1/2) and 2; both radii exclude the second
    let small = residue("1/(z*(z-2))", (0.0, 0.0), 0.5, 3);
    let large = residue("1/(z*(z-2))", (0.0, 0.0), 1.0, 3);
    assert_abs_diff_eq!(small.real(), large.real(), epsilon = 1e-9);
    assert_abs_diff_eq!(small.imaginary(), large.imaginary(), epsilon = 1e-9);
    assert_abs_diff_eq!(small.real(), -0.5, epsilon = 1e-9);
}

#[test]
fn test_error_non_increasing_with_precision_at_origin() {
    let errors: Vec<f64> = [2, 3, 5]
        .into_iter()
        .map(|digits| error_from(&residue("1/z", (0.0, 0.0), 1.0, digits), (1.0, 0.0)))
        .collect();
    // the integrand is constant here, so only rounding noise remains
    for pair in errors.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-9, "{errors:?}");
    }
}

#[test]
fn test_error_decreases_with_precision_off_center() {
    // the pole sits near the contour, so few samples converge slowly
    let errors: Vec<f64> = [1, 2, 3]
        .into_iter()
        .map(|digits| error_from(&residue("1/z", (0.95, 0.0), 1.0, digits), (1.0, 0.0)))
        .collect();
    assert!(errors[0] > errors[1], "{errors:?}");
    assert!(errors[1] > errors[2], "{errors:?}");
    assert!(errors[2] < 1e-9, "{errors:?}");
}

#[test]
fn test_validation_errors() {
    for radius in [0.0, -1.0] {
        let request = ResidueRequest::new("1/z", ComplexValue::zero(), radius, 3);
        let err = estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap_err();
        assert!(matches!(err, ResiError::InvalidRadius(_)));
    }

    let request = ResidueRequest::new("1/z", ComplexValue::zero(), 1.0, 0);
    let err = estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap_err();
    assert!(matches!(err, ResiError::InvalidPrecision(0)));
}

#[test]
fn test_malformed_function_text() {
    for text in ["((1/z)", "1/z)", "1/", "sin()", "foo(z)"] {
        let request = ResidueRequest::new(text, ComplexValue::zero(), 1.0, 2);
        let err = estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap_err();
        assert!(
            matches!(err, ResiError::MalformedFunction { .. }),
            "{text}: {err:?}"
        );
        assert_eq!(err.user_message(), "Please check your input syntax");
    }
}
