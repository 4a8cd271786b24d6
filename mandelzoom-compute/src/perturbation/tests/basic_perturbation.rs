use super::helpers::{compute_direct, dd, offset, params};
use crate::{compute_pixel_perturbation, NoObserver, ReferenceOrbit};
use mandelzoom_core::{DDComplex, ExtendedReal, Iterations, StdComplex, DEFAULT_ENGINE_CONFIG};

#[test]
fn perturbation_origin_in_set() {
    // Reference at (-0.5, 0), pixel (0, 0) is in the set
    let orbit = ReferenceOrbit::compute(dd(-0.5, 0.0), 1000, &DEFAULT_ENGINE_CONFIG);

    let result = compute_pixel_perturbation::<StdComplex, _>(
        &orbit,
        &dd(0.0, 0.0),
        &params(1000),
        &mut NoObserver,
    );

    assert_eq!(result.iterations, Iterations::BoundedToMax);
    assert_eq!(result.iteration_count(), 1000);
}

#[test]
fn perturbation_far_point_escapes() {
    // Reference at (-0.5, 0), pixel (2, 0): z = 0, 2, 6
    let orbit = ReferenceOrbit::compute(dd(-0.5, 0.0), 1000, &DEFAULT_ENGINE_CONFIG);

    let result = compute_pixel_perturbation::<StdComplex, _>(
        &orbit,
        &dd(2.0, 0.0),
        &params(1000),
        &mut NoObserver,
    );

    assert_eq!(result.iterations, Iterations::Escaped(2));
}

#[test]
fn perturbation_matches_direct_for_nearby_point() {
    let orbit = ReferenceOrbit::compute(dd(-0.5, 0.0), 500, &DEFAULT_ENGINE_CONFIG);
    let pixel = dd(-0.49, 0.01);

    let perturbed =
        compute_pixel_perturbation::<StdComplex, _>(&orbit, &pixel, &params(500), &mut NoObserver);
    let direct = compute_direct(&pixel, 500);

    assert_eq!(perturbed.iterations, direct.iterations);
    assert!(!perturbed.rebased);
}

#[test]
fn pixel_escaping_before_reference_is_not_rebased() {
    // Reference 0.2501 escapes at 312; pixel 0.2505 escapes at 139
    let orbit = ReferenceOrbit::compute(dd(0.2501, 0.0), 2000, &DEFAULT_ENGINE_CONFIG);
    assert_eq!(orbit.escaped_at(), Some(312));

    let pixel = dd(0.2505, 0.0);
    let result =
        compute_pixel_perturbation::<StdComplex, _>(&orbit, &pixel, &params(2000), &mut NoObserver);

    assert_eq!(result.iterations, Iterations::Escaped(139));
    assert_eq!(result.iterations, compute_direct(&pixel, 2000).iterations);
    assert!(!result.rebased);
}

#[test]
fn delta_types_agree_on_deep_pixels() {
    let center = DDComplex::new(
        ExtendedReal::from_f64(-0.743_643_887),
        ExtendedReal::from_f64(0.131_825_904_3),
    );
    let orbit = ReferenceOrbit::compute(center, 2000, &DEFAULT_ENGINE_CONFIG);
    let step = 2e-9 / 8.0;

    for i in 0..8 {
        let pixel = offset(&center, (i as f64 - 3.5) * step, (3.5 - i as f64) * step);
        let f64_delta =
            compute_pixel_perturbation::<StdComplex, _>(&orbit, &pixel, &params(2000), &mut NoObserver);
        let dd_delta =
            compute_pixel_perturbation::<DDComplex, _>(&orbit, &pixel, &params(2000), &mut NoObserver);
        let diff = f64_delta.iteration_count().abs_diff(dd_delta.iteration_count());
        assert!(diff <= 1, "pixel {}: {:?} vs {:?}", i, f64_delta, dd_delta);
    }
}

#[test]
fn bounded_pixel_reports_last_magnitude() {
    let orbit = ReferenceOrbit::compute(dd(-0.5, 0.0), 100, &DEFAULT_ENGINE_CONFIG);
    let pixel = dd(-0.5, 0.0);
    let result =
        compute_pixel_perturbation::<StdComplex, _>(&orbit, &pixel, &params(100), &mut NoObserver);

    let last = orbit.points()[99].z_norm_sq.to_f64();
    assert_eq!(result.iterations, Iterations::BoundedToMax);
    assert!((result.final_magnitude_sq - last).abs() < 1e-15);
    assert_eq!(result.smooth_iteration, None);
}
