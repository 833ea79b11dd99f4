use std::f32::consts::PI;

use crate::types::Vec3;

/// Fibonacci-sphere placement: `n` points spread near-uniformly over a sphere of `radius`.
///
/// Pure and restartable; point `i` depends only on `(i, n)`, so every call with a new
/// `n` moves all points, not just the last one.
pub fn compute_positions(n: usize, radius: f32) -> Vec<Vec3> {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let total = n.max(1) as f32;
    (0..n)
        .map(|i| {
            // the half-step offset keeps the first and last points off the poles
            let t = (i as f32 + 0.5) / total;
            let inclination = (1.0 - 2.0 * t).acos();
            let azimuth = golden_angle * i as f32;
            let (sin_inc, cos_inc) = inclination.sin_cos();
            Vec3::new(
                radius * sin_inc * azimuth.cos(),
                radius * sin_inc * azimuth.sin(),
                radius * cos_inc,
            )
        })
        .collect()
}
