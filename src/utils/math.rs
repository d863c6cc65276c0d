use num_traits::{Float, FloatConst};

/// Wraps an angle into `(-π, π]`.
pub fn normalize_angle<T: Float + FloatConst>(angle: T) -> T {
    let tau = T::TAU();
    let mut wrapped = angle % tau;
    if wrapped <= -T::PI() {
        wrapped = wrapped + tau;
    } else if wrapped > T::PI() {
        wrapped = wrapped - tau;
    }
    wrapped
}

/// Signed shortest rotation taking `current` onto `target`.
pub fn angle_error<T: Float + FloatConst>(target: T, current: T) -> T {
    normalize_angle(target - current)
}

/// Unnormalised gaussian, peaking at 1 when `x == mu`.
///
/// Non-finite distances (a ray that hits nothing) score zero instead of NaN.
pub fn gaussian_kernel<T: Float>(x: T, mu: T, sigma: T) -> T {
    if !x.is_finite() || !mu.is_finite() {
        return T::zero();
    }
    let two = T::one() + T::one();
    (-(x - mu) * (x - mu) / (two * sigma * sigma)).exp()
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn wraps_into_half_open_interval() {
        assert_abs_diff_eq!(normalize_angle(PI), PI);
        assert_abs_diff_eq!(normalize_angle(-PI), PI);
        assert_abs_diff_eq!(normalize_angle(3.0 * PI).cos(), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(TAU + FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-TAU - FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(0.0_f32), 0.0_f32);
    }

    #[test]
    fn accumulated_rotations_stay_in_range() {
        let steps = [0.7, 2.9, -5.3, 11.0, -0.01, 3.14159, 100.0, -250.5];
        let mut theta = 0.0_f64;
        let mut total = 0.0_f64;
        for _ in 0..50 {
            for step in steps {
                theta = normalize_angle(theta + step);
                total += step;
                assert!(theta > -PI && theta <= PI, "{theta} escaped (-pi, pi]");
            }
        }
        assert_abs_diff_eq!(theta.sin(), total.sin(), epsilon = 1e-6);
        assert_abs_diff_eq!(theta.cos(), total.cos(), epsilon = 1e-6);
    }

    #[test]
    fn angle_error_takes_short_way_round() {
        assert_abs_diff_eq!(angle_error(-3.0, 3.0), TAU - 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_error(FRAC_PI_2, 0.0), FRAC_PI_2);
    }

    #[test]
    fn kernel_peaks_at_mean() {
        assert_abs_diff_eq!(gaussian_kernel(84.0, 84.0, 2.5), 1.0);
        assert!(gaussian_kernel(0.0, 84.0, 2.5) < 1e-100);
        assert_eq!(gaussian_kernel(10.0, f64::INFINITY, 2.5), 0.0);
    }
}
