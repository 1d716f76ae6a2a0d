use statrs::distribution::{ContinuousCDF, StudentsT};

/// Degrees of freedom at which the t-distribution is replaced by the standard normal.
pub const NORMAL_APPROX_MIN_DF: f64 = 30.0;

/// Standard normal CDF, `P(Z <= x)`.
///
/// Uses the Abramowitz & Stegun 7.1.26 erf approximation (absolute error below 7.5e-8).
pub fn normal_cdf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * z);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let erf = 1.0 - poly * (-z * z).exp();

    0.5 * (1.0 + sign * erf)
}

/// Student-t CDF, `P(T <= t)` with `df` degrees of freedom.
///
/// For `df >= 30` the standard normal is used; below that the exact CDF (regularized
/// incomplete beta) is evaluated. Returns NaN for non-positive `df`.
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if df >= NORMAL_APPROX_MIN_DF {
        return normal_cdf(t);
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.cdf(t),
        Err(_) => f64::NAN,
    }
}

/// Two-tailed p-value `P(|T| >= |t|)`, clamped to `[0, 1]`. Undefined inputs yield `1`.
pub fn two_tailed_p(t: f64, df: f64) -> f64 {
    let abs_t = t.abs();
    let tail = if df >= NORMAL_APPROX_MIN_DF {
        1.0 - normal_cdf(abs_t)
    } else {
        // `sf` avoids the cancellation in `1 - cdf` for large |t|.
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => dist.sf(abs_t),
            Err(_) => f64::NAN,
        }
    };

    let p = 2.0 * tail;
    if p.is_nan() {
        return 1.0;
    }
    p.clamp(0.0, 1.0)
}
