//! Pearson correlation with two-tailed t-test significance.
//!
//! Missing data is handled pairwise: each pair of columns is correlated over the rows where
//! both values are present, so sample sizes differ from cell to cell of a matrix. Degenerate
//! input (fewer than three pairs, or a constant column) yields [`CorrelationResult::none`]
//! instead of an error.

use crate::distribution::two_tailed_p;
use linkboard_model::{CellLookup, Value};
use serde::Serialize;

pub const DEFAULT_ALPHA: f64 = 0.05;

/// `|r|` is clamped to this before computing the t-statistic so `sqrt(1 - r²)` stays non-zero.
pub const MAX_ABS_R: f64 = 0.9999;

/// Matrices wider than this log a performance warning.
pub const LARGE_MATRIX_ATTRIBUTES: usize = 50;

const MIN_PAIRS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Pearson coefficient in `[-1, 1]` (clamped to `±MAX_ABS_R`).
    pub r: f64,
    /// Two-tailed p-value in `[0, 1]`.
    pub p: f64,
    /// Number of complete pairs used.
    pub n: usize,
    pub significant: bool,
}

impl CorrelationResult {
    /// The "no correlation" result reported for insufficient or degenerate data.
    pub fn none(n: usize) -> Self {
        Self {
            r: 0.0,
            p: 1.0,
            n,
            significant: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct KahanSum {
    sum: f64,
    c: f64,
}

impl KahanSum {
    fn add(&mut self, x: f64) {
        let y = x - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    fn value(self) -> f64 {
        self.sum
    }
}

/// Pearson r over complete pairs, or `None` when either variable has zero (or non-finite)
/// variance.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len() as f64;

    let mut sum_x = KahanSum::default();
    let mut sum_y = KahanSum::default();
    for &(x, y) in pairs {
        sum_x.add(x);
        sum_y.add(y);
    }
    let mean_x = sum_x.value() / n;
    let mean_y = sum_y.value() / n;

    let mut sxy = KahanSum::default();
    let mut sxx = KahanSum::default();
    let mut syy = KahanSum::default();
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy.add(dx * dy);
        sxx.add(dx * dx);
        syy.add(dy * dy);
    }

    let (sxx, syy) = (sxx.value(), syy.value());
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    let r = sxy.value() / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then_some(r)
}

/// Correlates `x` and `y` index-wise and tests `H0: ρ = 0`.
///
/// Elements convert through `Into<Option<f64>>`, so both `&[f64]` and `&[Option<f64>]` are
/// accepted. A pair is dropped when either side is `None` or NaN; extra elements of the longer
/// slice are ignored.
///
/// # Example
/// ```
/// use linkboard_stats::{correlation_with_p_value, DEFAULT_ALPHA};
///
/// let result = correlation_with_p_value(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0], DEFAULT_ALPHA);
/// assert!(result.r > 0.999);
/// assert!(result.significant);
/// ```
pub fn correlation_with_p_value<X, Y>(x: &[X], y: &[Y], alpha: f64) -> CorrelationResult
where
    X: Copy + Into<Option<f64>>,
    Y: Copy + Into<Option<f64>>,
{
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(&xi, &yi)| match (xi.into(), yi.into()) {
            (Some(xi), Some(yi)) if !xi.is_nan() && !yi.is_nan() => Some((xi, yi)),
            _ => None,
        })
        .collect();

    let n = pairs.len();
    if n < MIN_PAIRS {
        return CorrelationResult::none(n);
    }

    let Some(r) = pearson(&pairs) else {
        return CorrelationResult::none(n);
    };
    let r = r.clamp(-MAX_ABS_R, MAX_ABS_R);

    let df = (n - 2) as f64;
    let t = r * df.sqrt() / (1.0 - r * r).sqrt();
    let p = two_tailed_p(t, df);

    CorrelationResult {
        r,
        p,
        n,
        significant: p < alpha,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub matrix: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
    pub sample_sizes: Vec<Vec<usize>>,
    pub attributes: Vec<String>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn index_of(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    /// The cell for an attribute pair (e.g. a drill-down selection), re-tested against `alpha`.
    pub fn pair(&self, x: &str, y: &str, alpha: f64) -> Option<CorrelationResult> {
        let i = self.index_of(x)?;
        let j = self.index_of(y)?;
        let p = self.p_values[i][j];
        Some(CorrelationResult {
            r: self.matrix[i][j],
            p,
            n: self.sample_sizes[i][j],
            significant: p < alpha,
        })
    }
}

/// Numeric view of one column: numbers and numeric text; everything else is missing.
fn numeric_column<R: CellLookup>(rows: &[R], column: &str) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| row.cell(column).and_then(Value::to_number))
        .collect()
}

/// Pairwise correlation of every attribute against every other.
///
/// The diagonal is fixed to `r = 1, p = 0, n = rows.len()`. Each off-diagonal pair is computed
/// once and mirrored, so the matrices are exactly symmetric.
pub fn compute_correlation_matrix<R, A>(rows: &[R], attributes: &[A]) -> CorrelationMatrix
where
    R: CellLookup,
    A: AsRef<str>,
{
    let k = attributes.len();
    if k > LARGE_MATRIX_ATTRIBUTES {
        log::warn!(
            "computing correlation matrix for {k} attributes ({} correlations); this may take a moment",
            k * k
        );
    }

    let columns: Vec<Vec<Option<f64>>> = attributes
        .iter()
        .map(|a| numeric_column(rows, a.as_ref()))
        .collect();

    let mut matrix = vec![vec![0.0; k]; k];
    let mut p_values = vec![vec![0.0; k]; k];
    let mut sample_sizes = vec![vec![0usize; k]; k];

    for i in 0..k {
        matrix[i][i] = 1.0;
        p_values[i][i] = 0.0;
        sample_sizes[i][i] = rows.len();

        for j in (i + 1)..k {
            let result = correlation_with_p_value(&columns[i], &columns[j], DEFAULT_ALPHA);
            matrix[i][j] = result.r;
            matrix[j][i] = result.r;
            p_values[i][j] = result.p;
            p_values[j][i] = result.p;
            sample_sizes[i][j] = result.n;
            sample_sizes[j][i] = result.n;
        }
    }

    CorrelationMatrix {
        matrix,
        p_values,
        sample_sizes,
        attributes: attributes.iter().map(|a| a.as_ref().to_string()).collect(),
    }
}
