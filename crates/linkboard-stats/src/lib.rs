//! Correlation statistics for the dashboard's correlation-matrix card.
//!
//! - [`correlation_with_p_value`]: Pearson r, t-statistic and two-tailed p-value for one pair of
//!   columns, with pairwise removal of missing values.
//! - [`compute_correlation_matrix`]: the full symmetric r / p / n matrices over a row set.

#![forbid(unsafe_code)]

mod correlation;
mod distribution;

pub use crate::correlation::{
    compute_correlation_matrix, correlation_with_p_value, CorrelationMatrix, CorrelationResult,
    DEFAULT_ALPHA, LARGE_MATRIX_ATTRIBUTES, MAX_ABS_R,
};
pub use crate::distribution::{normal_cdf, t_cdf, two_tailed_p, NORMAL_APPROX_MIN_DF};
