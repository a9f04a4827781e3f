//! Pure numeric kernels behind the derived statistics.  Every function takes
//! slices, allocates its own output, and never mutates input.  Degenerate
//! inputs (short or zero-variance sequences) produce documented neutral
//! values instead of NaN or errors, so downstream chart code never has to
//! special-case them.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Correlation and regression
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient by the sum-of-products formula.
/// Returns 0 for sequences shorter than 2 or with zero variance.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let x = &x[..n];
    let y = &y[..n];

    let nf = n as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let denom = ((nf * sum_x2 - sum_x * sum_x) * (nf * sum_y2 - sum_y * sum_y)).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (nf * sum_xy - sum_x * sum_y) / denom
}

/// Least-squares line fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Simple linear regression of `y` on `x`.  All-zero result for sequences
/// shorter than 2 or a degenerate (zero-variance) predictor.
pub fn regression(x: &[f64], y: &[f64]) -> Regression {
    let n = x.len().min(y.len());
    if n < 2 {
        return Regression::default();
    }
    let x = &x[..n];
    let y = &y[..n];

    let nf = n as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();

    let denom = nf * sum_x2 - sum_x * sum_x;
    if denom == 0.0 || !denom.is_finite() {
        return Regression::default();
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;
    let r = correlation(x, y);

    Regression {
        slope,
        intercept,
        r_squared: r * r,
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive summary of one numeric sequence.  Variance and standard
/// deviation are population figures (divide by n).  Quartiles are the sorted
/// values at `floor(n·q)`, positional rather than interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptive {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summarize a sequence; `None` for empty input.
pub fn describe(values: &[f64]) -> Option<Descriptive> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let quartile = |q: f64| sorted[((nf * q) as usize).min(n - 1)];

    Some(Descriptive {
        count: n,
        mean,
        variance,
        std_dev: variance.sqrt(),
        min: sorted[0],
        q1: quartile(0.25),
        median: quartile(0.5),
        q3: quartile(0.75),
        max: sorted[n - 1],
    })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Linear rescale to [0, 100].  A zero-range input maps every element to 0.
pub fn normalize_min_max(values: &[f64]) -> Vec<f64> {
    let (min, max) = match describe(values) {
        Some(d) => (d.min, d.max),
        None => return Vec::new(),
    };
    let range = max - min;
    if range == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range * 100.0).collect()
}

/// Standard-score rescale.  Zero standard deviation maps every element to 0.
pub fn normalize_z_score(values: &[f64]) -> Vec<f64> {
    let d = match describe(values) {
        Some(d) => d,
        None => return Vec::new(),
    };
    if d.std_dev == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - d.mean) / d.std_dev).collect()
}

// ---------------------------------------------------------------------------
// Outlier detection
// ---------------------------------------------------------------------------

/// Indices of values outside the Tukey fences
/// `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`.  A zero-variance sequence flags nothing.
pub fn detect_outliers(values: &[f64]) -> Vec<usize> {
    let d = match describe(values) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let iqr = d.q3 - d.q1;
    let lower = d.q1 - 1.5 * iqr;
    let upper = d.q3 + 1.5 * iqr;

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v < lower || **v > upper)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn correlation_is_symmetric_and_self_correlation_is_one() {
        let x = [1.0, 2.0, 3.0, 5.0];
        let y = [2.0, 1.0, 4.0, 6.0];
        assert!(close(correlation(&x, &y), correlation(&y, &x)));
        assert!(close(correlation(&x, &x), 1.0));
    }

    #[test]
    fn degenerate_correlation_is_zero() {
        assert_eq!(correlation(&[1.0], &[2.0]), 0.0);
        assert_eq!(correlation(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn regression_fits_an_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = regression(&x, &y);
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.r_squared, 1.0));
    }

    #[test]
    fn regression_of_degenerate_input_is_all_zero() {
        assert_eq!(regression(&[1.0], &[2.0]), Regression::default());
        assert_eq!(
            regression(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]),
            Regression::default()
        );
    }

    #[test]
    fn describe_uses_population_stddev_and_floor_quartiles() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(close(d.mean, 2.5));
        assert!(close(d.std_dev, 1.118033988749895));
        assert_eq!(d.q1, 2.0);
        assert_eq!(d.median, 3.0);
        assert_eq!(d.q3, 4.0);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        assert_eq!(d.count, 4);
    }

    #[test]
    fn describe_of_empty_input_is_none() {
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn min_max_normalization_stays_in_bounds() {
        let out = normalize_min_max(&[5.0, 10.0, 7.5, -2.0]);
        assert!(out.iter().all(|v| (0.0..=100.0).contains(v)));
        assert!(close(out[1], 100.0));
        assert!(close(out[3], 0.0));
    }

    #[test]
    fn zero_range_normalizes_to_zero() {
        assert_eq!(normalize_min_max(&[4.0, 4.0, 4.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(normalize_z_score(&[4.0, 4.0, 4.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn z_scores_have_zero_mean() {
        let out = normalize_z_score(&[1.0, 2.0, 3.0, 4.0]);
        let mean: f64 = out.iter().sum::<f64>() / out.len() as f64;
        assert!(close(mean, 0.0));
    }

    #[test]
    fn tukey_fences_flag_the_stray_point() {
        let mut values = vec![10.0, 11.0, 12.0, 10.5, 11.5, 12.5, 10.2, 11.8];
        values.push(100.0);
        let outliers = detect_outliers(&values);
        assert_eq!(outliers, vec![8]);
    }

    #[test]
    fn zero_variance_flags_nothing() {
        assert!(detect_outliers(&[7.0; 12]).is_empty());
    }
}
