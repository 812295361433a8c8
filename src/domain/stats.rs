//! Numeric helpers: equal-width histograms and Pearson correlation.

/// Equal-width buckets over the observed value span.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub centers: Vec<f64>,
    pub counts: Vec<usize>,
    pub width: f64,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Buckets `values` into `bucket_count` equal-width bins spanning min..=max.
///
/// The maximum lands in the last bucket. When every value is equal the span
/// is zero and a single bucket centered on that value holds them all.
/// Non-finite values are ignored.
pub fn histogram(values: &[f64], bucket_count: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Histogram {
            centers: Vec::new(),
            counts: Vec::new(),
            width: 0.0,
        };
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span <= 0.0 {
        return Histogram {
            centers: vec![min],
            counts: vec![finite.len()],
            width: 0.0,
        };
    }

    let buckets = bucket_count.max(1);
    let width = span / buckets as f64;
    let mut counts = vec![0usize; buckets];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(buckets - 1);
        counts[idx] += 1;
    }

    let centers = (0..buckets)
        .map(|i| min + width * (i as f64 + 0.5))
        .collect();

    Histogram {
        centers,
        counts,
        width,
    }
}

/// Pearson correlation of two equal-length samples.
///
/// `None` when fewer than two pairs exist, lengths differ, or either side
/// has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn histogram_zero_variance_single_bucket() {
        let h = histogram(&[0.0, 0.0, 0.0, 0.0], 50);
        assert_eq!(h.counts, vec![4]);
        assert_eq!(h.centers, vec![0.0]);
        assert_eq!(h.width, 0.0);
    }

    #[test]
    fn histogram_empty_input() {
        let h = histogram(&[], 50);
        assert!(h.counts.is_empty());
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn histogram_max_lands_in_last_bucket() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_abs_diff_eq!(h.width, 1.0);
        assert_abs_diff_eq!(h.centers[0], 0.5);
        assert_abs_diff_eq!(h.centers[3], 3.5);
    }

    #[test]
    fn histogram_counts_sum_to_input_len() {
        let values: Vec<f64> = (0..97).map(|i| ((i * 37) % 11) as f64 * 0.013 - 0.05).collect();
        let h = histogram(&values, 50);
        assert_eq!(h.counts.len(), 50);
        assert_eq!(h.total(), values.len());
    }

    #[test]
    fn histogram_ignores_nan() {
        let h = histogram(&[1.0, f64::NAN, 2.0], 2);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn pearson_perfect_positive() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_perfect_negative() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert_abs_diff_eq!(r, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_undefined() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn pearson_needs_two_points() {
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }
}
