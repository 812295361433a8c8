//! Rolling sample standard deviation.
//!
//! STDDEV(n)[i] = sqrt(sum((X[i-j] - mean)^2 for j in 0..n) / (n - 1))
//! The window must hold n defined values; any `None` inside it yields `None`.

pub fn calculate_rolling_stddev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }

        let window: Option<Vec<f64>> = values[i + 1 - period..=i].iter().copied().collect();
        let value = window.map(|w| {
            let mean = w.iter().sum::<f64>() / period as f64;
            let variance = w
                .iter()
                .map(|x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            variance.sqrt()
        });
        out.push(value);
    }

    out
}
