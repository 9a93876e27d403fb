//! Agreement between recovered and ground-truth coordinates.

use crate::error::{Error, Result};

/// Ranks `1..=n` with ties given their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share ranks start+1..=end
        let avg = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = avg;
        }
        start = end;
    }
    ranks
}

/// Pearson correlation coefficient.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: (a.len(), 1),
            actual: (b.len(), 1),
        });
    }
    if a.len() < 2 {
        return Err(Error::InsufficientData(
            "correlation needs at least 2 samples".into(),
        ));
    }
    let n = a.len() as f64;
    let (ma, mb) = (a.iter().sum::<f64>() / n, b.iter().sum::<f64>() / n);
    let (mut cov, mut va, mut vb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    if va == 0.0 || vb == 0.0 {
        return Err(Error::DegenerateInput(
            "correlation undefined for a constant sample".into(),
        ));
    }
    Ok(cov / (va.sqrt() * vb.sqrt()))
}

/// Spearman rank correlation: Pearson on average ranks.
pub fn spearman(a: &[f64], b: &[f64]) -> Result<f64> {
    pearson(&average_ranks(a), &average_ranks(b))
}
