//! Numeric summaries shared by the descriptors and the cleaning stage.

use crate::schema::enums::OutlierDetectingScheme;

const Z_SCORE_LIMIT: f64 = 3.0;
const IQR_FACTOR: f64 = 1.5;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Linear-interpolated quantile, `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Inclusive range outside of which a value counts as an outlier.
///
/// Returns `None` when the values have no spread, so constant columns never
/// produce outliers.
pub fn outlier_bounds(values: &[f64], scheme: OutlierDetectingScheme) -> Option<(f64, f64)> {
    let bounds = match scheme {
        OutlierDetectingScheme::ZScore => {
            let mu = mean(values)?;
            let sigma = std_dev(values)?;
            if sigma == 0.0 || !sigma.is_finite() {
                return None;
            }
            (mu - Z_SCORE_LIMIT * sigma, mu + Z_SCORE_LIMIT * sigma)
        }
        OutlierDetectingScheme::Iqr => {
            let q1 = quantile(values, 0.25)?;
            let q3 = quantile(values, 0.75)?;
            let iqr = q3 - q1;
            if iqr == 0.0 || !iqr.is_finite() {
                return None;
            }
            (q1 - IQR_FACTOR * iqr, q3 + IQR_FACTOR * iqr)
        }
    };
    Some(bounds)
}
