//! Two-group segregation and diversity indices over areal units.
//!
//! The classic evenness measures computed from per-unit population counts of
//! two groups: the index of dissimilarity D (share of either group that would
//! have to relocate for an even distribution) and Theil's information theory
//! index H (entropy deviation of unit compositions from the area-wide one).
//! Both lie in [0, 1]: 0 means every unit mirrors the area-wide composition,
//! 1 means complete separation.

use regio_core::{RegioError, RegioResult};

fn validate_counts(a: &[f64], b: &[f64]) -> RegioResult<(f64, f64)> {
    if a.len() != b.len() {
        return Err(RegioError::Validation(format!(
            "group count vectors have different lengths ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(RegioError::Validation("no units supplied".into()));
    }
    if a.iter().chain(b).any(|&v| !v.is_finite() || v < 0.0) {
        return Err(RegioError::Validation(
            "group counts must be finite and non-negative".into(),
        ));
    }
    let total_a: f64 = a.iter().sum();
    let total_b: f64 = b.iter().sum();
    if total_a == 0.0 || total_b == 0.0 {
        return Err(RegioError::Validation(
            "each group must have a positive total count".into(),
        ));
    }
    Ok((total_a, total_b))
}

/// Index of dissimilarity: D = ½ Σ |aᵢ/A − bᵢ/B|.
pub fn dissimilarity_index(a: &[f64], b: &[f64]) -> RegioResult<f64> {
    let (total_a, total_b) = validate_counts(a, b)?;
    let d = 0.5
        * a.iter()
            .zip(b)
            .map(|(&ai, &bi)| (ai / total_a - bi / total_b).abs())
            .sum::<f64>();
    Ok(d)
}

/// Two-group entropy in nats; zero when one share is zero.
fn entropy(p: f64) -> f64 {
    let q = 1.0 - p;
    let mut e = 0.0;
    if p > 0.0 {
        e -= p * p.ln();
    }
    if q > 0.0 {
        e -= q * q.ln();
    }
    e
}

/// Theil's information theory index:
/// H = Σ tᵢ (E − Eᵢ) / (T · E), where E is the area-wide entropy and Eᵢ the
/// entropy of unit i's composition.
pub fn information_theory_index(a: &[f64], b: &[f64]) -> RegioResult<f64> {
    let (total_a, total_b) = validate_counts(a, b)?;
    let total = total_a + total_b;
    let area_entropy = entropy(total_a / total);
    // Both groups have positive totals, so area_entropy > 0 here.

    let mut h = 0.0;
    for (&ai, &bi) in a.iter().zip(b) {
        let t = ai + bi;
        if t == 0.0 {
            continue; // Empty units contribute nothing
        }
        let unit_entropy = entropy(ai / t);
        h += t * (area_entropy - unit_entropy);
    }
    Ok(h / (total * area_entropy))
}
