use crate::Probability;
use rand::Rng;

/// Fold raw logits into a sampling distribution over the legal subset:
/// illegal slots get probability zero, legal slots get a softmax over
/// their logits. Returns None when the result would be degenerate --
/// nothing legal, or non-finite/negative mass after masking -- which
/// callers must treat as a deterministic fold. Kept free of any
/// network type so the masking rules are testable on bare slices.
pub fn masked_distribution(logits: &[f32], legal: &[bool]) -> Option<Vec<Probability>> {
    assert_eq!(logits.len(), legal.len());
    let peak = logits
        .iter()
        .zip(legal)
        .filter(|(_, l)| **l)
        .map(|(x, _)| *x)
        .fold(f32::NEG_INFINITY, f32::max);
    if !peak.is_finite() {
        return None;
    }
    let mut weights = logits
        .iter()
        .zip(legal)
        .map(|(x, l)| if *l { (x - peak).exp() } else { 0.0 })
        .collect::<Vec<Probability>>();
    let mass = weights.iter().sum::<Probability>();
    if !mass.is_finite() || mass <= 0.0 {
        return None;
    }
    for w in weights.iter_mut() {
        *w /= mass;
    }
    if weights.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return None;
    }
    Some(weights)
}

/// categorical draw from a normalized distribution; floating point
/// rounding falls back to the last slot carrying any mass
pub fn sample<R: Rng>(dist: &[Probability], rng: &mut R) -> usize {
    let mut threshold = rng.random::<f32>();
    for (i, p) in dist.iter().enumerate() {
        if threshold < *p {
            return i;
        }
        threshold -= p;
    }
    dist.iter()
        .rposition(|p| *p > 0.0)
        .unwrap_or(dist.len() - 1)
}
