//! Aggregate statistics over measurement columns.
//!
//! Every function returns `None` when no input qualifies, so callers can tell
//! "undefined" apart from a genuine zero.

// ---------------------------------------------------------------------------
// Weighted mean
// ---------------------------------------------------------------------------

/// `Σ value·weight / Σ weight` over pairs where both sides are present.
///
/// Zero weights qualify but contribute nothing. Negative or non-finite
/// weights and non-finite values are skipped. Returns `None` when the total
/// weight is zero.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let (sum, total) = pairs
        .into_iter()
        .filter_map(|(value, weight)| Some((value?, weight?)))
        .filter(|(v, w)| v.is_finite() && w.is_finite() && *w >= 0.0)
        .fold((0.0, 0.0), |(sum, total), (v, w)| (sum + v * w, total + w));

    (total > 0.0).then(|| sum / total)
}

// ---------------------------------------------------------------------------
// Median
// ---------------------------------------------------------------------------

/// Plain median; NaNs are ignored. Even counts average the two middle values.
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

// ---------------------------------------------------------------------------
// Weighted median
// ---------------------------------------------------------------------------

/// Median of the multiset in which each value occurs `floor(multiplicity)`
/// times.
///
/// Pairs with a missing side, a NaN value, or a multiplicity that is
/// non-finite or below one are dropped. The multiset is never materialised:
/// the pairs are sorted once and the middle rank is found on the cumulative
/// counts, so memory stays proportional to the number of pairs.
pub fn weighted_median<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let mut counted: Vec<(f64, u64)> = pairs
        .into_iter()
        .filter_map(|(value, multiplicity)| {
            let (v, m) = (value?, multiplicity?);
            if v.is_nan() || !m.is_finite() || m < 1.0 {
                return None;
            }
            // `as` saturates, which only matters far beyond any copy number.
            Some((v, m.trunc() as u64))
        })
        .collect();

    if counted.is_empty() {
        return None;
    }
    counted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let cumulative: Vec<u128> = counted
        .iter()
        .scan(0u128, |acc, &(_, n)| {
            *acc += u128::from(n);
            Some(*acc)
        })
        .collect();
    let total = *cumulative.last()?;

    let value_at = |rank: u128| counted[cumulative.partition_point(|&c| c <= rank)].0;

    if total % 2 == 1 {
        Some(value_at(total / 2))
    } else {
        Some((value_at(total / 2 - 1) + value_at(total / 2)) / 2.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn expanded_median(pairs: &[(f64, f64)]) -> Option<f64> {
        let expanded: Vec<f64> = pairs
            .iter()
            .flat_map(|&(v, w)| std::iter::repeat(v).take(w.trunc() as usize))
            .collect();
        median(expanded)
    }

    proptest! {
        #[test]
        fn weighted_mean_is_bounded(
            pairs in proptest::collection::vec((1.0f64..1e5, 0.0f64..1e6), 1..50)
        ) {
            let lo = pairs.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
            let hi = pairs.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
            let input = pairs.iter().map(|&(v, w)| (Some(v), Some(w)));
            if let Some(m) = weighted_mean(input) {
                prop_assert!(m >= lo * (1.0 - 1e-12) && m <= hi * (1.0 + 1e-12));
            }
        }

        #[test]
        fn weighted_median_matches_expansion(
            pairs in proptest::collection::vec((1u32..500, 0.0f64..20.0), 0..30)
        ) {
            let pairs: Vec<(f64, f64)> = pairs.into_iter().map(|(v, w)| (f64::from(v), w)).collect();
            let input = pairs.iter().map(|&(v, w)| (Some(v), Some(w)));
            prop_assert_eq!(weighted_median(input), expanded_median(&pairs));
        }
    }
}
