use serde::Serialize;

/// Count and share of one bucket in a fixed, ordered breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry<K> {
    pub bucket: K,
    pub count: usize,
    /// `count / total * 100`, unrounded; 0 when the population is empty.
    pub percentage: f64,
}

impl<K> DistributionEntry<K> {
    pub fn rounded_percentage(&self) -> u8 {
        self.percentage.round().clamp(0.0, 100.0) as u8
    }
}

/// Buckets `values` into `buckets`, preserving bucket order.
///
/// Values matching no bucket still count toward the total, so percentages only
/// sum to 100 when every value is covered.
pub fn aggregate_distribution<K, I>(values: I, buckets: &[K]) -> Vec<DistributionEntry<K>>
where
    K: Copy + PartialEq,
    I: IntoIterator<Item = K>,
{
    let values: Vec<K> = values.into_iter().collect();
    let total = values.len();

    buckets
        .iter()
        .map(|&bucket| {
            let count = values.iter().filter(|value| **value == bucket).count();
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            DistributionEntry {
                bucket,
                count,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_population_yields_zero_everywhere() {
        let entries = aggregate_distribution(Vec::<u8>::new(), &[1, 2, 3]);
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert_eq!(entry.count, 0);
            assert_eq!(entry.percentage, 0.0);
            assert!(!entry.percentage.is_nan());
        }
    }

    #[test]
    fn uncovered_values_dilute_percentages() {
        let entries = aggregate_distribution(vec!['a', 'b', 'z', 'z'], &['a', 'b']);
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[0].percentage, 25.0);
        assert_eq!(entries[1].percentage, 25.0);
    }
}
