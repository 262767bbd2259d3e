//! Deterministic index-modulo splits.
//!
//! The upstream extraction step emits records in page order, already well
//! mixed, so the splits stride over the sequence instead of shuffling:
//! every fifth record is held out and the rest train. Re-running training
//! on the same data always yields the same partition.

use crate::data::dataset::Dataset;

/// An owned slice of the learning data.
#[derive(Debug, Clone)]
pub struct Subset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl Subset {
    fn with_capacity(capacity: usize) -> Subset {
        Subset {
            features: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, features: &[f64], label: f64) {
        self.features.push(features.to_vec());
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Two-way split: records with `index % 5 == 0` form the held-out set, the
/// rest train. For N records training gets exactly `N - ceil(N / 5)`.
pub fn holdout_split(dataset: &Dataset) -> (Subset, Subset) {
    let n = dataset.len();
    let mut train = Subset::with_capacity(n - n.div_ceil(5));
    let mut holdout = Subset::with_capacity(n.div_ceil(5));
    for i in 0..n {
        let target = if i % 5 == 0 { &mut holdout } else { &mut train };
        target.push(&dataset.features[i], dataset.labels[i]);
    }
    (train, holdout)
}

/// Three-way split: the held-out fifth is further divided by index parity —
/// even indices become validation, odd become test. Returns
/// `(train, validation, test)`.
pub fn three_way_split(dataset: &Dataset) -> (Subset, Subset, Subset) {
    let n = dataset.len();
    let held = n.div_ceil(5);
    let mut train = Subset::with_capacity(n - held);
    let mut validation = Subset::with_capacity(held / 2 + 1);
    let mut test = Subset::with_capacity(held / 2 + 1);
    for i in 0..n {
        let target = if i % 5 != 0 {
            &mut train
        } else if i % 2 == 0 {
            &mut validation
        } else {
            &mut test
        };
        target.push(&dataset.features[i], dataset.labels[i]);
    }
    (train, validation, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> Dataset {
        Dataset {
            features: (0..n).map(|i| vec![i as f64]).collect(),
            labels: (0..n).map(|i| (i % 2) as f64).collect(),
        }
    }

    #[test]
    fn holdout_takes_every_fifth_record() {
        let (train, holdout) = holdout_split(&dataset(10));
        assert_eq!(train.len(), 8);
        assert_eq!(holdout.len(), 2);
        // indices 0 and 5
        assert_eq!(holdout.features[0], vec![0.0]);
        assert_eq!(holdout.features[1], vec![5.0]);
    }

    #[test]
    fn split_sizes_match_for_ragged_counts() {
        for n in [1, 4, 5, 6, 11, 99, 100, 101] {
            let (train, holdout) = holdout_split(&dataset(n));
            let held = n.div_ceil(5);
            assert_eq!(holdout.len(), held, "n = {n}");
            assert_eq!(train.len(), n - held, "n = {n}");
        }
    }

    #[test]
    fn split_is_deterministic() {
        let ds = dataset(50);
        let (a_train, a_holdout) = holdout_split(&ds);
        let (b_train, b_holdout) = holdout_split(&ds);
        assert_eq!(a_train.features, b_train.features);
        assert_eq!(a_holdout.labels, b_holdout.labels);
    }

    #[test]
    fn three_way_divides_the_heldout_fifth_by_parity() {
        let (train, validation, test) = three_way_split(&dataset(20));
        assert_eq!(train.len(), 16);
        // held out: 0, 5, 10, 15 → even indices 0, 10 validate; odd 5, 15 test
        assert_eq!(validation.features, vec![vec![0.0], vec![10.0]]);
        assert_eq!(test.features, vec![vec![5.0], vec![15.0]]);
    }

    #[test]
    fn three_way_preserves_every_record() {
        for n in [1, 7, 25, 103] {
            let (train, validation, test) = three_way_split(&dataset(n));
            assert_eq!(train.len() + validation.len() + test.len(), n, "n = {n}");
        }
    }

    #[test]
    fn labels_stay_aligned_with_features() {
        let ds = dataset(30);
        let (train, _, _) = three_way_split(&ds);
        for (f, l) in train.features.iter().zip(train.labels.iter()) {
            let original_index = f[0] as usize;
            assert_eq!(*l, (original_index % 2) as f64);
        }
    }
}
