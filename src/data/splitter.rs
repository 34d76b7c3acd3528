// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Deterministically permutes the labelled examples and splits
// them into two disjoint sets that together cover the input:
//   - Training set: used to update model weights
//   - Test set:     held out, used only for accuracy
//
// Rounding convention:
//   n_test  = ceil(test_fraction × n)
//   n_train = n − n_test
//   e.g. n = 2, test_fraction = 0.2 → 1 test, 1 train
//
// The permutation comes from a StdRng seeded with `seed`, so
// the same input and seed always give the same split. The first
// n_test permuted items form the test set.
//
// No stratification: label balance per split is not guaranteed.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Sizes (train, test) for `total` items under the ceil convention.
pub fn split_sizes(total: usize, test_fraction: f64) -> Result<(usize, usize)> {
    if !(0.0..1.0).contains(&test_fraction) {
        bail!("test fraction must be in [0, 1), got {test_fraction}");
    }
    let n_test  = ((total as f64) * test_fraction).ceil() as usize;
    let n_test  = n_test.min(total);
    let n_train = total - n_test;
    if n_train == 0 {
        bail!(
            "cannot split {total} example(s) with test fraction {test_fraction}: \
             the training set would be empty"
        );
    }
    Ok((n_train, n_test))
}

/// Seeded shuffle of `samples`, then split into (train, test).
///
/// # Example
/// ```ignore
/// let (train, test) = split_train_test(all_samples, 0.2, 42)?;
/// // train has 80% of samples, test has 20% (rounded up)
/// ```
pub fn split_train_test<T>(
    mut samples:   Vec<T>,
    test_fraction: f64,
    seed:          u64,
) -> Result<(Vec<T>, Vec<T>)> {
    let total = samples.len();
    let (n_train, n_test) = split_sizes(total, test_fraction)?;

    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    // split_off(n) keeps [0..n) in place and returns [n..total)
    let train = samples.split_off(n_test);
    let test  = samples;

    tracing::debug!(
        "Dataset split: {} training, {} test ({}% / {}%)",
        n_train,
        n_test,
        (n_train * 100) / total.max(1),
        (n_test  * 100) / total.max(1),
    );

    Ok((train, test))
}
