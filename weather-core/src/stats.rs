use std::{collections::HashMap, hash::Hash};

/// Most frequent value in `values`, or `None` when empty.
///
/// Ties go to the value that reached the winning count first while scanning in
/// input order, so `[1, 2, 2, 3, 3]` yields `2`.
pub fn statistical_mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut best: Option<(T, usize)> = None;

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        *count += 1;

        let leads = match &best {
            Some((_, best_count)) => *count > *best_count,
            None => true,
        };
        if leads {
            best = Some((value, *count));
        }
    }

    best.map(|(value, _)| value)
}
