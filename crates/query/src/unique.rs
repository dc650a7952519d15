use std::borrow::{Borrow, BorrowMut};
use std::collections::HashMap;

use simtab_store::Entry;

/// How often each `(key, value)` occurs across a set of entries
#[derive(Debug, Clone, Default)]
pub struct ParameterContext {
    counts: HashMap<(String, String), usize>,
    len: usize,
}

impl ParameterContext {
    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Borrow<Entry>,
    {
        let mut context = Self::default();
        for entry in entries {
            context.len += 1;
            for (key, value) in Borrow::<Entry>::borrow(&entry).parameters() {
                *context
                    .counts
                    .entry((key.clone(), value.clone()))
                    .or_insert(0) += 1;
            }
        }
        context
    }

    /// Number of entries in the context
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `key = value` is unique unless every context entry carries it.
    /// Nothing is unique in an empty context.
    #[must_use]
    pub fn is_unique(&self, key: &str, value: &str) -> bool {
        if self.len == 0 {
            return false;
        }
        let count = self
            .counts
            .get(&(key.to_string(), value.to_string()))
            .copied()
            .unwrap_or(0);
        count < self.len
    }
}

/// Recompute every entry's unique parameters relative to `context`.
pub fn compute_unique<E: BorrowMut<Entry>>(entries: &mut [E], context: &ParameterContext) {
    for entry in entries.iter_mut() {
        BorrowMut::<Entry>::borrow_mut(entry)
            .compute_unique_with(|key, value| context.is_unique(key, value));
    }
}

/// [`compute_unique`] with `entries` as their own context.
pub fn compute_unique_within<E: BorrowMut<Entry>>(entries: &mut [E]) {
    let context = ParameterContext::from_entries(entries.iter().map(Borrow::<Entry>::borrow));
    log::debug!(
        "Computing unique parameters over {} entries ({} distinct pairs)",
        context.len(),
        context.counts.len()
    );
    compute_unique(entries, &context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, params};
    use pretty_assertions::assert_eq;

    #[test]
    fn shared_parameters_are_not_unique() {
        let mut entries = vec![
            entry("run", &[("a", "1"), ("b", "2")]),
            entry("run", &[("a", "1"), ("b", "3")]),
        ];
        compute_unique_within(&mut entries);
        assert_eq!(entries[0].unique_parameters(), &params(&[("b", "2")]));
        assert_eq!(entries[1].unique_parameters(), &params(&[("b", "3")]));
    }

    #[test]
    fn context_can_differ_from_targets() {
        let context_entries = vec![
            entry("run", &[("a", "1")]),
            entry("run", &[("a", "1"), ("c", "5")]),
        ];
        let context = ParameterContext::from_entries(&context_entries);

        let mut targets = vec![entry("other", &[("a", "1"), ("c", "5"), ("d", "0")])];
        compute_unique(&mut targets, &context);
        assert_eq!(
            targets[0].unique_parameters(),
            &params(&[("c", "5"), ("d", "0")])
        );
    }

    #[test]
    fn empty_context_marks_nothing() {
        let mut targets = vec![entry("run", &[("a", "1")])];
        compute_unique(&mut targets, &ParameterContext::default());
        assert!(targets[0].unique_parameters().is_empty());
    }

    #[test]
    fn single_entry_has_no_unique_parameters() {
        let mut entries = vec![entry("run", &[("a", "1")])];
        compute_unique_within(&mut entries);
        assert!(entries[0].unique_parameters().is_empty());
    }

    #[test]
    fn works_on_mutable_references() {
        let mut owned = vec![entry("x", &[("a", "1")]), entry("y", &[("a", "2")])];
        let mut refs: Vec<&mut Entry> = owned.iter_mut().collect();
        compute_unique_within(&mut refs);
        assert_eq!(owned[1].unique_parameters(), &params(&[("a", "2")]));
    }
}
