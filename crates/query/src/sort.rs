use std::borrow::Borrow;

use simtab_store::Entry;

/// Stable ascending sort by number of unique parameters.
pub fn sort_by_distinctiveness<E: Borrow<Entry>>(entries: &mut [E]) {
    entries.sort_by_key(|entry| Borrow::<Entry>::borrow(entry).unique_parameters().len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;
    use pretty_assertions::assert_eq;

    #[test]
    fn sorts_by_unique_count_keeping_ties_in_order() {
        let mut entries = vec![
            entry("three", &[("a", "1"), ("b", "1"), ("c", "1")]),
            entry("one", &[("a", "1")]),
            entry("two_first", &[("a", "1"), ("b", "1")]),
            entry("two_second", &[("x", "1"), ("y", "1")]),
        ];
        sort_by_distinctiveness(&mut entries);

        let order: Vec<&str> = entries.iter().map(|e| e.base_name()).collect();
        assert_eq!(order, vec!["one", "two_first", "two_second", "three"]);
    }

    #[test]
    fn sorts_references() {
        let owned = vec![entry("big", &[("a", "1"), ("b", "2")]), entry("small", &[])];
        let mut refs: Vec<&Entry> = owned.iter().collect();
        sort_by_distinctiveness(&mut refs);
        assert_eq!(refs[0].base_name(), "small");
    }
}
