use std::borrow::Borrow;

use simtab_naming::ParameterMap;
use simtab_store::Entry;

/// Whether `entry` passes every keyword and every constraint.
///
/// Keywords are substrings of the base name. Constraints are prefixes of
/// parameter values; an entry lacking a constrained key fails.
pub fn matches<S: AsRef<str>>(entry: &Entry, keywords: &[S], constraints: &ParameterMap) -> bool {
    keywords
        .iter()
        .all(|keyword| entry.base_name().contains(keyword.as_ref()))
        && constraints.iter().all(|(key, prefix)| {
            entry
                .parameters()
                .get(key)
                .is_some_and(|value| value.starts_with(prefix.as_str()))
        })
}

/// Keep the entries that [`matches`] accepts, in input order.
///
/// Works on owned entries as well as shared or mutable references.
pub fn filter<I, E, S>(entries: I, keywords: &[S], constraints: &ParameterMap) -> Vec<E>
where
    I: IntoIterator<Item = E>,
    E: Borrow<Entry>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter(|entry| matches(entry.borrow(), keywords, constraints))
        .collect()
}
