use std::fmt;

use simtab_store::Entry;

/// Display form of an entry: base name, then its unique parameters.
///
/// ```text
/// energy_scan  dt=0.01 n=10
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    entry: &'a Entry,
}

impl<'a> Label<'a> {
    pub fn new(entry: &'a Entry) -> Self {
        Self { entry }
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry.base_name())?;
        for (idx, (key, value)) in self.entry.unique_parameters().iter().enumerate() {
            f.write_str(if idx == 0 { "  " } else { " " })?;
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;

    #[test]
    fn renders_unique_parameters_only() {
        let mut e = entry("energy_scan", &[("dt", "0.01"), ("n", "10"), ("seed", "3")]);
        e.compute_unique_with(|key, _| key != "seed");
        assert_eq!(Label::new(&e).to_string(), "energy_scan  dt=0.01 n=10");

        e.compute_unique_with(|_, _| false);
        assert_eq!(Label::new(&e).to_string(), "energy_scan");
    }
}
