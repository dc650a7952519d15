use std::collections::BTreeMap;
use std::fs;

use pretty_assertions::assert_eq;
use simtab_query::{
    compute_unique_within, filter, sort_by_distinctiveness, Label, SliceOptions, Slicer,
};
use simtab_store::{Entry, Registry, SimtabConfig};
use tempfile::tempdir;

fn seed(root: &std::path::Path) {
    let files = [
        ("run|a=1|b=1.csv", "name value\nenergy 3.2\n"),
        ("run|a=2|b=1.csv", "name value\nenergy 4.1\ntime 0.5\n"),
        ("run|a=1|b=2.csv", "name value\nenergy 9\n"),
        ("fit|a=1|b=1.csv", "name value\nchi2 0.3\n"),
    ];
    for (name, content) in files {
        fs::write(root.join(name), content).unwrap();
    }
}

#[test]
fn list_flow_orders_by_distinctiveness() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let mut registry = Registry::new(SimtabConfig::default());
    registry.load_from_folder(dir.path()).unwrap();
    assert_eq!(registry.len(), 4);

    let mut selected = filter(registry.iter_mut(), &["run"], &BTreeMap::new());
    compute_unique_within(&mut selected);
    sort_by_distinctiveness(&mut selected);
    let labels: Vec<String> = selected
        .iter()
        .map(|entry| Label::new(entry).to_string())
        .collect();
    assert_eq!(labels, vec!["run  a=1 b=1", "run  a=1 b=2", "run  a=2 b=1"]);

    let constraints = BTreeMap::from([("b".to_string(), "1".to_string())]);
    let mut selected = filter(registry.iter_mut(), &[] as &[&str], &constraints);
    compute_unique_within(&mut selected);
    sort_by_distinctiveness(&mut selected);
    let labels: Vec<String> = selected
        .iter()
        .map(|entry| Label::new(entry).to_string())
        .collect();
    assert_eq!(labels, vec!["fit  a=1", "run  a=1", "run  a=2"]);
}

#[test]
fn slice_and_save_writes_pivot_tables() {
    let dir = tempdir().unwrap();
    seed(dir.path());

    let config = SimtabConfig::default();
    let mut registry = Registry::new(config.clone());
    registry.load_from_folder(dir.path()).unwrap();

    let slicer = Slicer::new(&config);
    let options = SliceOptions::new("a").match_base_name(true);
    let derived = slicer
        .slice_and_save(&options, registry.entries_mut())
        .unwrap();

    assert_eq!(derived.len(), 1);
    let path = dir.path().join("run_vs_a|b=1.csv");
    assert_eq!(derived[0].filepath(), path.as_path());
    assert!(!derived[0].is_dirty());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "energy time a\n3.2 \"\" 1\n4.1 0.5 2\n"
    );

    registry.add(Entry::open(&path, &config).unwrap());
    let reloaded = registry.find(&path).unwrap();
    assert_eq!(reloaded.base_name(), "run_vs_a");
    assert_eq!(reloaded.column("time").unwrap(), &["".to_string(), "0.5".to_string()]);
}
