use compdb_core::RecordDiscovery;
use compdb_testing::BuildTree;
use compdb_testing::fixtures::source_only_record;
use std::path::PathBuf;

fn sorted(mut files: Vec<PathBuf>) -> Vec<PathBuf> {
    files.sort();
    files
}

#[test]
fn test_walks_nested_directories_for_record_files() {
    let tree = BuildTree::new()
        .with_object("init/main.o", "init/main.c")
        .with_object("kernel/sched/core.o", "kernel/sched/core.c");
    tree.write_record("kernel/.fork.o.d", "not a record").unwrap();
    tree.write_record("kernel/.built-in.a.cmd", "cmd_x := ar").unwrap();

    let files = RecordDiscovery::default().discover(&[tree.out_dir().to_path_buf()]);

    assert_eq!(
        sorted(files),
        vec![
            tree.out_dir().join("init/.main.o.cmd"),
            tree.out_dir().join("kernel/sched/.core.o.cmd"),
        ]
    );
}

#[test]
fn test_directories_named_like_records_are_skipped() {
    let tree = BuildTree::new();
    std::fs::create_dir_all(tree.out_dir().join("weird.o.cmd")).unwrap();

    let files = RecordDiscovery::default().discover(&[tree.out_dir().to_path_buf()]);

    assert!(files.is_empty());
}

#[test]
fn test_mixes_roots_and_literal_paths_in_order() {
    let tree = BuildTree::new().with_object("drivers/a.o", "drivers/a.c");
    let literal = tree.out_dir().join("elsewhere.txt");

    let files = RecordDiscovery::default()
        .discover(&[literal.clone(), tree.out_dir().join("drivers")]);

    assert_eq!(files, vec![literal, tree.out_dir().join("drivers/.a.o.cmd")]);
}

#[test]
fn test_overlapping_roots_yield_duplicates() {
    let tree = BuildTree::new().with_object("drivers/a.o", "drivers/a.c");
    let roots = vec![tree.out_dir().to_path_buf(), tree.out_dir().join("drivers")];

    let files = RecordDiscovery::default().discover(&roots);

    assert_eq!(files.len(), 2);
    assert_eq!(files[0], files[1]);
}

#[test]
fn test_dedup_paths_collapses_overlapping_roots() {
    let tree = BuildTree::new().with_object("drivers/a.o", "drivers/a.c");
    let roots = vec![tree.out_dir().to_path_buf(), tree.out_dir().join("drivers")];

    let files = RecordDiscovery::default()
        .with_dedup_paths(true)
        .discover(&roots);

    assert_eq!(files, vec![tree.out_dir().join("drivers/.a.o.cmd")]);
}

#[test]
fn test_custom_pattern() {
    let tree = BuildTree::new();
    tree.write_record("lib/.crc.ko.cmd", &source_only_record("crc.ko", "crc.c"))
        .unwrap();
    tree.write_record("lib/.crc.o.cmd", &source_only_record("crc.o", "crc.c"))
        .unwrap();

    let files = RecordDiscovery::new("*.ko.cmd")
        .unwrap()
        .discover(&[tree.out_dir().to_path_buf()]);

    assert_eq!(files, vec![tree.out_dir().join("lib/.crc.ko.cmd")]);
}

#[test]
fn test_empty_tree_finds_nothing() {
    let tree = BuildTree::new();

    assert!(
        RecordDiscovery::default()
            .discover(&[tree.out_dir().to_path_buf()])
            .is_empty()
    );
}
