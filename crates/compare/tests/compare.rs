use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use dhtkv_compare::{Comparison, Histogram, differences, load_pair, load_values};

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn compares_latency_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "greedy.txt", "1 2 3\n");
    let b = write(&dir, "velocity.txt", "1 3 2\n");

    let pairs = load_pair(&a, &b).unwrap();
    let cmp = Comparison::from_pairs(&pairs);
    assert_eq!(cmp.same, 1);
    assert_eq!(cmp.better, vec![1]);
    assert_eq!(cmp.worse, vec![-1]);
    assert_eq!(differences(&pairs), vec![-1, 1]);
}

#[test]
fn single_file_histogram() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "lat.txt", "10 20 30\n40 50 60\n70 80 90\n");

    let values = load_values(&path).unwrap();
    let hist = Histogram::new(&values);
    assert_eq!(hist.bins.len(), 3);
    assert_eq!(hist.total(), 9);
    assert!(hist.bins.iter().all(|b| b.count == 3));
}

#[test]
fn binary_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.txt", "1 2 3\n");
    let b = write(&dir, "b.txt", "1 3 2\n");

    Command::cargo_bin("dhtkv-compare")
        .unwrap()
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Same: 1")
                .and(predicate::str::contains("Better: Count: 1 Mean: 1.0 Stdev: 0.0"))
                .and(predicate::str::contains("Worse: Count: 1 Mean: -1.0 Stdev: 0.0"))
                .and(predicate::str::contains("Val1: Mean: 2.0 Stdev: 1.0"))
                .and(predicate::str::contains("Val2: Mean: 2.0 Stdev: 1.0")),
        );
}

#[test]
fn binary_rejects_mismatched_sets() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.txt", "1 2 3\n");
    let b = write(&dir, "b.txt", "1 2\n");

    Command::cargo_bin("dhtkv-compare")
        .unwrap()
        .arg(&a)
        .arg(&b)
        .assert()
        .code(1)
        .stdout("Invalid data sets\n");
}
