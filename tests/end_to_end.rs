use std::io::Write;

use brc_engine::{run_file, Discovery, Error, MalformedPolicy, RunConfig};
use tempfile::NamedTempFile;

fn input(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config(workers: usize) -> RunConfig {
    RunConfig::default().with_workers(workers).with_seed(0x5eed)
}

fn run(contents: &str, config: &RunConfig) -> String {
    let file = input(contents);
    let mut out = Vec::new();
    run_file(file.path(), config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn two_cities() {
    let out = run("Paris;12.0\nParis;-5.0\nTokyo;20.0\n", &config(2));
    assert_eq!(out, "{Paris=-5.0/3.5/12.0, Tokyo=20.0/20.0/20.0}\n");
}

#[test]
fn single_key() {
    let out = run("A;10.0\nA;10.0\n", &config(2));
    assert_eq!(out, "{A=10.0/10.0/10.0}\n");
}

#[test]
fn utf8_keys_sort_by_bytes() {
    let contents = "Zürich;1.0\nÅrhus;2.0\nZagreb;3.0\nabc;4.0\n";
    let out = run(contents, &config(3));
    assert_eq!(
        out,
        "{Zagreb=3.0/3.0/3.0, Zürich=1.0/1.0/1.0, abc=4.0/4.0/4.0, Århus=2.0/2.0/2.0}\n"
    );
}

#[test]
fn generated_input_is_partition_invariant() {
    let keys = ["Oslo", "Lima", "Accra", "Hanoi", "Quito", "Perth", "Dakar"];
    let mut rng = fastrand::Rng::with_seed(11);
    let mut contents = String::new();
    for key in keys {
        contents.push_str(&format!("{key};0.0\n"));
    }
    for _ in 0..5_000 {
        let key = keys[rng.usize(..keys.len())];
        let tenths = rng.i64(-999..=999);
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.abs();
        contents.push_str(&format!("{key};{sign}{}.{}\n", abs / 10, abs % 10));
    }

    let small_prefix = |workers| config(workers).with_prefix_bytes(64);
    let baseline = run(&contents, &small_prefix(1));
    for workers in [2, 4, 8] {
        assert_eq!(run(&contents, &small_prefix(workers)), baseline);
    }
}

#[test]
fn late_key_is_rejected_unless_fully_discovered() {
    let mut contents = "A;1.0\n".repeat(100);
    contents.push_str("B;2.0\n");
    let file = input(&contents);

    let prefix_only = config(4).with_prefix_bytes(60);
    let mut out = Vec::new();
    let err = run_file(file.path(), &prefix_only, &mut out).unwrap_err();
    assert!(matches!(err, Error::UnknownKey { ref key, offset: 600 } if key == "B"));
    assert!(out.is_empty());

    let full = prefix_only.with_discovery(Discovery::Full);
    let summary = run_file(file.path(), &full, &mut out).unwrap();
    assert_eq!(summary.records, 101);
    assert_eq!(summary.keys, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{A=1.0/1.0/1.0, B=2.0/2.0/2.0}\n"
    );
}

#[test]
fn malformed_records() {
    let contents = "A;1.0\nA;1\nA;3.0\n";
    let file = input(contents);
    let mut out = Vec::new();

    let err = run_file(file.path(), &config(2), &mut out).unwrap_err();
    assert!(matches!(err, Error::Malformed(m) if m.offset == 6));

    let skip = config(2).with_malformed(MalformedPolicy::Skip);
    let summary = run_file(file.path(), &skip, &mut out).unwrap();
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.records, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "{A=1.0/2.0/3.0}\n");
}

#[test]
fn empty_file() {
    assert_eq!(run("", &config(2)), "{}\n");
}
