use paging_sim::address::LogicalAddress;
use paging_sim::backing_store::BackingStore;
use paging_sim::config::Config;
use paging_sim::engine::TranslationEngine;
use paging_sim::validator::ValidationEntry;
use paging_sim::{run_simulation, Error, Policy, Simulation, SIZE_FRAME, SIZE_STORE};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn image() -> Vec<u8> {
    (0..SIZE_STORE)
        .map(|i| ((i / SIZE_FRAME) as u8).wrapping_mul(3) ^ (i % SIZE_FRAME) as u8)
        .collect()
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn workspace(trace: &str) -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let store = write_file(dir.path(), "BACKING_STORE.bin", &image());
    let trace = write_file(dir.path(), "addresses.txt", trace.as_bytes());
    let mut config = Config::new(trace);
    config.backing_store = store.to_string_lossy().into_owned();
    (dir, config)
}

fn run(config: &Config) -> (String, paging_sim::Summary) {
    let mut out = Vec::new();
    let summary = run_simulation(config, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn single_frame_end_to_end() {
    let (_dir, mut config) = workspace("0\n256\n0\n");
    config.frames = 1;
    let (output, summary) = run(&config);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|line| line.split(", ").nth(2) == Some("0")));
    assert!(lines[0].starts_with("0, 0, 0, 00010203"));
    // page 1 bytes are 3 ^ offset
    assert!(lines[1].starts_with("256, 3, 0, 03020100"));

    assert_eq!(summary.stats.addresses_processed, 3);
    assert_eq!(summary.stats.page_faults, 3);
    assert_eq!(summary.stats.tlb_hits, 0);
    assert_eq!(summary.stats.tlb_misses, 3);
    assert!(summary.validation.is_none());

    let report = summary.to_string();
    assert!(report.contains("Page Fault Rate = 1.000"));
    assert!(report.contains("TLB Hit Rate = 0.000"));
}

#[test]
fn two_frames_end_to_end() {
    for policy in [Policy::Fifo, Policy::Lru, Policy::Opt] {
        let (_dir, mut config) = workspace("0\n256\n0\n");
        config.frames = 2;
        config.policy = policy;
        let (_, summary) = run(&config);
        assert_eq!(summary.stats.page_faults, 2);
        assert_eq!(summary.stats.tlb_hits, 1);
    }
}

#[test]
fn frame_content_is_full_uppercase_hex() {
    let (_dir, config) = workspace("4095\n");
    let (output, _) = run(&config);
    let hex = output.trim_end().split(", ").nth(3).unwrap();
    assert_eq!(hex.len(), 2 * SIZE_FRAME);
    assert!(hex
        .chars()
        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
}

#[test]
fn signed_values() {
    // page 0 offset 200 holds 200, reported as -56
    let (_dir, config) = workspace("200\n");
    let (output, _) = run(&config);
    assert!(output.starts_with("200, -56, 0, "));
}

#[test]
fn empty_trace_reports_undefined_rates() {
    let (_dir, config) = workspace("");
    let (output, summary) = run(&config);
    assert!(output.is_empty());
    assert_eq!(summary.stats.addresses_processed, 0);
    let report = summary.to_string();
    assert!(report.contains("Page Fault Rate = undefined"));
    assert!(report.contains("TLB Hit Rate = undefined"));
}

#[test]
fn malformed_trace_is_fatal() {
    let (_dir, config) = workspace("1\n2\nthree\n4\n");
    let mut out = Vec::new();
    match run_simulation(&config, &mut out) {
        Err(Error::TraceFormat { line, content }) => {
            assert_eq!(line, 3);
            assert_eq!(content, "three");
        }
        other => panic!("expected a trace format error, got {:?}", other.map(|s| s.stats)),
    }
    assert!(out.is_empty());
}

#[test]
fn missing_trace_is_fatal() {
    let (dir, mut config) = workspace("");
    config.trace_file = dir.path().join("nope.txt");
    assert!(matches!(
        run_simulation(&config, &mut Vec::new()),
        Err(Error::Io(_))
    ));
}

#[test]
fn bad_backing_store_is_fatal() {
    let (dir, mut config) = workspace("1\n");
    let short = write_file(dir.path(), "short.bin", &[0u8; 100]);
    config.backing_store = short.to_string_lossy().into_owned();
    assert!(matches!(
        run_simulation(&config, &mut Vec::new()),
        Err(Error::BackingStore(_))
    ));
}

#[test]
fn bad_frame_count_is_fatal() {
    let (_dir, mut config) = workspace("1\n");
    config.frames = 0;
    assert!(matches!(
        run_simulation(&config, &mut Vec::new()),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn validation_against_own_output() {
    let trace = "16916\n62493\n30198\n53683\n40185\n28781\n24462\n48399\n16916\n";
    let (dir, mut config) = workspace(trace);
    config.frames = 4;
    config.policy = Policy::Lru;
    let (reference, _) = run(&config);

    let expected = write_file(dir.path(), "correct.txt", reference.as_bytes());
    config.validate = Some(expected);
    config.policy = Policy::Opt;
    let (_, summary) = run(&config);
    let tally = summary.validation.unwrap();
    assert_eq!(tally.checked, 9);
    assert!(tally.is_clean());
    assert!(summary.to_string().ends_with("Validated Translations = 9/9\n"));
}

#[test]
fn validation_reports_mismatches() {
    let (dir, mut config) = workspace("0\n1\n");
    let expected = write_file(
        dir.path(),
        "correct.txt",
        b"Virtual address: 0 Physical address: 0 Value: 0\n\
          Virtual address: 1 Physical address: 1 Value: 99\n\
          Virtual address: 2 Physical address: 2 Value: 2\n",
    );
    config.validate = Some(expected);
    let (_, summary) = run(&config);
    let tally = summary.validation.unwrap();
    assert_eq!(tally.matched, 1);
    assert_eq!(tally.checked, 3);
}

#[test]
fn in_memory_simulation() {
    let store = BackingStore::from_bytes(image()).unwrap();
    let engine = TranslationEngine::build(8, Policy::Fifo, store).unwrap();
    let trace: Vec<_> = [10u64, 20, 300].iter().map(|&a| LogicalAddress::from(a)).collect();
    let expected = vec![ValidationEntry {
        address: LogicalAddress::from(10),
        value: 10,
    }];
    let mut out = Vec::new();
    let summary = Simulation::from_parts(engine, trace)
        .with_expected(expected)
        .run(&mut out)
        .unwrap();
    assert_eq!(summary.stats.page_faults, 2);
    assert_eq!(summary.stats.tlb_hits, 1);
    let tally = summary.validation.unwrap();
    assert_eq!((tally.matched, tally.checked), (1, 3));
}
