use std::{fs, path::{Path, PathBuf}, process::Command};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fgk_rust_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("scratch directory is creatable");
    dir
}

fn run_round_trip(dir: &Path, payload: &[u8], extra: &[&str]) -> (std::process::Output, PathBuf) {
    let input = dir.join("in.bin");
    let decoded = dir.join("decoded.bin");
    fs::write(&input, payload).expect("input is writable");

    let output = Command::new(env!("CARGO_BIN_EXE_fgk_rust"))
        .arg(&input)
        .arg("--compressed-output")
        .arg(dir.join("compressed.dat"))
        .arg("--decoded-output")
        .arg(&decoded)
        .arg("--json")
        .args(extra)
        .output()
        .expect("driver runs");

    (output, decoded)
}

#[test]
fn test_driver_round_trips_input_containing_end_of_text() {
    let dir = scratch_dir("etx");
    let payload = b"ab\x03cd";

    let (output, decoded) = run_round_trip(&dir, payload, &[]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read(&decoded).unwrap(), payload);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["original_bytes"], 5);
    assert_eq!(report["matches"], true);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_driver_rejects_an_explicit_sentinel_in_the_input() {
    let dir = scratch_dir("explicit");

    let (output, _) = run_round_trip(&dir, b"ab\x03cd", &["--sentinel", "3"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("sentinel"));

    fs::remove_dir_all(&dir).ok();
}
