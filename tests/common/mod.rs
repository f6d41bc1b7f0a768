// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run logtally with the given arguments; returns (stdout, stderr, exit_code)
pub fn run_logtally(args: &[&str]) -> (String, String, i32) {
    // Use the built binary directly instead of cargo run to avoid compilation output
    let binary_path = if cfg!(debug_assertions) {
        "./target/debug/logtally"
    } else {
        "./target/release/logtally"
    };

    let output = Command::new(binary_path)
        .args(args)
        .output()
        .expect("Failed to run logtally");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write an input batch file under `dir` and return its path
pub fn write_input(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("input.csv");
    let mut file = fs::File::create(&path).expect("Failed to create input file");
    file.write_all(content.as_bytes())
        .expect("Failed to write input file");
    path
}

/// A well-formed header plus the given data rows
pub fn batch_with_rows(rows: &[&str]) -> String {
    let mut content = String::from("Timestamp,Severity,Product,Version,ErrorCode\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

/// Find the single report file with the given name prefix in `dir`
pub fn find_report(dir: &Path, prefix: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(prefix) && name.ends_with(".csv") {
            return Some(entry.path());
        }
    }
    None
}

/// Read one report's full content
pub fn read_report(dir: &Path, prefix: &str) -> String {
    let path = find_report(dir, prefix)
        .unwrap_or_else(|| panic!("no report starting with '{}' in {:?}", prefix, dir));
    fs::read_to_string(path).expect("Failed to read report")
}

/// Read one report split into lines
pub fn report_lines(dir: &Path, prefix: &str) -> Vec<String> {
    read_report(dir, prefix)
        .lines()
        .map(|l| l.to_string())
        .collect()
}
