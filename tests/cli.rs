use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const STATS: &str = "\
mix,logicalReads,logicalWrites,physicalReads,physicalWrites,pagesAccessed
0,10,0,6,0,12
25,20,5,8,3,15
50,30,10,9,6,17
75,40,15,11,9,18
100,50,20,12,12,20
";

fn pfplot(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pfplot"))
        .current_dir(dir)
        .args(args)
        .arg("--no-show")
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to run pfplot")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn default_paths_produce_png() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stats.csv"), STATS).unwrap();

    let output = pfplot(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let png = fs::read(dir.path().join("pf_stats.png")).unwrap();
    assert!(png.len() > 8);
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn single_row_is_enough() {
    let dir = tempfile::tempdir().unwrap();
    let one_row = STATS.lines().take(2).collect::<Vec<_>>().join("\n");
    fs::write(dir.path().join("stats.csv"), one_row).unwrap();

    let output = pfplot(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(fs::metadata(dir.path().join("pf_stats.png")).unwrap().len() > 0);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stats.csv"), STATS).unwrap();

    assert!(pfplot(dir.path(), &[]).status.success());
    let first = fs::read(dir.path().join("pf_stats.png")).unwrap();
    assert!(pfplot(dir.path(), &[]).status.success());
    let second = fs::read(dir.path().join("pf_stats.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_counter_column_keeps_previous_image() {
    let dir = tempfile::tempdir().unwrap();
    let without_pages: String = STATS
        .lines()
        .map(|line| line.rsplit_once(',').map(|(head, _)| head).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(dir.path().join("stats.csv"), without_pages).unwrap();
    fs::write(dir.path().join("pf_stats.png"), b"previous run").unwrap();

    let output = pfplot(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("pagesAccessed"), "stderr: {}", stderr(&output));
    assert_eq!(fs::read(dir.path().join("pf_stats.png")).unwrap(), b"previous run");
}

#[test]
fn missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();

    let output = pfplot(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("stats.csv"), "stderr: {}", stderr(&output));
    assert!(!dir.path().join("pf_stats.png").exists());
}

#[test]
fn non_numeric_counter_reports_location() {
    let dir = tempfile::tempdir().unwrap();
    let bad = STATS.replace("25,20,5,8,3,15", "25,twenty,5,8,3,15");
    fs::write(dir.path().join("stats.csv"), bad).unwrap();

    let output = pfplot(dir.path(), &[]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("logicalReads"), "stderr: {}", err);
    assert!(err.contains("row 2"), "stderr: {}", err);
    assert!(!dir.path().join("pf_stats.png").exists());
}

#[test]
fn svg_output_carries_labels_in_legend_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("io.csv"), STATS).unwrap();

    let output = pfplot(dir.path(), &["--input", "io.csv", "--output", "report.svg"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!dir.path().join("pf_stats.png").exists());

    let svg = fs::read_to_string(dir.path().join("report.svg")).unwrap();
    let mut last = 0;
    for label in [
        "Logical Reads",
        "Logical Writes",
        "Physical Reads",
        "Physical Writes",
        "Pages Accessed",
    ] {
        let at = svg.find(label).unwrap_or_else(|| panic!("{} missing", label));
        assert!(at >= last, "{} out of order", label);
        last = at;
    }
}

#[test]
fn unsupported_output_extension_is_rejected_first() {
    let dir = tempfile::tempdir().unwrap();

    let output = pfplot(dir.path(), &["--output", "pf_stats.gif"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported output format"), "stderr: {}", stderr(&output));
}
