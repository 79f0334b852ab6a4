//! # Command-Line Tests
//!
//! Drive `run` with parsed arguments the way `main` does. An `Err` from `run` is what
//! turns into a non-zero exit status, so failing configs are checked here along with
//! the layout options layered over the config file.

use crate::{load_config, run, Cli};
use clap::Parser;
use fret_template_lib::config::{PageLayout, Paper};
use fret_template_lib::error::FretError;
use fret_template_lib::{plan_pages, PageMode};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const NINETEEN_EDO: &str = r#"{"edo": 19, "fretboard_length": 18.375, "scale_length": 25}"#;

fn cli(config: &Path, extra: &[&str]) -> Cli {
    let mut args = vec!["fret-template".to_string(), config.display().to_string()];
    args.extend(extra.iter().map(|a| a.to_string()));
    Cli::try_parse_from(args).expect("Should parse arguments")
}

fn field_of(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<FretError>().and_then(FretError::field)
}

/// `--dpi`, `--paper` and `--margin` replace the file's layout, one setting at a time.
#[test]
fn layout_options_override_the_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("19edo.json");
    fs::write(
        &config_path,
        r#"{"edo": 19, "fretboard_length": 18.375, "scale_length": 25,
            "layout": {"dpi": 96, "paper": "legal", "margin": 0.25}}"#,
    )
    .unwrap();

    let untouched = load_config(&cli(&config_path, &[])).unwrap();
    assert_eq!(
        untouched.layout,
        PageLayout::new(96.0, Paper::Legal, 0.25).unwrap()
    );

    let paper_only = load_config(&cli(&config_path, &["--paper", "a4"])).unwrap();
    assert_eq!(
        paper_only.layout,
        PageLayout::new(96.0, Paper::A4, 0.25).unwrap()
    );

    let all = load_config(&cli(
        &config_path,
        &["--dpi", "300", "--paper", "letter", "--margin", "0.75"],
    ))
    .unwrap();
    assert_eq!(
        all.layout,
        PageLayout::new(300.0, Paper::Letter, 0.75).unwrap()
    );
    assert_eq!(all.tuning, untouched.tuning);
}

/// Overridden layouts flow through to the written pages.
#[test]
fn run_writes_pages_for_overridden_layout() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("19edo.json");
    fs::write(&config_path, NINETEEN_EDO).unwrap();
    let out_dir = dir.path().join("out");
    let args = cli(
        &config_path,
        &[
            "--dpi",
            "300",
            "--paper",
            "a4",
            "--margin",
            "0.75",
            "--out-dir",
            out_dir.to_str().unwrap(),
        ],
    );

    let mut stdout = Vec::new();
    run(&args, &mut stdout).unwrap();

    let config = load_config(&args).unwrap();
    let pages = plan_pages(&config.tuning, &config.layout, PageMode::Paginated).unwrap();
    let report = String::from_utf8(stdout).unwrap();
    assert_eq!(report.lines().count(), pages.len());
    for n in 1..=pages.len() {
        let page = out_dir.join(format!("19edo_page{}.svg", n));
        assert!(report.contains(&page.display().to_string()));
        let svg = fs::read_to_string(&page).unwrap();
        assert!(svg.contains("1 inch = 300px"));
        assert!(svg.contains(r#"width="8.2700in""#));
    }
}

/// `--stdout` prints the preview and leaves the filesystem alone.
#[test]
fn stdout_preview_writes_no_files() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("19edo.json");
    fs::write(&config_path, NINETEEN_EDO).unwrap();

    let mut stdout = Vec::new();
    run(&cli(&config_path, &["--stdout"]), &mut stdout).unwrap();

    let preview = String::from_utf8(stdout).unwrap();
    assert!(preview.starts_with("19 EDO"));
    assert!(preview.contains("2 page(s)"));
    assert!(!dir.path().join("19edo_frets").exists());
}

/// Margins that leave no printable area fail before anything is written.
#[test]
fn bad_override_fails_without_output() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("19edo.json");
    fs::write(&config_path, NINETEEN_EDO).unwrap();

    let err = run(&cli(&config_path, &["--margin", "5"]), &mut Vec::new()).unwrap_err();
    assert_eq!(field_of(&err), Some("margin"));
    assert!(!dir.path().join("19edo_frets").exists());
}

/// Each of these configs makes `run` fail, so the binary exits non-zero with no files.
#[test]
fn invalid_configs_fail_without_output() {
    let cases = [
        (
            r#"{"edo": 22, "fretboard_length": 34, "scale_length": 34}"#,
            Some("fretboard_length"),
        ),
        (
            r#"{"edo": 19, "fretboard_length": 18, "scale_length": 25, "frets": 3}"#,
            None,
        ),
        (
            r#"{"edo": 1e12, "fretboard_length": 18.375, "scale_length": 25}"#,
            Some("edo"),
        ),
        // One fret per octave: the nut-to-fret-1 gap is 17 in, taller than any page
        (
            r#"{"edo": 1, "fretboard_length": 25, "scale_length": 34}"#,
            Some("page_height"),
        ),
    ];

    for (contents, field) in cases {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("bad.json");
        fs::write(&config_path, contents).unwrap();

        let err = run(&cli(&config_path, &[]), &mut Vec::new()).unwrap_err();
        let fret_err = err
            .downcast_ref::<FretError>()
            .unwrap_or_else(|| panic!("expected a FretError for {}", contents));
        assert!(fret_err.is_config(), "{}", contents);
        assert_eq!(field_of(&err), field, "{}", contents);
        assert!(!dir.path().join("bad_frets").exists(), "{}", contents);
    }
}

/// A missing config file is reported as an IO failure.
#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let err = run(&cli(&dir.path().join("absent.json"), &[]), &mut Vec::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FretError>(),
        Some(FretError::Io { .. })
    ));
}

/// Unknown paper names are rejected while parsing arguments.
#[test]
fn unknown_paper_is_rejected() {
    let result = Cli::try_parse_from(["fret-template", "config.json", "--paper", "tabloid"]);
    assert!(result.is_err());
}
