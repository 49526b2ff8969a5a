use std::fs;
use std::path::PathBuf;

use clap::Parser;
use idqueue::{BoundedUniqueQueue, Identifier, QueueConfig};

use super::{commands, Cli, Command};

const FIRST: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
const SECOND: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
const THIRD: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

fn run_cli(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    commands::run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn parsed(text: &str) -> Identifier {
    text.parse().expect("valid identifier")
}

#[test]
fn add_parses_identifiers_and_overrides() {
    let cli = Cli::try_parse_from(["idq", "add", "--file", "ids.bin", "--capacity", "2", FIRST])
        .expect("parse");
    match cli.command {
        Command::Add { file, capacity, ids } => {
            assert_eq!(file, Some(PathBuf::from("ids.bin")));
            assert_eq!(capacity, Some(2));
            assert_eq!(ids, vec![parsed(FIRST)]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn add_rejects_malformed_identifier() {
    assert!(Cli::try_parse_from(["idq", "add", "--file", "ids.bin", "nope"]).is_err());
    assert!(Cli::try_parse_from(["idq", "add", "--file", "ids.bin"]).is_err());
}

#[test]
fn resolve_prefers_flags_over_config() {
    let config = QueueConfig::new(10).with_source_path("from-config.bin");
    let flag = Some(PathBuf::from("flag.bin"));
    let settings = commands::resolve(Some(&config), flag, Some(3)).expect("settings");
    assert_eq!(settings, QueueConfig::new(3).with_source_path("flag.bin"));

    let settings = commands::resolve(Some(&config), None, None).expect("settings");
    assert_eq!(settings, config);

    let settings = commands::resolve(None, Some(PathBuf::from("f.bin")), None).expect("settings");
    assert_eq!(settings.capacity, commands::DEFAULT_CAPACITY);
}

#[test]
fn resolve_requires_a_file_and_positive_capacity() {
    assert!(commands::resolve(None, None, Some(3)).is_err());
    assert!(commands::resolve(None, Some(PathBuf::from("f.bin")), Some(0)).is_err());
}

#[test]
fn add_then_inspect_round_trips() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let file = temp.path().join("ids.bin");
    let file_arg = file.to_str().expect("utf-8 path");

    let output =
        run_cli(&["idq", "add", "--file", file_arg, "--capacity", "2", FIRST, SECOND, FIRST, THIRD])
            .expect("add");
    assert_eq!(
        output,
        format!("added {FIRST}\nadded {SECOND}\npresent {FIRST}\nadded {THIRD}\nsize: 2/2\n")
    );

    let output = run_cli(&["idq", "inspect", file_arg]).expect("inspect");
    assert_eq!(output, format!("{SECOND}\n{THIRD}\nrecords: 2\ntrailing_bytes: 0\n"));
}

#[test]
fn inspect_hex_reports_trailing_bytes() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let file = temp.path().join("ids.bin");
    let mut bytes = parsed(FIRST).to_bytes().to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);
    fs::write(&file, bytes).expect("write");

    let output =
        run_cli(&["idq", "inspect", "--hex", file.to_str().expect("utf-8 path")]).expect("inspect");
    assert_eq!(output, "67e5504410b1426f9247bb680e5fe0c8\nrecords: 1\ntrailing_bytes: 3\n");
}

#[test]
fn inspect_missing_file_fails() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let missing = temp.path().join("missing.bin");
    assert!(run_cli(&["idq", "inspect", missing.to_str().expect("utf-8 path")]).is_err());
}

#[test]
fn trim_uses_config_source_path() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let file = temp.path().join("ids.bin");
    let seed = BoundedUniqueQueue::new(3).expect("capacity");
    seed.add_all([parsed(FIRST), parsed(SECOND), parsed(THIRD)]);
    assert!(seed.save(Some(file.as_path())));

    let config = temp.path().join("queue.toml");
    fs::write(&config, format!("capacity = 3\nsource_path = {:?}\n", file.display().to_string()))
        .expect("write config");

    let config_arg = config.to_str().expect("utf-8 path");
    let output =
        run_cli(&["idq", "--config", config_arg, "trim", "--capacity", "1"]).expect("trim");
    assert_eq!(output, "kept: 1\n");

    let reopened = BoundedUniqueQueue::with_source(3, &file).expect("capacity");
    assert_eq!(reopened.snapshot(), vec![parsed(THIRD)]);
}

#[test]
fn generate_prints_requested_count() {
    let output = run_cli(&["idq", "generate", "--count", "3"]).expect("generate");
    let ids: Vec<Identifier> = output.lines().map(parsed).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id.as_uuid().get_version_num() == 4));
}
