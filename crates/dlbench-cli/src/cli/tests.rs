//! CLI parsing tests.

use clap::Parser;

use super::{Cli, CliCommand};

fn parse(args: &[&str]) -> CliCommand {
    Cli::parse_from(args).command
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["dlbench", "run", "http://host/file"]) {
        CliCommand::Run {
            url,
            profile,
            fanout,
        } => {
            assert_eq!(url, "http://host/file");
            assert_eq!(profile, "baseline");
            assert!(fanout.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_profile_and_fanout() {
    match parse(&[
        "dlbench",
        "run",
        "http://host/file",
        "--profile",
        "accel-cached",
        "--fanout",
        "8",
    ]) {
        CliCommand::Run {
            url,
            profile,
            fanout,
        } => {
            assert_eq!(url, "http://host/file");
            assert_eq!(profile, "accel-cached");
            assert_eq!(fanout, Some(8));
        }
        _ => panic!("expected Run with options"),
    }
}

#[test]
fn cli_parse_matrix() {
    match parse(&["dlbench", "matrix", "http://host/file", "--fanout", "4"]) {
        CliCommand::Matrix { url, fanout } => {
            assert_eq!(url, "http://host/file");
            assert_eq!(fanout, Some(4));
        }
        _ => panic!("expected Matrix"),
    }
}

#[test]
fn cli_parse_profiles() {
    assert!(matches!(parse(&["dlbench", "profiles"]), CliCommand::Profiles));
}
