use std::path::PathBuf;

use clap::Parser;
use taiko_contracts_client::config::ConfigBuilder;

use super::*;
use crate::config::Config;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

// args that keep the tests away from real config and dotenv files
fn isolated(home: &tempfile::TempDir) -> CliArgs {
    CliArgs {
        home: Some(home.path().to_path_buf()),
        dotenv: Some(home.path().join("does-not-exist")),
        ..Default::default()
    }
}

#[test]
fn global_args_after_subcommand() {
    let cli = parse(&[
        "taiko-bindings",
        "whitelist",
        "--l1-endpoint",
        "http://localhost:8545",
        "--fork",
        "pacaya",
        "--json",
    ]);

    assert!(cli.json);
    assert_eq!(
        cli.args.l1_endpoint.as_deref(),
        Some("http://localhost:8545")
    );
    assert_eq!(cli.args.fork, Some(Fork::Pacaya));
    assert!(matches!(cli.command, Command::Whitelist { address: None }));
}

#[test]
fn call_collects_trailing_args() {
    let cli = parse(&[
        "taiko-bindings",
        "call",
        "--contract",
        "PreconfWhitelist",
        "--function",
        "isOperatorActive",
        "--block",
        "10",
        "0x00000000000000000000000000000000000000aa",
        "12",
    ]);

    match cli.command {
        Command::Call {
            contract,
            address,
            function,
            block,
            args,
        } => {
            assert_eq!(contract, "PreconfWhitelist");
            assert_eq!(address, None);
            assert_eq!(function, "isOperatorActive");
            assert_eq!(block, Some(10));
            assert_eq!(
                args,
                ["0x00000000000000000000000000000000000000aa", "12"]
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_fork() {
    assert!(Cli::try_parse_from(["taiko-bindings", "contracts", "--fork", "ontake"]).is_err());
}

#[test]
fn watch_parsing() {
    let cli = parse(&[
        "taiko-bindings",
        "watch",
        "--contract",
        "ForcedInclusionStore",
        "--event",
        "ForcedInclusionStored",
        "--from-block",
        "100",
    ]);

    assert!(matches!(
        cli.command,
        Command::Watch {
            from_block: Some(100),
            ..
        }
    ));
}

#[test]
fn config_from_file_env_and_args() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("taiko-bindings.toml"),
        r#"
        [default]
        l1_endpoint = "ws://file:8546"
        backfill_chunk_size = 100

        [default.contracts]
        fork_router = "0x00000000000000000000000000000000000000f0"

        [cli]
        fork = "shasta"
        "#,
    )
    .unwrap();

    let config: Config = temp_env::with_vars(
        [("TAIKO_BINDINGS_POLL_INTERVAL_MS", Some("500"))],
        || ConfigBuilder::new(isolated(&home)).build().unwrap(),
    );

    assert_eq!(config.chain.l1_endpoint, "ws://file:8546");
    assert_eq!(config.chain.backfill_chunk_size, 100);
    assert_eq!(config.chain.poll_interval_ms, Some(500));
    assert_eq!(config.fork, Some(Fork::Shasta));
    assert_eq!(
        config.contract_address("ForkRouter", None).unwrap(),
        "0x00000000000000000000000000000000000000f0"
            .parse::<alloy_primitives::Address>()
            .unwrap()
    );
    assert!(config.contract_address("PreconfWhitelist", None).is_err());

    // cli beats the file
    let mut args = isolated(&home);
    args.l1_endpoint = Some("http://cli:8545".to_string());
    args.fork = Some(Fork::Pacaya);

    let config: Config = ConfigBuilder::new(args).build().unwrap();
    assert_eq!(config.chain.l1_endpoint, "http://cli:8545");
    assert_eq!(config.fork, Some(Fork::Pacaya));
}

#[test]
fn explicit_address_wins() {
    let config = Config::default();

    let address = config
        .contract_address(
            "ForkRouter",
            Some("0x00000000000000000000000000000000000000f1"),
        )
        .unwrap();
    assert_eq!(
        address,
        "0x00000000000000000000000000000000000000f1"
            .parse::<alloy_primitives::Address>()
            .unwrap()
    );

    assert!(config.contract_address("ForkRouter", Some("nope")).is_err());
    assert!(config.named_contract_address("TaikoAnchor", None).is_err());
}

#[test]
fn home_is_a_path() {
    let cli = parse(&["taiko-bindings", "--home", "/tmp/taiko", "contracts"]);
    assert_eq!(cli.args.home, Some(PathBuf::from("/tmp/taiko")));
}
