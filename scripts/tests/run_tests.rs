mod common;

use common::FakeToolchain;
use eyre::Result;
use scripts::{cli::TestArgs, commands::run_tests, errors::ScriptError};

const RPC_URL: &str = "https://eth.example.org";

fn args(options: &[&str]) -> TestArgs {
    TestArgs {
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

#[test]
fn test_rejects_non_mainnet() {
    let toolchain = FakeToolchain::on_chain("sepolia");

    let res = run_tests(args(&["match=testFoo"]), Some(RPC_URL), &toolchain);

    assert!(matches!(res, Err(ScriptError::NetworkMismatch(_))));
    assert_eq!(
        res.unwrap_err().to_string(),
        "Please set a Mainnet ETH_RPC_URL"
    );
    assert!(toolchain.invocations.borrow().is_empty());
}

#[test]
fn test_missing_rpc_url() {
    let toolchain = FakeToolchain::mainnet();

    for rpc_url in [None, Some("")] {
        let res = run_tests(args(&["match=testFoo"]), rpc_url, &toolchain);

        match res {
            Err(ScriptError::NetworkMismatch(msg)) => {
                assert_eq!(msg, "Please set a Mainnet ETH_RPC_URL")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert!(toolchain.chain_queries.borrow().is_empty());
    assert!(toolchain.invocations.borrow().is_empty());
}

#[test]
fn test_chain_checked_against_given_url() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&[]), Some(RPC_URL), &toolchain)?;

    assert_eq!(*toolchain.chain_queries.borrow(), [RPC_URL]);
    Ok(())
}

#[test]
fn test_chain_check_failure_stops_run() {
    let toolchain = FakeToolchain {
        chain: None,
        ..FakeToolchain::mainnet()
    };

    let res = run_tests(args(&[]), Some(RPC_URL), &toolchain);

    assert!(matches!(res, Err(ScriptError::CommandExecution(_))));
    assert!(toolchain.invocations.borrow().is_empty());
}

#[test]
fn test_no_arguments() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&[]), Some(RPC_URL), &toolchain)?;

    assert_eq!(toolchain.last_invocation().flags, ["--fork-url", RPC_URL]);
    Ok(())
}

#[test]
fn test_match_ignores_no_match() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&["match=foo", "no-match=bar"]), Some(RPC_URL), &toolchain)?;

    let flags = toolchain.last_invocation().flags;
    assert_eq!(flags, ["--fork-url", RPC_URL, "-vvv", "--match-test", "foo"]);
    assert!(!flags.iter().any(|f| f == "--no-match-test"));
    Ok(())
}

#[test]
fn test_no_match_with_block() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&["block=123", "no-match=bar"]), Some(RPC_URL), &toolchain)?;

    assert_eq!(
        toolchain.last_invocation().flags,
        [
            "--fork-url",
            RPC_URL,
            "-vvv",
            "--no-match-test",
            "bar",
            "--fork-block-number",
            "123"
        ]
    );
    Ok(())
}

#[test]
fn test_unknown_key_ignored() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&["foo=bar"]), Some(RPC_URL), &toolchain)?;

    assert_eq!(toolchain.last_invocation().flags, ["--fork-url", RPC_URL]);
    Ok(())
}

#[test]
fn test_end_to_end_invocation() -> Result<()> {
    let toolchain = FakeToolchain::mainnet();

    run_tests(args(&["match=testFoo", "block=17000000"]), Some(RPC_URL), &toolchain)?;

    let invocation = toolchain.last_invocation();
    assert_eq!(
        invocation.flags,
        [
            "--fork-url",
            RPC_URL,
            "-vvv",
            "--match-test",
            "testFoo",
            "--fork-block-number",
            "17000000"
        ]
    );
    assert_eq!(
        invocation.env,
        [("FOUNDRY_CHAIN_ID".to_string(), "1".to_string())]
    );
    Ok(())
}

#[test]
fn test_exit_code_propagated() -> Result<()> {
    let toolchain = FakeToolchain {
        exit_code: 3,
        ..FakeToolchain::mainnet()
    };

    assert_eq!(run_tests(args(&[]), Some(RPC_URL), &toolchain)?, 3);
    Ok(())
}
