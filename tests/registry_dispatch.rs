//! Discovery, aliasing, and dispatch against a scripted bus.

use scpi_bench::bench::{Bench, RunValues};
use scpi_bench::catalog::loader::load_catalog;
use scpi_bench::catalog::template::ValueMap;
use scpi_bench::catalog::CommandMode;
use scpi_bench::error::BenchError;
use scpi_bench::transport::mock::MockTransport;
use std::fs;
use std::sync::Arc;

fn bench_with(mock: MockTransport) -> (Arc<MockTransport>, Bench, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("PS2303.csv"),
        "Name,CMD,GET/SET,Parameters\n\
         SETV,VOLT {value},SET,\n\
         GETV,MEAS:VOLT?,GET,\n\
         Output,OUTP {state},SET,state:ON;OFF\n\
         Recall,*RCL {slot},GET,slot\n",
    )
    .unwrap();

    let catalog = load_catalog(dir.path()).unwrap();
    let mock = Arc::new(mock);
    let bench = Bench::new(catalog, mock.clone());
    (mock, bench, dir)
}

fn discover_and_alias(bench: &Bench) {
    bench.registry().discover().unwrap();
    assert!(bench
        .registry()
        .assign_alias("psu", "ACME", "PS2303", "SN42 1.0"));
}

#[test]
fn end_to_end_set_builds_and_writes_the_command() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);

    let outcome = bench
        .run("psu", "SETV", RunValues::Single("3.3".to_string()))
        .unwrap();
    assert_eq!(outcome.command, "VOLT 3.3");
    assert_eq!(outcome.mode, CommandMode::Set);
    assert_eq!(
        mock.writes(),
        vec![("COM1".to_string(), "VOLT 3.3".to_string())]
    );
}

#[test]
fn end_to_end_get_queries_and_returns_response() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);
    mock.stub_response("COM1", "MEAS:VOLT?", "3.299");

    let outcome = bench.run("psu", "GETV", RunValues::None).unwrap();
    assert_eq!(outcome.response, "3.299");
}

#[test]
fn get_with_parameters_substitutes_before_querying() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);
    mock.stub_response("COM1", "*RCL 3", "OK");

    let values: ValueMap = [("slot", "3")].into_iter().collect();
    let outcome = bench.run("psu", "Recall", RunValues::Map(values)).unwrap();
    assert_eq!(outcome.command, "*RCL 3");
    assert_eq!(outcome.response, "OK");
}

#[test]
fn missing_value_reaches_no_instrument() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);

    let err = bench.run("psu", "Output", RunValues::None).unwrap_err();
    assert!(matches!(err, BenchError::MissingValue(name) if name == "state"));
    assert!(mock.writes().is_empty());
    assert!(mock.queries().iter().all(|(_, cmd)| cmd == "*IDN?"));
}

#[test]
fn alias_survives_rescan_of_the_same_device() {
    let (_mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);

    bench.registry().discover().unwrap();
    let outcome = bench
        .run("psu", "SETV", RunValues::Single("1.0".to_string()))
        .unwrap();
    assert_eq!(outcome.command, "VOLT 1.0");
}

#[test]
fn unplugged_device_stops_dispatching_until_it_returns() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);

    mock.remove_resource("COM1");
    bench.registry().discover().unwrap();
    assert!(matches!(
        bench.run("psu", "GETV", RunValues::None),
        Err(BenchError::AliasNotFound(_))
    ));

    mock.add_resource("COM1", "ACME,PS2303,SN42,1.0");
    bench.registry().discover().unwrap();
    assert!(bench.run("psu", "GETV", RunValues::None).is_ok());
}

#[test]
fn model_without_table_has_no_commands() {
    let (_mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,XR77,SN1,1.0"));
    bench.registry().discover().unwrap();
    assert!(bench.registry().assign_alias("gen", "ACME", "XR77", "SN1 1.0"));

    let (model, commands) = bench.commands_for("gen").unwrap();
    assert_eq!(model, "XR77");
    assert!(commands.is_empty());

    assert!(matches!(
        bench.run("gen", "SETV", RunValues::None),
        Err(BenchError::CommandNotFound { .. })
    ));
}

#[test]
fn transport_fault_propagates_without_touching_registry_state() {
    let (mock, bench, _dir) =
        bench_with(MockTransport::new().with_resource("COM1", "ACME,PS2303,SN42,1.0"));
    discover_and_alias(&bench);

    // The port goes bad after discovery: dispatch fails hard, but the
    // registry keeps its instrument and alias until a scan says otherwise.
    mock.fail_resource("COM1");
    assert!(matches!(
        bench.run("psu", "GETV", RunValues::None),
        Err(BenchError::Transport(_))
    ));
    assert!(bench.registry().resolve("psu").is_some());
}
