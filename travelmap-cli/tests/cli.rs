use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> (PathBuf, PathBuf) {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("expected workspace layout")
        .join("fixtures")
        .join(name);
    (root.join("coords.txt"), root.join("conns.txt"))
}

fn travelmap() -> Command {
    Command::cargo_bin("travelmap").expect("binary built")
}

#[test]
fn json_report_for_consistent_graph() {
    let (coords, conns) = fixture("triangle");
    let out = travelmap()
        .args(["--coords", coords.to_str().unwrap()])
        .args(["--conns", conns.to_str().unwrap()])
        .args(["--iterations", "200", "--seed", "1", "--json"])
        .output()
        .expect("run travelmap");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json stdout");
    assert_eq!(report["locations"], 3);
    assert_eq!(report["connections"], 3);
    let scale = report["params"]["avgDistancePerTime"].as_f64().unwrap();
    assert!((scale - 1.0).abs() < 1e-9);
    assert_eq!(report["summary"]["iterations"], 200);
    assert!(report["summary"]["finalError"].as_f64().unwrap() < 1e-9);
    assert!(report["comparison"]["maxDisplacement"].as_f64().unwrap() < 1e-9);
}

#[test]
fn writes_positions_that_reload() {
    let (coords, conns) = fixture("kanto");
    let tmp = tempfile::tempdir().expect("tempdir");
    let first = tmp.path().join("first.txt");

    travelmap()
        .args(["--coords", coords.to_str().unwrap()])
        .args(["--conns", conns.to_str().unwrap()])
        .args(["--selection", "exhaustive-worst", "--rate", "fixed"])
        .args(["--iterations", "500", "--out", first.to_str().unwrap()])
        .assert()
        .success();

    let text = fs::read_to_string(&first).expect("read output");
    assert!(text.starts_with("# name,x,y"));
    assert_eq!(text.lines().count(), 8);
    assert!(text.lines().any(|l| l.starts_with("Odawara,")));

    let out = travelmap()
        .args(["--coords", first.to_str().unwrap()])
        .args(["--conns", conns.to_str().unwrap()])
        .args(["--iterations", "10", "--seed", "5"])
        .output()
        .expect("rerun travelmap");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Graph: 7 locations, 11 connections"));
    assert!(stdout.contains("- Tokyo ("));
}

#[test]
fn missing_location_fails() {
    let (coords, _) = fixture("triangle");
    let tmp = tempfile::tempdir().expect("tempdir");
    let conns = tmp.path().join("conns.txt");
    fs::write(&conns, "P,Z,0:10\n").unwrap();

    let out = travelmap()
        .args(["--coords", coords.to_str().unwrap()])
        .args(["--conns", conns.to_str().unwrap()])
        .output()
        .expect("run travelmap");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown location"));
}

#[test]
fn zero_travel_time_is_fatal() {
    let (coords, _) = fixture("triangle");
    let tmp = tempfile::tempdir().expect("tempdir");
    let conns = tmp.path().join("conns.txt");
    fs::write(&conns, "# all zero\nP,Q,0:00\nQ,R,0:00\n").unwrap();

    travelmap()
        .args(["--coords", coords.to_str().unwrap()])
        .args(["--conns", conns.to_str().unwrap()])
        .assert()
        .failure();
}
