//! End-to-end runs of the `dropclaim` binary against local files.

#![allow(
    clippy::indexing_slicing,
    reason = "Test code - relax these lints for clarity"
)]

use std::path::Path;

use assert_cmd::Command;

fn dropclaim(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dropclaim").expect("binary should be built");
    cmd.current_dir(dir)
        .env_remove("RPC_URL")
        .env("RUST_LOG", "warn");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).expect("output should exist");
    serde_json::from_str(&raw).expect("output should be json")
}

#[test]
fn snapshot_schema_writes_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    dropclaim(dir.path())
        .args(["snapshot", "schema"])
        .assert()
        .success();
    assert!(read_json(&dir.path().join("allowlist-schema.json")).is_object());
}

#[test]
fn snapshot_build_and_proof() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("allowlist.json"),
        r#"[
          { "address": "0x0000000000000000000000000000000000000001", "maxClaimable": "2" },
          { "address": "0x0000000000000000000000000000000000000002", "price": "0.1" },
          { "address": "0x0000000000000000000000000000000000000003" }
        ]"#,
    )
    .expect("Failed to write allowlist");

    dropclaim(dir.path())
        .args(["snapshot", "build"])
        .assert()
        .success();
    let snapshot = read_json(&dir.path().join("snapshot.json"));
    assert!(snapshot["merkleRoot"].is_string());

    dropclaim(dir.path())
        .args([
            "snapshot",
            "proof",
            "--claimer",
            "0x0000000000000000000000000000000000000002",
        ])
        .assert()
        .success();
    let proof = read_json(&dir.path().join("allowlist-proof.json"));
    assert_eq!(proof["proof"]["pricePerToken"], "0x16345785d8a0000");
    assert_eq!(
        proof["proof"]["quantityLimitPerWallet"],
        "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    );
}

#[test]
fn claim_params_without_rpc_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    dropclaim(dir.path())
        .args([
            "claim",
            "params",
            "--contract",
            "0x00000000000000000000000000000000000000d0",
            "--receiver",
            "0x00000000000000000000000000000000000000b0",
        ])
        .assert()
        .failure();
}
