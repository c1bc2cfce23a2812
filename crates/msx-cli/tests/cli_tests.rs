//! Run the `msx` binary against fixture libraries and inspect its JSON.

use msx_test_utils::{sample_model, sample_plant, LibraryFixture};
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

fn msx(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msx"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run msx")
}

fn json_of(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "msx failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn fixture() -> LibraryFixture {
    LibraryFixture::new().with_assets(&[
        sample_model("tbdpec3r", "Mossy Rock"),
        sample_plant("pjvef", "Wild Fern"),
    ])
}

#[test]
fn index_then_hit() {
    let lib = fixture();
    let root = lib.root().to_str().unwrap();

    let first = json_of(&msx(lib.root(), &["index", "--library", root]));
    assert_eq!(first["status"], "rebuilt");
    assert_eq!(first["assets"], 2);
    assert_eq!(first["report"]["resolved"], 2);

    let second = json_of(&msx(lib.root(), &["index", "--library", root]));
    assert_eq!(second["status"], "hit");
    assert_eq!(second["hash"], first["hash"]);

    let forced = json_of(&msx(lib.root(), &["index", "--force", "--library", root]));
    assert_eq!(forced["status"], "rebuilt");
}

#[test]
fn status_reports_cache_state() {
    let lib = fixture();
    let root = lib.root().to_str().unwrap();

    let before = json_of(&msx(lib.root(), &["status", "--library", root]));
    assert_eq!(before["cache"]["valid"], false);
    assert_eq!(before["cache"]["manifest_present"], true);

    msx(lib.root(), &["index", "--library", root]);
    let after = json_of(&msx(lib.root(), &["status", "--library", root]));
    assert_eq!(after["cache"]["valid"], true);

    json_of(&msx(lib.root(), &["clear-cache", "--library", root]));
    let cleared = json_of(&msx(lib.root(), &["status", "--library", root]));
    assert_eq!(cleared["cache"]["index_present"], false);
}

#[test]
fn list_show_find_locate() {
    let lib = fixture();
    let root = lib.root().to_str().unwrap();

    let plants = json_of(&msx(lib.root(), &["list", "--type", "3dplant", "--library", root]));
    assert_eq!(plants.as_array().unwrap().len(), 1);
    assert_eq!(plants[0]["key"], "3dplant::Wild_Fern::pjvef");

    let rocks = json_of(&msx(lib.root(), &["list", "--tag", "rock", "--library", root]));
    assert_eq!(rocks[0]["lods"], serde_json::json!(["HIGH", "LOD0", "LOD1"]));

    let shown = json_of(&msx(lib.root(), &["show", "TBDPEC3R", "--library", root]));
    assert_eq!(shown["key"], "3d::Mossy_Rock::tbdpec3r");
    assert_eq!(shown["record"]["type"], "3d");

    let found = json_of(&msx(lib.root(), &["find", "pjvef", "--library", root]));
    assert_eq!(found["key"], "3dplant::Wild_Fern::pjvef");

    let located = json_of(&msx(lib.root(), &["locate", "pjvef", "--library", root]));
    assert!(located["path"].as_str().unwrap().ends_with("wild_fern_pjvef"));
}

#[test]
fn planning_commands() {
    let lib = fixture();
    let root = lib.root().to_str().unwrap();

    let geometry = json_of(&msx(
        lib.root(),
        &["geometry", "tbdpec3r", "--format", "abc", "--library", root],
    ));
    assert_eq!(geometry["format_switch"], 0);
    assert_eq!(geometry["render_files"].as_array().unwrap().len(), 1);

    let shader = json_of(&msx(lib.root(), &["shader", "tbdpec3r", "--library", root]));
    assert_eq!(shader["shader"]["bindings"][1]["target"]["kind"], "normal_map");
    assert_eq!(shader["to_generate"].as_array().unwrap().len(), 3);

    let batch = json_of(&msx(lib.root(), &["batch", "PJVEF", "nope", "--library", root]));
    assert_eq!(batch["ids"], serde_json::json!(["pjvef"]));

    let single = json_of(&msx(lib.root(), &["batch", "--single", "tbdpec3r", "--library", root]));
    assert_eq!(single["ids"], serde_json::json!(["tbdpec3r"]));
}

#[test]
fn unknown_asset_fails() {
    let lib = fixture();
    let root = lib.root().to_str().unwrap();

    let output = msx(lib.root(), &["show", "nothing", "--library", root]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("asset not found"));
}

#[test]
fn library_from_config_file() {
    let lib = fixture();
    let config = format!("library_path = {:?}\n", lib.root().to_str().unwrap());
    std::fs::write(lib.root().join("msx.toml"), config).unwrap();

    let value = json_of(&msx(lib.root(), &["index"]));
    assert_eq!(value["assets"], 2);
}

#[test]
fn no_library_and_no_companion_app() {
    let dir = tempfile::TempDir::new().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    std::fs::write(
        dir.path().join("msx.toml"),
        format!("[bridge]\nurl = \"http://127.0.0.1:{port}/GetMegascansFolder/\"\ntimeout_secs = 2\n"),
    )
    .unwrap();

    let output = msx(dir.path(), &["status"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("library path is not configured"));
}
