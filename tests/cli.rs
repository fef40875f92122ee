use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CRYPTO_PAGE: &str = r#"import * as CryptoJS from 'crypto-js';
import { PermissionUtil } from '@pura/harmony-utils';
import { promptAction } from '@kit.ArkUI';

@Entry
@Component
export struct Index {
  aboutToAppear() {
    PermissionUtil.checkPermissions(['ohos.permission.CAMERA']);
    const key = CryptoJS.enc.Utf8.parse('0123456789abcdef');
    const salt = CryptoJS.lib.WordArray.random(16);
    const mode = CryptoJS.mode.CBC;
  }
}
"#;

fn arkstub() -> Command {
    Command::cargo_bin("arkstub").unwrap()
}

fn module_fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("entry");
    let pages = module.join("src/main/ets/pages");
    fs::create_dir_all(&pages).unwrap();
    fs::write(pages.join("Index.ets"), CRYPTO_PAGE).unwrap();
    fs::write(
        module.join("oh-package.json5"),
        "{\n  // entry module\n  \"name\": \"entry\",\n  \"version\": \"1.0.0\",\n  \"dependencies\": {},\n}\n",
    )
    .unwrap();
    (dir, module)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_help() {
    arkstub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_generate_writes_stubs() {
    let (dir, module) = module_fixture();

    arkstub()
        .arg("generate")
        .arg(&module)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 stub packages"));

    let dts = read(&dir.path().join("crypto-js/index.d.ts"));
    assert!(dts.contains("export declare namespace lib {"));
    assert!(dts.contains("static random(size: number): WordArray;"));
    assert!(dts.contains("export type WordArray = lib.WordArray;"));

    let utils = read(&dir.path().join("@pura/harmony-utils/index.d.ts"));
    assert!(utils.contains("export declare class PermissionUtil {}"));

    assert!(!dir.path().join("@kit.ArkUI").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&module.join("oh-package.json5"))).unwrap();
    assert_eq!(manifest["dependencies"]["crypto-js"], "file:../crypto-js");
    assert_eq!(
        manifest["dependencies"]["@pura/harmony-utils"],
        "file:../@pura/harmony-utils"
    );
}

#[test]
fn test_generate_dry_run_json() {
    let (dir, module) = module_fixture();

    let output = arkstub()
        .args(["generate", "--dry-run", "--json"])
        .arg(&module)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_scanned"], 1);
    assert_eq!(report["skipped_sdk_modules"][0], "@kit.ArkUI");
    assert_eq!(report["dependencies"].as_array().unwrap().len(), 2);
    assert!(report["written"].as_array().unwrap().is_empty());

    assert!(!dir.path().join("crypto-js").exists());
    assert!(read(&module.join("oh-package.json5")).contains("// entry module"));
}

#[test]
fn test_scan_lists_model() {
    let (dir, module) = module_fixture();

    arkstub()
        .arg("scan")
        .arg(&module)
        .assert()
        .success()
        .stdout(predicate::str::contains("crypto-js"))
        .stdout(predicate::str::contains("WordArray.static random(size: number): WordArray"));

    assert!(!dir.path().join("crypto-js").exists());
}

#[test]
fn test_config_file_is_used() {
    let (dir, module) = module_fixture();
    let config = dir.path().join("stub.toml");
    fs::write(&config, "[generate]\nstub_version = \"0.0.1\"\n").unwrap();

    arkstub()
        .arg("generate")
        .arg(&module)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let stub_manifest = read(&dir.path().join("crypto-js/oh-package.json5"));
    let stub: serde_json::Value = serde_json::from_str(&stub_manifest).unwrap();
    assert_eq!(stub["version"], "0.0.1");
}

#[test]
fn test_invalid_config_fails() {
    let (dir, module) = module_fixture();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[scan\n").unwrap();

    arkstub()
        .arg("scan")
        .arg(&module)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_missing_module_fails() {
    let dir = TempDir::new().unwrap();

    arkstub()
        .arg("generate")
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("module root not found"));
}
