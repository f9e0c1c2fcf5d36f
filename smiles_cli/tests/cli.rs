use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

/// Nothing listens here; any command that reaches the network fails fast.
const DEAD_API: &str = "http://127.0.0.1:9";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("smiles_cli").unwrap();
    cmd.env("API_BASE_URL", DEAD_API)
        .env_remove("BATCH_MODE")
        .env_remove("CSV_LAYOUT")
        .env_remove("MIN_LINE_LENGTH");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    String::from_utf8(cmd.output().unwrap().stdout).unwrap()
}

#[test]
fn cli_help_smoke() {
    cli().arg("--help").assert().success();
}

#[test]
fn validate_accepts_balanced_smiles() {
    let mut cmd = cli();
    cmd.args(["validate", "C[C@H](C)O"]);
    cmd.assert().success();
    assert_eq!(stdout_of(&mut cmd).trim(), "Valid SMILES structure detected");
}

#[test]
fn validate_rejects_unbalanced_smiles() {
    let mut cmd = cli();
    cmd.args(["validate", "C(C"]);
    cmd.assert().failure();
    assert_eq!(stdout_of(&mut cmd).trim(), "Invalid SMILES format");
}

#[test]
fn validate_ignores_broken_configuration() {
    let mut cmd = cli();
    cmd.env("MIN_LINE_LENGTH", "abc")
        .env("API_BASE_URL", "not a url")
        .args(["validate", "CC"]);
    cmd.assert().success();
    assert_eq!(stdout_of(&mut cmd).trim(), "Valid SMILES structure detected");
}

#[test]
fn broken_configuration_fails_network_commands() {
    cli()
        .env("MIN_LINE_LENGTH", "abc")
        .args(["predict", "CCO"])
        .assert()
        .failure();
}

#[test]
fn invalid_smiles_never_reaches_the_api() {
    let output = cli().args(["predict", "C C"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid SMILES detected"), "{stderr}");
    assert!(!stderr.contains("Analysis failed"), "{stderr}");
}

#[test]
fn unreachable_api_reports_failure() {
    let output = cli().args(["predict", "CCO"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Analysis failed"), "{stderr}");
}

#[test]
fn batch_with_blank_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("empty.txt");
    fs::write(&input, "\n   \n\r\n").unwrap();

    let output = cli().arg("batch").arg(&input).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No SMILES found"), "{stderr}");
}

#[test]
fn batch_rejects_unsupported_extension() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("molecules.sdf");
    fs::write(&input, "CCO\n").unwrap();

    cli().arg("batch").arg(&input).assert().failure();
}

#[test]
fn sequential_batch_against_dead_api_writes_error_rows() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("molecules.txt");
    let out = tmp.path().join("out.csv");
    fs::write(&input, "CC(=O)O\n\nCCC\n  \n").unwrap();

    cli()
        .arg("batch")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--layout", "detailed"])
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(
        csv,
        "SMILES,Result,Confidence,GNN_Prob,RF_Prob\n\
         CC(=O)O,ERROR,0.00%,0.00%,0.00%\n\
         CCC,ERROR,0.00%,0.00%,0.00%\n"
    );
}

#[test]
fn schema_lists_wire_types() {
    let stdout = stdout_of(cli().arg("schema"));
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let schemas = &doc["components"]["schemas"];
    assert!(schemas["PredictionRequest"].is_object());
    assert!(schemas["BatchRequest"]["properties"]["smiles_list"].is_object());
    assert!(schemas["AnalysisResult"]["properties"]["isActive"].is_object());
}
