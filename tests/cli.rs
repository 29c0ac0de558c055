use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const LABEL: &str = "MADE OF: SUGAR, CORN SYRUP, HYDROGENATED PALM KERNEL OIL; LESS THAN 2% OF: \
                     CITRIC ACID, ARTIFICIAL FLAVORS, RED 40";

/// Runs in an empty directory with an empty home so no user config leaks in.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("riskread").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn image_text_json_report() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args([LABEL, "--source", "image", "--report", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["stats"]["total"], 6);
    assert_eq!(report["stats"]["harmful"], 2);
    assert_eq!(report["stats"]["controversial"], 2);
    assert_eq!(report["stats"]["safe"], 2);
    assert_eq!(report["source"], "image");
    assert_eq!(report["extraction"], "pipeline");
    assert_eq!(report["results"][2]["ingredient"], "hydrogenated palm kernel oil");
    assert_eq!(report["results"][2]["label"], "Harmful");
}

#[test]
fn quiet_summary_line() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([LABEL, "--source", "image", "--quiet"])
        .assert()
        .success()
        .stdout(contains("Total: 6"));
}

#[test]
fn terminal_report_lists_harmful() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("sugar, aspartame, water")
        .assert()
        .success()
        .stdout(contains("SUMMARY"))
        .stdout(contains("aspartame"));
}

#[test]
fn stdin_input() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-", "--quiet"])
        .write_stdin("oats, salt, msg\n")
        .assert()
        .success()
        .stdout(contains("Total: 3"));
}

#[test]
fn file_input() {
    let dir = TempDir::new().unwrap();
    let label = dir.path().join("label.txt");
    std::fs::write(&label, "Ingredients: flour; water; salt").unwrap();
    cmd(&dir)
        .args(["--file", label.to_str().unwrap(), "--quiet"])
        .assert()
        .success()
        .stdout(contains("Total: 3"));
}

#[test]
fn direct_ingredient_classification() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args(["--ingredient", "Aspartame", "--ingredient", "quinoa", "--report", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["extraction"], "direct");
    assert_eq!(report["results"][0]["label"], "Harmful");
    assert_eq!(report["results"][1]["label"], "Not Harmful");
    assert_eq!(report["results"][1]["source"]["stage"], "default");
}

#[test]
fn no_input_exits_1() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .assert()
        .code(1)
        .stderr(contains("No input provided"));
}

#[test]
fn gibberish_image_text_exits_1() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["xz qw rt pk bn", "--source", "image"])
        .assert()
        .code(1)
        .stderr(contains("No input provided"));
}

#[test]
fn no_ingredients_exits_1() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("a, of, the")
        .assert()
        .code(1)
        .stderr(contains("No ingredients found"));
}

#[test]
fn fail_on_harmful_exits_2() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["sugar, red 40", "--quiet", "--fail-on-harmful"])
        .assert()
        .code(2);

    cmd(&dir)
        .args(["sugar, salt", "--quiet", "--fail-on-harmful"])
        .assert()
        .success();
}

#[test]
fn failed_recognition_is_no_input() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[ocr]\ncommand = \"riskread-no-such-ocr-binary\"\n").unwrap();
    cmd(&dir)
        .args(["--image", "label.png", "--config", config.to_str().unwrap(), "--quiet"])
        .assert()
        .code(1)
        .stderr(contains("No input provided"));
}

#[test]
fn configured_rules_replace_builtin() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".riskread")).unwrap();
    std::fs::write(
        dir.path().join(".riskread").join("config.toml"),
        r#"
[rules]
harmful_keywords = ["sugar"]
"#,
    )
    .unwrap();

    let output = cmd(&dir)
        .args(["--ingredient", "sugar", "--report", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["results"][0]["label"], "Harmful");
    assert_eq!(report["results"][0]["source"]["stage"], "harmful-keyword");
}

#[test]
fn model_artifact_decides_unknown_names() {
    let dir = TempDir::new().unwrap();
    let model = dir.path().join("model.json");
    std::fs::write(
        &model,
        r#"{"intercept": [0.0, 0.0, 0.0], "weights": {"quinoa": [0.0, 1.0, 0.0]}}"#,
    )
    .unwrap();

    let output = cmd(&dir)
        .args(["--ingredient", "quinoa", "--model", model.to_str().unwrap(), "--report", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["results"][0]["label"], "Controversial");
    assert_eq!(report["results"][0]["source"]["stage"], "model");
}

#[test]
fn pdf_report_is_written() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["sugar, salt, red 40", "--pdf"])
        .assert()
        .success()
        .stderr(contains("PDF report written to"));
    assert!(dir.path().join("riskread-report.pdf").exists());
}
