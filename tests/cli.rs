use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn write_export(dir: &Path, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from("\"Datum\";\"Kategorie-Pfad\";\"Betrag\"\n");
    for (category, amount) in rows {
        content.push_str(&format!("\"02.01.2025\";\"{category}\";\"{amount}\"\n"));
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn sample(dir: &Path) -> PathBuf {
    write_export(dir, "ledger.csv", &[
        ("Income/Salary", "3.000,00"),
        ("Food/Groceries", "-200,00"),
        ("Food/Restaurants", "-50,00"),
    ])
}

fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("category-sankey").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn render_prints_category_totals() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    cmd(dir.path())
        .arg("render")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Read 3 rows"))
        .stdout(predicate::str::contains("Food/Restaurants"))
        .stdout(predicate::str::contains("-250.00"))
        .stdout(predicate::str::contains("Income source: Income"));
}

#[test]
fn render_writes_json_and_html() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    let json = dir.path().join("out").join("flow.json");
    let html = dir.path().join("out").join("flow.html");
    cmd(dir.path())
        .args(["render", "--quiet", "--threshold", "100"])
        .arg(&csv)
        .arg("--json")
        .arg(&json)
        .arg("--html")
        .arg(&html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    let nodes = parsed["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert!(nodes.iter().all(|n| n["path"] != "Food/Restaurants"));
    assert_eq!(parsed["links"].as_array().unwrap().len(), 3);
    assert!(std::fs::read_to_string(&html).unwrap().contains("Plotly.newPlot"));
}

#[test]
fn render_divisor_scales_values() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    cmd(dir.path())
        .args(["render", "--div", "10"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("300.00"))
        .stdout(predicate::str::contains("-25.00"));
}

#[test]
fn render_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["render", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn render_empty_export_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), "empty.csv", &[]);
    cmd(dir.path())
        .arg("render")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("income source"));
}

#[test]
fn render_everything_pruned_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    cmd(dir.path())
        .args(["render", "--threshold", "1000000"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to draw"));
}

#[test]
fn render_rejects_bad_amount() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), "bad.csv", &[("Food", "viel")]);
    cmd(dir.path())
        .arg("render")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount 'viel'"));
}

#[test]
fn render_verbose_lists_links() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    cmd(dir.path())
        .args(["render", "--verbose"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Income --250.00-> Food"))
        .stdout(predicate::str::contains("Income/Salary --3000.00-> Income"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kategorie-Pfad"));
    let path = dir
        .path()
        .join(".config")
        .join("category-sankey")
        .join("settings.json");
    assert!(path.exists());
}

#[test]
fn settings_file_changes_columns() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join(".config").join("category-sankey");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("settings.json"),
        r#"{"category_column": "Category", "amount_column": "Amount", "number_format": "plain"}"#,
    )
    .unwrap();
    let csv = dir.path().join("en.csv");
    std::fs::write(&csv, "Category;Amount\nSalary;1,500.00\nRent;-700.00\n").unwrap();
    cmd(dir.path())
        .arg("render")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,500.00"))
        .stdout(predicate::str::contains("-700.00"));
}

#[test]
fn render_adds_up_identical_files_unless_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample(dir.path());
    let copy = dir.path().join("copy.csv");
    std::fs::copy(&csv, &copy).unwrap();
    cmd(dir.path())
        .arg("render")
        .arg(&csv)
        .arg(&copy)
        .assert()
        .success()
        .stdout(predicate::str::contains("6,000.00"));
    cmd(dir.path())
        .args(["render", "--skip-duplicates"])
        .arg(&csv)
        .arg(&copy)
        .assert()
        .success()
        .stdout(predicate::str::contains("identical to an earlier file"))
        .stdout(predicate::str::contains("3,000.00"))
        .stdout(predicate::str::contains("6,000.00").not());
}

#[test]
fn render_nested_income_source() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), "refund.csv", &[
        ("Income/Salary", "3.000,00"),
        ("Income/Refund", "-500,00"),
        ("Food", "-200,00"),
    ]);
    cmd(dir.path())
        .args(["render", "--verbose"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Income source: Income/Salary"))
        .stdout(predicate::str::contains("Income/Salary --2500.00-> Income"))
        .stdout(predicate::str::contains("Income/Salary --3000.00-> Income").not());
}
