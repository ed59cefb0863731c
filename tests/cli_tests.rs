mod common;
use common::{Sandbox, history_rows, row};
use predicates::prelude::*;
use std::fs;

#[test]
fn init_creates_the_database() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));
    assert!(std::path::Path::new(&sb.db()).exists());
}

#[test]
fn load_then_list() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("anna.csv", &history_rows(3));

    sb.cmd()
        .args(["load", &file, "--chunk-size", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 readings for 'anna'"));

    sb.cmd()
        .args(["list", "--user", "anna"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2021-02-18 08:02"))
        .stdout(predicate::str::contains("3 reading(s)"));
}

#[test]
fn list_with_range() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("anna.csv", &history_rows(10));
    sb.cmd().args(["load", &file]).assert().success();

    sb.cmd()
        .args([
            "list",
            "--start",
            "2021-02-18 08:03",
            "--stop",
            "2021-02-18 08:05",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 reading(s)"));
}

#[test]
fn minmax_reports_extremes() {
    let sb = Sandbox::new();
    sb.init();
    let rows = vec![
        row("18-02-2021 08:00", "0", "140", ""),
        row("18-02-2021 08:15", "1", "", "62"),
        row("18-02-2021 08:30", "0", "201", ""),
    ];
    let file = sb.write_export("bert.csv", &rows);
    sb.cmd().args(["load", &file]).assert().success();

    sb.cmd()
        .args(["minmax", "--user", "bert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("62 mg/dL"))
        .stdout(predicate::str::contains("201 mg/dL"));
}

#[test]
fn show_prints_german_labels() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("carla.csv", &history_rows(1));
    sb.cmd().args(["load", &file]).assert().success();

    sb.cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seriennummer"))
        .stdout(predicate::str::contains("ABC-1234"))
        .stdout(predicate::str::contains("2021-02-18T08:00:00+01:00"));

    sb.cmd()
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reading found with id 42"));
}

#[test]
fn export_csv_and_json() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("dora.csv", &history_rows(2));
    sb.cmd().args(["load", &file]).assert().success();

    let csv_out = sb.path("out.csv").to_string_lossy().to_string();
    sb.cmd()
        .args(["export", "--format", "csv", "--file", &csv_out, "--user", "dora"])
        .assert()
        .success();
    let content = fs::read_to_string(&csv_out).unwrap();
    assert!(content.starts_with("id,user_id,device_name,device_serial_number,device_timestamp"));
    assert!(content.contains("2021-02-18T08:01:00+01:00"));
    assert_eq!(content.lines().count(), 3);

    let json_out = sb.path("out.json").to_string_lossy().to_string();
    sb.cmd()
        .args(["export", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(json.as_array().map(|a| a.len()), Some(2));
    assert_eq!(json[0]["recording_type"], "history");
    assert_eq!(json[1]["glucose_history_mg_dl"], 101);
}

#[test]
fn export_requires_absolute_path() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["export", "--format", "csv", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

#[test]
fn decode_error_exits_with_line_and_column() {
    let sb = Sandbox::new();
    sb.init();
    let mut rows = history_rows(2);
    rows.push(row("18-02-2021 09:00", "0", "zwölf", ""));
    let file = sb.write_export("emil.csv", &rows);

    sb.cmd()
        .args(["load", &file])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Decode error at line 6"))
        .stderr(predicate::str::contains("Glukosewert-Verlauf mg/dL"));
}

#[test]
fn missing_header_is_reported() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.path("junk.csv");
    fs::write(&file, "a,b,c\n1,2,3\n").unwrap();

    sb.cmd()
        .args(["load", &file.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to find header row"));
}

#[test]
fn log_lists_loads() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("fritz.csv", &history_rows(1));
    sb.cmd().args(["load", &file]).assert().success();

    sb.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fritz"))
        .stdout(predicate::str::contains("Loaded 1 readings"));
}

#[test]
fn db_info_counts_readings() {
    let sb = Sandbox::new();
    sb.init();
    let file = sb.write_export("gina.csv", &history_rows(4));
    sb.cmd().args(["load", &file]).assert().success();

    sb.cmd()
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total readings:"))
        .stdout(predicate::str::contains("Integrity check passed"));
}
