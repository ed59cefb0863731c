#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header row of a device export, German labels as the app writes them.
pub const HEADER: &str = "Gerät,Seriennummer,Gerätezeitstempel,Aufzeichnungstyp,\
Glukosewert-Verlauf mg/dL,Glukose-Scan mg/dL,Nicht numerisches schnellwirkendes Insulin,\
Schnellwirkendes Insulin (Einheiten),Nicht numerische Nahrungsdaten,Kohlenhydrate (Gramm),\
Kohlenhydrate (Portionen),Nicht numerisches Depotinsulin,Depotinsulin (Einheiten),Notizen,\
Glukose-Teststreifen mg/dL,Keton mmol/L,Mahlzeiteninsulin (Einheiten),\
Korrekturinsulin (Einheiten),Insulin-Änderung durch Anwender (Einheiten)";

pub const PREAMBLE: [&str; 2] = [
    "Glukose-Daten,Erstellt am,18-02-2021 12:00 UTC,Erstellt von,Max Mustermann",
    "",
];

/// One data row: device identity, timestamp, type code and the two glucose
/// columns; every other column empty.
pub fn row(ts: &str, kind: &str, history: &str, scan: &str) -> String {
    let mut cells = vec![
        "FreeStyle LibreLink".to_string(),
        "ABC-1234".to_string(),
        ts.to_string(),
        kind.to_string(),
        history.to_string(),
        scan.to_string(),
    ];
    cells.resize(19, String::new());
    cells.join(",")
}

/// `n` history rows, one per minute from 18-02-2021 08:00, glucose 100 + i.
pub fn history_rows(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let ts = format!("18-02-2021 {:02}:{:02}", 8 + i / 60, i % 60);
            row(&ts, "0", &(100 + i).to_string(), "")
        })
        .collect()
}

/// Export text: the standard preamble, the header, then `rows`.
pub fn export_text(rows: &[String]) -> String {
    let mut out = String::new();
    for l in PREAMBLE {
        out.push_str(l);
        out.push('\n');
    }
    out.push_str(HEADER);
    out.push('\n');
    for r in rows {
        out.push_str(r);
        out.push('\n');
    }
    out
}

/// Isolated HOME + database for one test.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn db(&self) -> String {
        self.path("readings.sqlite").to_string_lossy().to_string()
    }

    /// Write an export file named `name` and return its absolute path.
    pub fn write_export(&self, name: &str, rows: &[String]) -> String {
        let p = self.path(name);
        fs::write(&p, export_text(rows)).expect("write export");
        p.to_string_lossy().to_string()
    }

    /// Binary with HOME pointing into the sandbox and `--db` set.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rglucologger");
        cmd.env("HOME", self.dir.path())
            .env("APPDATA", self.dir.path())
            .env_remove("RUST_LOG")
            .args(["--db", &self.db()]);
        cmd
    }

    /// `init --test` on the sandbox database.
    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }
}
