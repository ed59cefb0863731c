use crate::config::Config;
use crate::errors::{AppError, AppResult};

use crate::cli::parser::Commands;
use crate::ui::messages::{error, success, warning};
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        // ---- PRINT CONFIG ----
        if *print_config {
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration:\n");
            println!("{}", yaml);
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            edit(&Config::config_file(), editor.as_deref());

            // il file modificato deve restare leggibile
            let reloaded = Config::load()?;
            reloaded.tz()?;
            reloaded.delimiter_byte()?;
            success("Configuration is valid.");
        }
    }

    Ok(())
}

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

/// Open `path` in the requested editor, falling back to the default one.
fn edit(path: &Path, requested: Option<&str>) {
    let fallback = default_editor();
    let first = requested.map(str::to_string).unwrap_or_else(|| fallback.clone());

    if run_editor(&first, path) {
        success(format!("Configuration file edited using '{}'", first));
        return;
    }

    warning(format!(
        "Editor '{}' not available, falling back to '{}'",
        first, fallback
    ));
    if run_editor(&fallback, path) {
        success(format!("Configuration file edited using '{}'", fallback));
    } else {
        error(format!(
            "Failed to edit configuration file using '{}'",
            fallback
        ));
    }
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}
