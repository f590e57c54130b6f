//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Edit => {
            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save_to(&config_path.to_path_buf())?;
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match std::process::Command::new(&editor).arg(config_path).status() {
                Ok(s) if s.success() => Output::success("Config saved."),
                Ok(_) => Output::warning("Editor exited with non-zero status."),
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Models => {
            Output::header("Models");
            let selected = settings.summary.selected_model.as_deref();
            for model in &settings.models {
                let marker = if Some(model.name.as_str()) == selected {
                    " (selected)"
                } else {
                    ""
                };
                let key = if model.resolve_api_key().is_some() {
                    "key set"
                } else {
                    "no key"
                };
                Output::list_item(&format!(
                    "{} - {} / {} [{}]{}",
                    model.name, model.provider, model.model, key, marker
                ));
            }
        }

        ConfigAction::Select { name } => {
            settings.select_model(name)?;
            settings.save_to(&config_path.to_path_buf())?;
            Output::success(&format!("Selected model '{}'.", name));
        }
    }

    Ok(())
}
