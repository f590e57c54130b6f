//! Doctor command - verify configuration and provider setup.

use crate::cli::Output;
use crate::config::Settings;
use crate::host::SettingsStore;
use crate::http::create_client_with_timeout;
use crate::provider::create_provider;
use console::style;
use std::path::Path;

/// Outcome of one diagnostic check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Ok, name, message, None)
    }

    fn warning(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Warning, name, message, Some(hint.into()))
    }

    fn error(name: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Error, name, message, Some(hint.into()))
    }

    fn with_status(
        status: CheckStatus,
        name: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            hint,
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };
        println!("  {} {} - {}", icon, style(self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("tldw Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let section = vec![check_config_file(config_path), check_prompts(settings)];
    print_section(&section);
    checks.extend(section);

    println!();

    println!("{}", style("Model").bold());
    let section = check_model(settings);
    print_section(&section);
    checks.extend(section);

    println!();

    println!("{}", style("Triggers").bold());
    Output::kv(
        "Web clips",
        enabled(settings.summary.auto_summarize_webclips),
    );
    Output::kv(
        "Pasted URLs",
        enabled(settings.summary.auto_summarize_pasted_urls),
    );

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Summaries will fail until they are fixed.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! tldw is ready to use.");
    }

    Ok(())
}

fn print_section(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

/// Check if the config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tldw config edit",
        )
    }
}

/// Check that custom prompts, if configured, load.
fn check_prompts(settings: &Settings) -> CheckResult {
    if !settings.summary.custom_prompt.trim().is_empty() {
        return CheckResult::ok("Prompt", "inline custom prompt");
    }
    match (&settings.prompts.custom_dir, settings.load_prompts()) {
        (None, _) => CheckResult::ok("Prompt", "built-in default"),
        (Some(dir), Ok(_)) => CheckResult::ok("Prompt", format!("from {}", dir)),
        (Some(dir), Err(e)) => CheckResult::warning(
            "Prompt",
            format!("failed to load from {}: {}", dir, e),
            "The built-in prompt is used instead",
        ),
    }
}

/// Selected model, its credential, and provider construction.
fn check_model(settings: &Settings) -> Vec<CheckResult> {
    let Some(model) = settings.selected_model() else {
        let hint = match &settings.summary.selected_model {
            Some(name) => format!("'{}' is not in [[models]]; see: tldw config models", name),
            None => "Select one with: tldw config select <NAME>".to_string(),
        };
        return vec![CheckResult::error("Selected model", "none", hint)];
    };

    let mut results = vec![CheckResult::ok(
        "Selected model",
        format!("{} ({} / {})", model.name, model.provider, model.model),
    )];

    match &model.api_key {
        Some(key) if model.has_credential() => {
            results.push(CheckResult::ok("API key", format!("configured ({})", mask_key(key))));
        }
        _ => {
            let env = settings
                .model(&model.name)
                .and_then(|m| m.api_key_env())
                .unwrap_or_else(|| "api_key".to_string());
            results.push(CheckResult::error(
                "API key",
                "not set",
                format!("Set with: export {}='...'", env),
            ));
        }
    }

    let provider = create_client_with_timeout(settings.request_timeout())
        .and_then(|http| create_provider(&model, http));
    results.push(match provider {
        Ok(p) => CheckResult::ok("Provider", p.vendor()),
        Err(e) => CheckResult::error(
            "Provider",
            e.to_string(),
            "Supported providers: openai, anthropic, gemini",
        ),
    });

    results
}

/// Mask an API key for display.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
