use std::env;
use std::path::{Path, PathBuf};

use repricer_core::config::AppConfig;
use toml::Value;

/// Renders the effective configuration with per-field source attribution
/// (env > file > default).
pub fn run(config: &AppConfig) -> String {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            Some("REPRICER_LOG_LEVEL"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_lowercase(),
        field_source(
            "logging.format",
            Some("REPRICER_LOG_FORMAT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "spot.gold",
        &config.spot.gold.map(|v| v.to_string()).unwrap_or_else(|| "(unset)".to_string()),
        field_source(
            "spot.gold",
            Some("REPRICER_GOLD_SPOT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "spot.silver",
        &config.spot.silver.map(|v| v.to_string()).unwrap_or_else(|| "(unset)".to_string()),
        field_source(
            "spot.silver",
            Some("REPRICER_SILVER_SPOT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.join("\n")
}

fn render_line(field: &str, value: &str, source: String) -> String {
    format!("  {field} = {value}  [{source}]")
}

fn field_source(
    field: &str,
    env_var: Option<&str>,
    doc: Option<&Value>,
    path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }
    if let (Some(doc), Some(path)) = (doc, path) {
        if doc_has_field(doc, field) {
            return format!("file:{}", path.display());
        }
    }
    "default".to_string()
}

fn doc_has_field(doc: &Value, dotted: &str) -> bool {
    let mut current = doc;
    for segment in dotted.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn detect_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("REPRICER_CONFIG") {
        let path = PathBuf::from(path.trim());
        if path.exists() {
            return Some(path);
        }
    }
    let default = PathBuf::from("repricer.toml");
    default.exists().then_some(default)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = std::fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

#[cfg(test)]
mod tests {
    use repricer_core::config::AppConfig;

    use super::{doc_has_field, run};

    #[test]
    fn renders_every_field_with_a_source_tag() {
        let output = run(&AppConfig::default());
        assert!(output.contains("logging.level = info"));
        assert!(output.contains("logging.format = compact"));
        assert!(output.contains("spot.gold"));
        assert!(output.contains("spot.silver"));
        assert!(output.contains('['));
    }

    #[test]
    fn dotted_field_lookup_walks_nested_tables() {
        let doc: toml::Value =
            "[spot]\ngold = \"2000\"\n".parse().expect("toml doc");
        assert!(doc_has_field(&doc, "spot.gold"));
        assert!(!doc_has_field(&doc, "spot.silver"));
        assert!(!doc_has_field(&doc, "logging.level"));
    }
}
