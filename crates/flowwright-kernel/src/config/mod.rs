//! Configuration loading
//!
//! Settings files may be written in YAML, TOML, JSON, INI, RON or JSON5; the
//! format is picked from the file extension. Before parsing, `${VAR}` and
//! `$VAR` references are replaced with environment values so credentials
//! can stay out of the file.

use config::{Config as Cfg, File};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::LazyLock;

pub use config::FileFormat;

static BRACED_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("braced env var pattern is valid")
});

static BARE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").expect("bare env var pattern is valid")
});

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect configuration format from file extension
///
/// `.yaml`/`.yml`, `.toml`, `.json`, `.ini`, `.ron` and `.json5` are
/// recognised; anything else is [`ConfigError::UnsupportedFormat`].
pub fn detect_format(path: impl AsRef<Path>) -> ConfigResult<FileFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Substitute environment variables in a string
///
/// Unset variables are left verbatim so the failure is visible downstream.
pub fn substitute_env_vars(content: &str) -> String {
    let braced = BRACED_VAR.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });

    BARE_VAR
        .replace_all(&braced, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Load configuration from a file
pub fn load_config<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let format = detect_format(path)?;
    tracing::debug!(path = %path.display(), ?format, "loading configuration");
    let content = std::fs::read_to_string(path)?;
    from_str(&content, format)
}

/// Load configuration from a string with explicit format
pub fn from_str<T>(content: &str, format: FileFormat) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    merge_configs(&[(content, format)])
}

/// Merge multiple configuration sources; later sources override earlier ones.
pub fn merge_configs<T>(sources: &[(&str, FileFormat)]) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let mut builder = Cfg::builder();

    for (content, format) in sources {
        let substituted = substitute_env_vars(content);
        builder = builder.add_source(File::from_str(&substituted, *format));
    }

    builder
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Whether `value` is a single `${VAR}` or `$VAR` reference that
/// substitution left in place, i.e. the variable was unset.
pub fn is_unresolved_env_ref(value: &str) -> bool {
    [&*BRACED_VAR, &*BARE_VAR].into_iter().any(|re| {
        re.find(value)
            .is_some_and(|m| m.start() == 0 && m.end() == value.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ProviderSection {
        model: String,
        api_key: Option<String>,
        temperature: Option<f32>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestSettings {
        provider: ProviderSection,
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("settings.yaml").unwrap(), FileFormat::Yaml);
        assert_eq!(detect_format("settings.yml").unwrap(), FileFormat::Yaml);
        assert_eq!(detect_format("settings.toml").unwrap(), FileFormat::Toml);
        assert_eq!(detect_format("settings.json").unwrap(), FileFormat::Json);
        assert_eq!(detect_format("settings.ini").unwrap(), FileFormat::Ini);
        assert_eq!(detect_format("settings.ron").unwrap(), FileFormat::Ron);
        assert_eq!(detect_format("settings.JSON5").unwrap(), FileFormat::Json5);
        assert!(matches!(
            detect_format("settings.txt"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(detect_format("settings").is_err());
    }

    #[test]
    fn test_substitution_both_syntaxes() {
        unsafe {
            std::env::set_var("FLOWWRIGHT_TEST_KEY", "secret");
        }
        assert_eq!(substitute_env_vars("key: ${FLOWWRIGHT_TEST_KEY}"), "key: secret");
        assert_eq!(substitute_env_vars("key: $FLOWWRIGHT_TEST_KEY"), "key: secret");
        assert_eq!(
            substitute_env_vars("key: ${FLOWWRIGHT_UNSET_VAR_XYZ}"),
            "key: ${FLOWWRIGHT_UNSET_VAR_XYZ}"
        );
    }

    #[test]
    fn test_unresolved_env_ref() {
        assert!(is_unresolved_env_ref("${GEMINI_API_KEY}"));
        assert!(is_unresolved_env_ref("$GEMINI_API_KEY"));
        assert!(!is_unresolved_env_ref("$ecr3t-key!"));
        assert!(!is_unresolved_env_ref("${GEMINI_API_KEY}-suffix"));
        assert!(!is_unresolved_env_ref("AIzaSyExample"));
        assert!(!is_unresolved_env_ref(""));
    }

    #[test]
    fn test_toml_with_substitution() {
        unsafe {
            std::env::set_var("FLOWWRIGHT_TEST_TOML_KEY", "abc123");
        }
        let toml = r#"
[provider]
model = "gemini-2.5-flash"
api_key = "${FLOWWRIGHT_TEST_TOML_KEY}"
temperature = 0.4
"#;
        let settings: TestSettings = from_str(toml, FileFormat::Toml).unwrap();
        assert_eq!(settings.provider.model, "gemini-2.5-flash");
        assert_eq!(settings.provider.api_key.as_deref(), Some("abc123"));
        assert_eq!(settings.provider.temperature, Some(0.4));
    }

    #[test]
    fn test_merge_later_overrides_earlier() {
        let base = r#"{ "provider": { "model": "gemini-2.5-flash", "temperature": 0.7 } }"#;
        let over = "provider:\n  model: gemini-2.5-pro\n";
        let settings: TestSettings =
            merge_configs(&[(base, FileFormat::Json), (over, FileFormat::Yaml)]).unwrap();
        assert_eq!(settings.provider.model, "gemini-2.5-pro");
        assert_eq!(settings.provider.temperature, Some(0.7));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flowwright.yml");
        std::fs::write(&path, "provider:\n  model: gemini-2.5-flash\n").unwrap();

        let settings: TestSettings = load_config(&path).unwrap();
        assert_eq!(settings.provider.model, "gemini-2.5-flash");
        assert_eq!(settings.provider.api_key, None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config::<TestSettings>(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
