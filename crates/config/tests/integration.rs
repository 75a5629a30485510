//! Integration tests for config

#[cfg(test)]
mod tests {
    use sheetcheck_config::*;
    use sheetcheck_errors::{ConfigError, Error};
    use sheetcheck_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "SHEETCHECK_OUTPUT",
        "SHEETCHECK_COLOR",
        "SHEETCHECK_FORCE",
        "SHEETCHECK_CONCURRENCY",
        "SHEETCHECK_DATABASE",
        "SHEETCHECK_INPUT_DIR",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[processing]
force_reprocess = true
concurrency = 4

[storage]
database_path = "/var/lib/sheetcheck/results.sqlite"

[source]
input_dir = "/data/submissions"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert!(config.processing.force_reprocess);
        assert_eq!(config.processing.concurrency, 4);
        assert_eq!(config.processing.entity_separators, vec!["_", "-", " "]);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/sheetcheck/results.sqlite")
        );
        assert_eq!(config.input_dir(), PathBuf::from("/data/submissions"));
        assert_eq!(config.source.extensions, vec!["xlsx", "xlsm", "xltx", "xltm"]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[processing]\nconcurrency = 0").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[processing\nconcurrency = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SHEETCHECK_OUTPUT", "json");
        std::env::set_var("SHEETCHECK_COLOR", "always");
        std::env::set_var("SHEETCHECK_FORCE", "yes");
        std::env::set_var("SHEETCHECK_CONCURRENCY", "8");
        std::env::set_var("SHEETCHECK_DATABASE", "/tmp/results.sqlite");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert!(config.processing.force_reprocess);
        assert_eq!(config.processing.concurrency, 8);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/results.sqlite"));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SHEETCHECK_CONCURRENCY", "0");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
        std::env::set_var("SHEETCHECK_FORCE", "maybe");
        assert!(config.merge_env().is_err());

        clear_env();
    }
}
