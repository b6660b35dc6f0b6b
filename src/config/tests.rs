use super::*;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    #[serial]
    fn config_dir_honours_env_override() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        // SAFETY: serialised with every other test touching the variable
        unsafe { std::env::set_var(settings::HOME_ENV_VAR, temp_dir.path()) };

        let dir = get_config_dir().expect("should resolve config dir");
        assert_eq!(dir, temp_dir.path());

        let config = Config::load_default().expect("should load defaults");
        assert_eq!(config.get_base_dir(), temp_dir.path());

        // SAFETY: see above
        unsafe { std::env::remove_var(settings::HOME_ENV_VAR) };
    }

    #[test]
    fn config_file_persistence() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config {
            ollama: OllamaConfig {
                protocol: "https".to_string(),
                host: "test-host".to_string(),
                port: 8080,
                embedding_model: "test-embed".to_string(),
                generation_model: "test-generate".to_string(),
                batch_size: 32,
                timeout_seconds: 60,
            },
            ..Config::default()
        };

        let toml_content = toml::to_string_pretty(&original_config)
            .expect("config should convert to toml string successfully");
        fs::write(&config_path, toml_content).expect("should write to config_path successfully");

        let content =
            fs::read_to_string(&config_path).expect("should read from config_path successfully");
        let loaded_config: Config = toml::from_str(&content).expect("should parse toml correctly");

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn invalid_toml_handling() {
        let invalid_toml = r#"
            [ollama
            host = "localhost"
            port = "invalid_port"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_config_with_defaults() {
        let partial_toml = r#"
            [ollama]
            host = "custom-host"

            [index]
            context_k = 4
        "#;

        let config: Config = toml::from_str(partial_toml).expect("should parse partial toml");
        assert_eq!(config.ollama.host, "custom-host");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.index.context_k, 4);
        assert_eq!(config.index.default_k, 5);
        assert_eq!(config.index.path_prefix, "papers");
    }

    #[test]
    fn missing_ollama_section_is_rejected() {
        let result: Result<Config, toml::de::Error> = toml::from_str("[index]\ndefault_k = 2\n");
        assert!(result.is_err());
    }
}
