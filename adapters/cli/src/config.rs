use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use skirmish_system_generation::GenerationConfig;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: u32,
    #[serde(default)]
    generation: GenerationConfig,
}

/// Loads generator tuning from a TOML file.
pub(crate) fn load_generation_config(path: &Path) -> Result<GenerationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read generator config at {}", path.display()))?;
    parse_generation_config(&contents)
        .with_context(|| format!("invalid generator config at {}", path.display()))
}

fn parse_generation_config(contents: &str) -> Result<GenerationConfig> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse generator config toml contents")?;
    if file.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported generator config version {}; expected {}",
            file.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    file.generation.validate()?;
    Ok(file.generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let config = parse_generation_config(
            r#"
            version = 1

            [generation]
            cluster_min = 12
            cluster_max = 14
            "#,
        )
        .expect("valid config");

        assert_eq!(config.cluster_range(), 12..=14);
        assert_eq!(config.window_size, GenerationConfig::default().window_size);
    }

    #[test]
    fn missing_table_means_defaults() {
        let config = parse_generation_config("version = 1").expect("valid config");
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = parse_generation_config("version = 2").expect_err("version 2 is unknown");
        assert!(error.to_string().contains("unsupported generator config version 2"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = parse_generation_config(
            r#"
            version = 1

            [generation]
            window_size = 0
            "#,
        )
        .expect_err("empty window");
        assert!(error.to_string().contains("window size"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_generation_config("version = 1\nseed = 3").is_err());
    }
}
