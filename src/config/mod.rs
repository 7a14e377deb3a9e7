//! Run configuration.
//!
//! Built-in defaults, optionally overlaid by a TOML file, finally overlaid
//! by command-line flags. The result is passed by reference into every
//! component and never changes during a run.

mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./vidprep.toml",
        "~/.config/vidprep/config.toml",
        "/etc/vidprep/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let container = &config.policy.container;
    if container.is_empty() || container.starts_with('.') || container.contains(['/', '\\']) {
        anyhow::bail!("Invalid container extension: {:?}", container);
    }

    if config.policy.video_codec.is_empty() {
        anyhow::bail!("Target video codec cannot be empty");
    }

    if config.policy.audio_codec.is_empty() {
        anyhow::bail!("Target audio codec cannot be empty");
    }

    if config.subtitles.language.trim().is_empty() {
        anyhow::bail!("Subtitle language cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.policy.container, "mkv");
        assert_eq!(config.policy.video_codec, "libx264");
        assert_eq!(config.policy.audio_codec, "ac3");
        assert_eq!(config.policy.preset, "slow");
        assert!(config.policy.unsupported_video_codecs.contains("hevc"));
        assert!(config.policy.unsupported_audio_codecs.contains("dts"));
        assert!(config.policy.unsupported_audio_codecs.contains("dca"));
        assert_eq!(config.subtitles.language, "eng");
        assert!(!config.subtitles.force_download);
        assert_eq!(config.subtitles.embedded_codecs, vec!["subrip"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[policy]
container = "mp4"
unsupported_audio_codecs = []

[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
"#,
        )
        .unwrap();

        assert_eq!(config.policy.container, "mp4");
        assert!(config.policy.unsupported_audio_codecs.is_empty());
        assert!(config.policy.unsupported_video_codecs.contains("hevc"));
        assert_eq!(config.subtitles, SubtitlePolicy::default());
        assert_eq!(
            config.tools.ffmpeg,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vidprep.toml");
        std::fs::write(
            &path,
            "[subtitles]\nlanguage = \"spa\"\nforce_download = true\n",
        )
        .unwrap();

        let config = load_config_or_default(Some(&path)).unwrap();
        assert_eq!(config.subtitles.language, "spa");
        assert!(config.subtitles.force_download);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_config(Path::new("/nonexistent/vidprep.toml")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_container() {
        let mut config = Config::default();
        config.policy.container = ".mkv".to_string();
        assert!(validate_config(&config).is_err());

        config.policy.container = "a/b".to_string();
        assert!(validate_config(&config).is_err());

        config.policy.container = "mp4".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_language() {
        let mut config = Config::default();
        config.subtitles.language = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
