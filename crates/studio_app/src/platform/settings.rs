use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use studio_engine::{EffectMode, EngineConfig, ServiceConfig};
use studio_logging::studio_info;

/// Everything the app reads from its RON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub service: ServiceConfig,
    pub output_dir: PathBuf,
    pub download_prefix: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            output_dir: PathBuf::from("output"),
            download_prefix: "simpsons".to_string(),
        }
    }
}

/// Command-line values that win over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub mode: Option<EffectMode>,
    pub effect_id: Option<String>,
}

impl AppSettings {
    /// Reads `path`; a missing file yields the defaults, a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                studio_info!("No settings file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading settings from {path:?}"));
            }
        };

        let settings: Self =
            ron::from_str(&content).with_context(|| format!("parsing settings in {path:?}"))?;
        studio_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(mode) = overrides.mode {
            self.service.mode = mode;
        }
        if let Some(effect_id) = overrides.effect_id {
            self.service.effect_id = effect_id;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            service: self.service.clone(),
            output_dir: self.output_dir.clone(),
            download_prefix: self.download_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, Overrides};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use studio_engine::EffectMode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = AppSettings::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("studio.ron");
        fs::write(
            &path,
            r#"(
                output_dir: "renders",
                service: (effect_id: "animeCharacter", max_poll_attempts: 5),
            )"#,
        )
        .unwrap();

        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("renders"));
        assert_eq!(settings.download_prefix, "simpsons");
        assert_eq!(settings.service.effect_id, "animeCharacter");
        assert_eq!(settings.service.max_poll_attempts, 5);
        assert_eq!(settings.service.poll_interval_ms, 2_000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("studio.ron");
        fs::write(&path, "(output_dir: ").unwrap();

        let err = AppSettings::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing settings"), "{err:#}");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut settings = AppSettings::default();
        settings.apply(Overrides {
            output_dir: Some(PathBuf::from("elsewhere")),
            mode: Some(EffectMode::VideoEffects),
            effect_id: Some("zombie".to_string()),
        });

        let config = settings.engine_config();
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.service.mode, EffectMode::VideoEffects);
        assert_eq!(config.service.effect_id, "zombie");
        assert_eq!(config.download_prefix, "simpsons");
    }
}
