use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Per-deployment settings. Replaces the page globals the old markup relied
/// on (company name baked into the template, `window.OSMA_ENABLED`): the
/// loaded value is passed explicitly into the components that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name shown in the header and welcome message.
    pub company: String,
    /// Tenant slug used for per-tenant static resources.
    pub tenant: String,
    /// Base URL of the assistant backend.
    pub backend_url: String,
    /// Whether the OSMA data-exploration switch is offered at all.
    pub osma_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company: "Mi Empresa".to_string(),
            tenant: "default".to_string(),
            backend_url: "http://127.0.0.1:5000".to_string(),
            osma_enabled: false,
        }
    }
}

impl Settings {
    /// Get the platform-specific settings directory
    pub fn settings_dir() -> Result<PathBuf, String> {
        let config_dir = if cfg!(target_os = "windows") || cfg!(target_os = "macos") {
            dirs::config_dir()
                .ok_or("Could not find config directory")?
                .join("charla")
        } else {
            // Linux/Unix: $HOME/.charla
            dirs::home_dir()
                .ok_or("Could not find home directory")?
                .join(".charla")
        };

        Ok(config_dir)
    }

    /// Get the full path to the settings file
    pub fn settings_path() -> Result<PathBuf, String> {
        Ok(Self::settings_dir()?.join("settings.toml"))
    }

    /// Load settings from the config file
    pub fn load() -> Result<Self, String> {
        let path = Self::settings_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;

        let settings: Settings = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings file: {}", e))?;

        Ok(settings)
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::settings_dir()?;

        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let path = Self::settings_path()?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    pub fn welcome_message(&self) -> String {
        format!(
            "¡Hola! Soy el asistente de {}. ¿En qué puedo ayudarte hoy?",
            self.company
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.company, "Mi Empresa");
        assert_eq!(settings.tenant, "default");
        assert!(!settings.osma_enabled);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let settings: Settings = toml::from_str("tenant = \"acme\"").unwrap();
        assert_eq!(settings.tenant, "acme");
        assert_eq!(settings.company, "Mi Empresa");
        assert_eq!(settings.backend_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_roundtrip() {
        let mut settings = Settings::default();
        settings.osma_enabled = true;
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_welcome_mentions_company() {
        let mut settings = Settings::default();
        settings.company = "Acme".to_string();
        assert!(settings.welcome_message().contains("Acme"));
    }
}
