use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path, models or timeouts are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/': `{}`", self.server.health.path);
        }

        if self.gemini.speech_model.trim().is_empty() {
            anyhow::bail!("gemini.speech_model must not be empty");
        }

        if self.gemini.text_model.trim().is_empty() {
            anyhow::bail!("gemini.text_model must not be empty");
        }

        if self.proxy_probe.timeout()?.is_zero() {
            anyhow::bail!("proxy_probe.timeout must be greater than zero");
        }

        if self.gemini.repair_timeout()?.is_zero() {
            anyhow::bail!("gemini.repair_timeout must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::SocketAddr;

    use indoc::indoc;

    use crate::{Config, LogFormat};

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.server.listen_address(), SocketAddr::from(([0, 0, 0, 0], 8698)));
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");
        assert_eq!(config.telemetry.filter, "info");
        assert_eq!(config.telemetry.format, LogFormat::Text);
    }

    #[test]
    fn full_file_parses() {
        let config = Config::from_toml(indoc! {r#"
            [server]
            listen_address = "127.0.0.1:9000"

            [server.health]
            path = "/healthz"

            [gemini]
            base_url = "http://localhost:9100/v1beta"
            repair_timeout = "2s"

            [proxy_probe]
            url = "http://localhost:9200/ip"
            timeout = "3s"

            [telemetry]
            filter = "voxgate=debug"
            format = "json"
        "#})
        .unwrap();

        assert_eq!(config.server.listen_address(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.server.health.path, "/healthz");
        assert_eq!(config.gemini.base_url.port(), Some(9100));
        assert_eq!(config.gemini.repair_timeout().unwrap().as_secs(), 2);
        assert_eq!(config.proxy_probe.timeout().unwrap().as_secs(), 3);
        assert_eq!(config.telemetry.format, LogFormat::Json);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = Config::from_toml("[llm]\nenabled = true").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn relative_health_path_is_rejected() {
        let err = Config::from_toml("[server.health]\npath = \"health\"").unwrap_err();
        assert!(err.to_string().contains("server.health.path"));
    }

    #[test]
    fn zero_probe_timeout_is_rejected() {
        let err = Config::from_toml("[proxy_probe]\ntimeout = \"0s\"").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn zero_repair_timeout_is_rejected() {
        let err = Config::from_toml("[gemini]\nrepair_timeout = \"0s\"").unwrap_err();
        assert!(err.to_string().contains("gemini.repair_timeout"));
    }

    #[test]
    fn env_placeholders_are_expanded() {
        temp_env::with_var("VOXGATE_TEST_TEXT_MODEL", Some("gemini-2.5-flash"), || {
            let config = Config::from_toml("[gemini]\ntext_model = \"{{ env.VOXGATE_TEST_TEXT_MODEL }}\"").unwrap();
            assert_eq!(config.gemini.text_model, "gemini-2.5-flash");
        });
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten_address = \"127.0.0.1:7000\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.listen_address(), SocketAddr::from(([127, 0, 0, 1], 7000)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/voxgate.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
