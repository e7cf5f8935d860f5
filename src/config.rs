use anyhow::Context;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const API_URL_VAR: &str = "PLACEMENT_API_URL";
const TOKEN_VAR: &str = "PLACEMENT_API_TOKEN";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub token: String,
}

impl Config {
    /// Reads the environment; an explicit `api_url` wins over `PLACEMENT_API_URL`.
    pub fn from_env(api_url: Option<String>) -> anyhow::Result<Self> {
        let token = std::env::var(TOKEN_VAR)
            .context("PLACEMENT_API_TOKEN must be set to a student access token")?;
        Ok(Self::resolve(api_url, std::env::var(API_URL_VAR).ok(), token))
    }

    fn resolve(flag: Option<String>, env: Option<String>, token: String) -> Self {
        let api_base_url = flag
            .or(env)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_base_url,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_environment() {
        let config = Config::resolve(
            Some("https://api.example.edu".to_string()),
            Some("http://env.example.edu".to_string()),
            "t".to_string(),
        );
        assert_eq!(config.api_base_url, "https://api.example.edu");
    }

    #[test]
    fn environment_used_when_flag_missing() {
        let config = Config::resolve(None, Some("http://env.example.edu".to_string()), "t".into());
        assert_eq!(config.api_base_url, "http://env.example.edu");
    }

    #[test]
    fn default_used_when_nothing_set() {
        let config = Config::resolve(None, Some("  ".to_string()), "t".into());
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.token, "t");
    }
}
