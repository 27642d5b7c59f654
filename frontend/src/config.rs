//! 运行配置
//!
//! API 地址在构建时通过环境变量 `API_URL` 注入（例如 `API_URL=https://api.example.com trunk build`），
//! 未设置时使用本地开发地址。

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API 基础地址，不带结尾的 `/`
    pub api_base_url: String,
}

impl AppConfig {
    /// 读取构建时注入的配置
    pub fn from_env() -> Self {
        Self::resolve(option_env!("API_URL"))
    }

    pub fn resolve(api_url: Option<&str>) -> Self {
        let url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self {
            api_base_url: url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_and_trims() {
        assert_eq!(AppConfig::resolve(None).api_base_url, DEFAULT_API_URL);
        assert_eq!(AppConfig::resolve(Some("  ")).api_base_url, DEFAULT_API_URL);
        assert_eq!(
            AppConfig::resolve(Some("https://api.rateboard.dev/api//")).api_base_url,
            "https://api.rateboard.dev/api"
        );
    }
}
