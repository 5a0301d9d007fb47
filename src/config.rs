use std::env;
use std::path::PathBuf;

pub const DEFAULT_WORKBOOK_PATH: &str = "rip.xlsx";
pub const DEFAULT_REPORT_TITLE: &str = "Análise de RIP 2025";

#[derive(Debug, Clone)]
pub struct Config {
    pub workbook_path: PathBuf,
    pub report_title: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    /// Read settings from the environment; every setting has a default
    pub fn from_env() -> Self {
        Config {
            workbook_path: env::var("RIP_WORKBOOK_PATH")
                .unwrap_or_else(|_| DEFAULT_WORKBOOK_PATH.to_string())
                .into(),
            report_title: env::var("RIP_REPORT_TITLE")
                .unwrap_or_else(|_| DEFAULT_REPORT_TITLE.to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK_PATH),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workbook_path, PathBuf::from("rip.xlsx"));
        assert_eq!(config.report_title, "Análise de RIP 2025");
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}
