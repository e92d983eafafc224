use crate::providers::bunny::DEFAULT_API_URL;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub dry_run: bool,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub include_domains_regexp: String,
    pub exclude_domains_regexp: String,
    pub webhook_host: String,
    pub webhook_port: u16,
    pub health_host: String,
    pub health_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api_key: env::var("BUNNY_API_KEY")?,
            api_url: env::var("BUNNY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            dry_run: env::var("BUNNY_DRY_RUN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            include_domains: split_list(&env::var("BUNNY_INCLUDE_DOMAINS").unwrap_or_default()),
            exclude_domains: split_list(&env::var("BUNNY_EXCLUDE_DOMAINS").unwrap_or_default()),
            include_domains_regexp: env::var("BUNNY_INCLUDE_DOMAINS_REGEXP").unwrap_or_default(),
            exclude_domains_regexp: env::var("BUNNY_EXCLUDE_DOMAINS_REGEXP").unwrap_or_default(),
            webhook_host: env::var("WEBHOOK_HOST").unwrap_or_else(|_| "localhost".to_string()),
            webhook_port: env::var("WEBHOOK_PORT")
                .unwrap_or_else(|_| "8888".to_string())
                .parse()
                .unwrap_or(8888),
            health_host: env::var("HEALTH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            health_port: env::var("HEALTH_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    pub fn webhook_addr(&self) -> String {
        format!("{}:{}", self.webhook_host, self.webhook_port)
    }

    pub fn health_addr(&self) -> String {
        format!("{}:{}", self.health_host, self.health_port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) mod mock {
    use super::*;

    impl Default for Config {
        fn default() -> Self {
            Config {
                api_key: String::from("test-key"),
                api_url: String::from(DEFAULT_API_URL),
                dry_run: false,
                include_domains: Vec::new(),
                exclude_domains: Vec::new(),
                include_domains_regexp: String::new(),
                exclude_domains_regexp: String::new(),
                webhook_host: String::from("localhost"),
                webhook_port: 8888,
                health_host: String::from("0.0.0.0"),
                health_port: 8080,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("example.com, example.org ,other.net"),
            vec!["example.com", "example.org", "other.net"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_addrs() {
        let config = Config::default();
        assert_eq!(config.webhook_addr(), "localhost:8888");
        assert_eq!(config.health_addr(), "0.0.0.0:8080");
    }
}
