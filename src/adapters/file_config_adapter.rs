//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[database]
path = finance.db
pool_size = 4

[web]
listen = 127.0.0.1:8080
session_lifetime = 86400
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("finance.db".to_string())
        );
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("127.0.0.1:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[web]\nlisten = :8080\n").unwrap();
        assert_eq!(adapter.get_string("web", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[database]\npool_size = 8\n").unwrap();
        assert_eq!(adapter.get_int("database", "pool_size", 0), 8);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[database]\n").unwrap();
        assert_eq!(adapter.get_int("database", "pool_size", 4), 4);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[database]\npool_size = abc\n").unwrap();
        assert_eq!(adapter.get_int("database", "pool_size", 4), 4);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[sim]\nstarting_cash = 10000.5\n").unwrap();
        assert_eq!(adapter.get_double("sim", "starting_cash", 0.0), 10000.5);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[sim]\n").unwrap();
        assert_eq!(adapter.get_double("sim", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter = FileConfigAdapter::from_string("[web]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("web", "a", false));
        assert!(adapter.get_bool("web", "b", false));
        assert!(adapter.get_bool("web", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter = FileConfigAdapter::from_string("[web]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("web", "a", true));
        assert!(!adapter.get_bool("web", "b", true));
        assert!(!adapter.get_bool("web", "c", true));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[quote]\nbase_url = https://cloud.iexapis.com\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("quote", "base_url"),
            Some("https://cloud.iexapis.com".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
