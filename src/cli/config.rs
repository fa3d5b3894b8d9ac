use crate::s3::Region;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{collections::BTreeMap, fs::File, path::Path};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub hosts: BTreeMap<String, Host>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Host {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    pub bucket: Option<String>,
    /// use https, also implied by an `https://` endpoint
    #[serde(default)]
    pub ssl: bool,
}

impl Config {
    /// # Errors
    ///
    /// Will return `Err` if the file can not be opened or parsed
    pub fn new(config_path: &Path) -> Result<Self> {
        let file = File::open(config_path)
            .with_context(|| format!("unable to open: {}", config_path.display()))?;

        let config: Self =
            serde_yaml_ng::from_reader(file).context("unable to parse config file")?;

        Ok(config)
    }

    /// Get the host from the config.yml, with a single host the name is optional
    ///
    /// # Errors
    ///
    /// Will return `Err` if the host is not found or the name is ambiguous
    pub fn take_host(mut self, name: Option<&str>) -> Result<Host> {
        match name {
            Some(name) => self
                .hosts
                .remove(name)
                .with_context(|| format!("could not find host {name}")),
            None if self.hosts.len() == 1 => self
                .hosts
                .into_values()
                .next()
                .context("no hosts defined"),
            None => Err(anyhow!(
                "multiple hosts defined, choose one with --host: {}",
                self.hosts.keys().cloned().collect::<Vec<_>>().join(", ")
            )),
        }
    }
}

impl Host {
    /// Split an optional scheme from the endpoint, `https://` enables ssl
    pub fn normalize_endpoint(&mut self) {
        if let Some(endpoint) = self.endpoint.take() {
            let endpoint = if let Some(rest) = endpoint.strip_prefix("https://") {
                self.ssl = true;
                rest
            } else {
                endpoint.strip_prefix("http://").unwrap_or(&endpoint)
            };

            let endpoint = endpoint.trim_end_matches('/');

            self.endpoint = (!endpoint.is_empty()).then(|| endpoint.to_string());
        }
    }

    /// Get the region for the host
    ///
    /// A custom endpoint keeps the region only as the signing name, without
    /// endpoint or region the default from the environment is used.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the region is not a known AWS region
    pub fn get_region(&self) -> Result<Region> {
        Ok(match (&self.endpoint, &self.region) {
            (Some(endpoint), region) => Region::Custom {
                name: region.clone().unwrap_or_default(),
                endpoint: endpoint.clone(),
            },
            (None, Some(region)) => region.parse::<Region>()?,
            (None, None) => Region::default(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONF: &str = r"---
hosts:
  s3:
    region: eu-central-2
    access_key: XXX
    secret_key: YYY
    bucket: my-bucket";

    const CONF_MINIO: &str = r"---
hosts:
  minio:
    endpoint: http://127.0.0.1:9000
    access_key: minioadmin
    secret_key: minioadmin
    bucket: stream-test
  backblaze:
    endpoint: https://s3.us-west-000.backblazeb2.com/
    region: us-west-000
    access_key: XXX
    secret_key: YYY";

    fn config(content: &str) -> Config {
        let mut tmp_file = NamedTempFile::new().unwrap();
        tmp_file.write_all(content.as_bytes()).unwrap();
        Config::new(tmp_file.path()).unwrap()
    }

    #[test]
    fn test_config_single_host() {
        let host = config(CONF).take_host(None).unwrap();
        assert_eq!(host.access_key, "XXX");
        assert_eq!(host.secret_key, "YYY");
        assert_eq!(host.bucket, Some("my-bucket".to_string()));
        assert!(!host.ssl);
        assert_eq!(host.get_region().unwrap(), Region::EuCentral2);
    }

    #[test]
    fn test_config_host_missing() {
        assert!(config(CONF).take_host(Some("foo")).is_err());
    }

    #[test]
    fn test_config_ambiguous_host() {
        let err = config(CONF_MINIO).take_host(None).unwrap_err();
        assert!(err.to_string().contains("backblaze, minio"));
    }

    #[test]
    fn test_config_custom_endpoint() {
        let mut host = config(CONF_MINIO).take_host(Some("minio")).unwrap();
        host.normalize_endpoint();
        assert!(!host.ssl);
        assert_eq!(
            host.get_region().unwrap(),
            Region::Custom {
                name: String::new(),
                endpoint: "127.0.0.1:9000".to_string()
            }
        );

        let mut host = config(CONF_MINIO).take_host(Some("backblaze")).unwrap();
        host.normalize_endpoint();
        assert!(host.ssl);
        let region = host.get_region().unwrap();
        assert_eq!(region.name(), "us-west-000");
        assert_eq!(region.endpoint(), "s3.us-west-000.backblazeb2.com");
    }

    #[test]
    fn test_invalid_region() {
        let host = Host {
            region: Some("xx-region-y".to_string()),
            ..Host::default()
        };
        assert!(host.get_region().is_err());
    }

    #[test]
    fn test_invalid_config() {
        let mut tmp_file = NamedTempFile::new().unwrap();
        tmp_file.write_all(b"hosts: [").unwrap();
        assert!(Config::new(tmp_file.path()).is_err());
    }
}
