use aegis_registry::{Principal, RegistryConfig};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub registry: RegistrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JournalConfig {
    #[serde(default = "default_backend")]
    pub backend: String, // "memory", "sqlite"
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RegistrySettings {
    /// Hex address allowed to record analysis results
    pub administrator: Option<String>,
    #[serde(default)]
    pub strict_owner_binding: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    7230
}
fn default_backend() -> String {
    "memory".into()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Figment::new()
            .merge(Toml::file("aegis-server.toml"))
            .merge(Env::prefixed("AEGIS_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Registry policy derived from the `[registry]` section
    pub fn registry_config(&self) -> anyhow::Result<RegistryConfig> {
        let administrator = self
            .registry
            .administrator
            .as_deref()
            .map(Principal::from_hex)
            .transpose()?;

        Ok(RegistryConfig {
            administrator,
            strict_owner_binding: self.registry.strict_owner_binding,
        })
    }
}
