use config::Config;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::{env, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub vmail_path: String,
    pub processing_interval_secs: u64,
    pub batch_size: usize,
    pub body_limit: usize,
    pub prompt_body_limit: usize,
    pub dedup_ttl_secs: i64,
}

/// Immutable model-profile table consumed by the prompt router.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelProfiles {
    pub fast: String,
    pub balanced: String,
    pub accurate: Option<String>,
    pub multilingual: String,
    pub fast_input_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub endpoint: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub profiles: ModelProfiles,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    settings: Settings,
    model: ModelConfig,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub settings: Settings,
    pub model: ModelConfig,
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Server Config:\n{:?}\n\nModel Config: {:?}",
            self.settings, self.model
        )
    }
}

lazy_static! {
    pub static ref cfg: ServerConfig = {
        let root = env::var("APP_DIR").unwrap_or_else(|_| {
            let dir =
                env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR or APP_DIR is required");
            let dir = Path::new(&dir).parent().unwrap().display().to_string();
            format!("{}/config", dir)
        });
        let path = format!("{root}/config.toml");
        let cfg_file: ConfigFile = Config::builder()
            .add_source(config::File::with_name(&path))
            .build()
            .expect("config.toml is required")
            .try_deserialize()
            .expect("config.toml is invalid");

        let ConfigFile {
            settings,
            mut model,
        } = cfg_file;

        let mut settings = settings;
        if let Ok(vmail_path) = env::var("VMAIL_PATH") {
            settings.vmail_path = vmail_path;
        }
        if let Ok(endpoint) = env::var("MODEL_ENDPOINT") {
            model.endpoint = endpoint;
        }

        ServerConfig { settings, model }
    };
}
