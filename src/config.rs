use camino::Utf8Path;
use config::{Config, File, FileFormat};

pub use irmapper_api::config::*;

use crate::error::ApiResult;

fn builder() -> ApiResult<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("server.listen", "0.0.0.0:8080")?
        .set_default("hass.url", "http://127.0.0.1:8123")?
        .set_default("hass.token_env", "HASS_TOKEN")?
        .set_default("hass.timeout_secs", 10)?)
}

fn finish(settings: Config) -> ApiResult<AppConfig> {
    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn parse(filename: &Utf8Path) -> ApiResult<AppConfig> {
    let settings = builder()?
        .add_source(File::with_name(filename.as_str()))
        .build()?;

    finish(settings)
}

pub fn parse_str(yaml: &str) -> ApiResult<AppConfig> {
    let settings = builder()?
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?;

    finish(settings)
}
