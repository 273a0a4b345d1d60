use crate::configs::Config;
use crate::error::Result;
use dotenvy::dotenv_override;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::{Dict, Map};
use figment::{Error, Figment, Metadata, Profile, Provider};
use validator::Validate;
use variform_constants::{CONFIG_FILE, NAME};

impl Config {
    /// Assemble configuration from, in increasing precedence: built-in
    /// defaults, a `variform.toml` in the working directory, and
    /// `VARIFORM_`-prefixed environment variables (`.env` included), then
    /// enforce the `#[validate(...)]` constraints on the assembled value.
    pub fn new() -> Result<Self> {
        let config: Config = Figment::from(Config::figment()).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .join(Config::default())
            .join(Toml::file(CONFIG_FILE))
            .join({
                let _ = dotenv_override();
                Env::prefixed(format!("{}_", NAME.to_uppercase()).as_str()).split("__")
            })
    }
}

// Makes `Config` a provider itself so its defaults compose with other layers.
impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Variform Default Config")
    }

    fn data(&self) -> std::result::Result<Map<Profile, Dict>, Error> {
        Serialized::defaults(Config::default()).data()
    }
}
