use serde::{Deserialize, Serialize};

use crate::{
    APP_NAME,
    error::{TrError, TrResult},
    fetch::{BATCH_DELAY_MILLIS_DEFAULT, BATCH_SIZE_DEFAULT, HISTORY_YEARS_DEFAULT},
};

pub const YAHOO_API_DEFAULT: &str = "https://query2.finance.yahoo.com";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub yahoo_api: String,
    pub batch_size: usize,
    pub batch_delay_millis: u64,
    pub history_years: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yahoo_api: YAHOO_API_DEFAULT.to_string(),
            batch_size: BATCH_SIZE_DEFAULT,
            batch_delay_millis: BATCH_DELAY_MILLIS_DEFAULT,
            history_years: HISTORY_YEARS_DEFAULT,
        }
    }
}

impl Config {
    pub fn set(&mut self, key: &str, value: &str) -> TrResult<()> {
        match key.to_lowercase().as_str() {
            "yahoo_api" => {
                self.yahoo_api = value.to_string();
            }
            "batch_size" => {
                self.batch_size = parse_value(key, value)?;
            }
            "batch_delay_millis" => {
                self.batch_delay_millis = parse_value(key, value)?;
            }
            "history_years" => {
                self.history_years = parse_value(key, value)?;
            }
            _ => {
                return Err(TrError::Invalid {
                    code: "INVALID_CONFIG_KEY",
                    message: format!("Config key '{key}' not supported"),
                });
            }
        }

        Ok(())
    }
}

pub fn load() -> TrResult<Config> {
    Ok(confy::load::<Config>(APP_NAME, None)?)
}

pub fn store(config: &Config) -> TrResult<()> {
    Ok(confy::store(APP_NAME, None, config)?)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> TrResult<T> {
    value.parse::<T>().map_err(|_| TrError::Invalid {
        code: "INVALID_CONFIG_VALUE",
        message: format!("Value '{value}' not valid for config key '{key}'"),
    })
}
