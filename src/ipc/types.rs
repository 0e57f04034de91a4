use crate::config::Config;
use crate::sheet::ScoreSheet;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub sheet: ScoreSheet,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sheet: ScoreSheet::new(),
        }
    }

    pub fn separator(&self) -> char {
        self.config.decimal_separator
    }
}
