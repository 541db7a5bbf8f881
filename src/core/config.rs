use super::errors::AppError;
use crate::core::entities::Dimensions;
use directories::ProjectDirs;
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub board: Dimensions,

    #[serde(default = "get_default_network_config")]
    pub network: NetworkConfig,

    #[serde(default = "get_default_theme_config")]
    pub theme: ThemeConfig,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "get_default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "get_default_piece_char")]
    pub piece_char: String,
    #[serde(default = "get_default_empty_char")]
    pub empty_char: String,
    #[serde(default = "get_default_player_one_color")]
    pub player_one_color: String,
    #[serde(default = "get_default_player_two_color")]
    pub player_two_color: String,
    #[serde(default = "get_default_grid_color")]
    pub grid_color: String,
}

pub fn get_app_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    let config_file_path: PathBuf = if let Some(str_value) = config_path {
        PathBuf::from(&str_value)
    } else {
        get_default_app_config_path()?
    };

    info!(
        "loading config from '{}'",
        config_file_path.to_string_lossy()
    );

    let config_file_content: String = if config_file_path.exists() {
        let mut file = File::open(&config_file_path).map_err(|e| AppError {
            message: format!(
                "Error opening the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ),
        })?;
        let mut contents = String::new();

        file.read_to_string(&mut contents).map_err(|e| AppError {
            message: format!(
                "Error reading the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ),
        })?;

        contents
    } else {
        "empty: true".to_string()
    };

    let config = parse_app_config(&config_file_content).map_err(|e| AppError {
        message: format!(
            "Error parsing content of the file '{}': {}",
            &config_file_path.to_string_lossy(),
            &e.message
        ),
    })?;

    Ok(config)
}

pub fn parse_app_config(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(content).map_err(|e| AppError {
        message: e.to_string(),
    })?;

    if config.board.rows == 0 || config.board.columns == 0 {
        return Err(AppError {
            message: format!(
                "board must have at least one row and one column, got {}x{}",
                config.board.rows, config.board.columns
            ),
        });
    }

    Ok(config)
}

fn get_default_app_config_path() -> Result<PathBuf, AppError> {
    match ProjectDirs::from("Com", "Connect Four", env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => {
            let config_file_path = proj_dirs.config_dir().join("config.yml");

            Ok(config_file_path)
        }
        None => Err(AppError {
            message: "Can't get app project dir".to_string(),
        }),
    }
}

fn get_default_network_config() -> NetworkConfig {
    NetworkConfig {
        connect_timeout_ms: get_default_connect_timeout_ms(),
    }
}

fn get_default_theme_config() -> ThemeConfig {
    ThemeConfig {
        piece_char: get_default_piece_char(),
        empty_char: get_default_empty_char(),
        player_one_color: get_default_player_one_color(),
        player_two_color: get_default_player_two_color(),
        grid_color: get_default_grid_color(),
    }
}

fn get_default_connect_timeout_ms() -> u64 {
    5000
}

fn get_default_piece_char() -> String {
    "●".to_string()
}

fn get_default_empty_char() -> String {
    "·".to_string()
}

fn get_default_player_one_color() -> String {
    "#1c1f25".to_string()
}

fn get_default_player_two_color() -> String {
    "#d7263d".to_string()
}

fn get_default_grid_color() -> String {
    "#7d6c4b".to_string()
}
