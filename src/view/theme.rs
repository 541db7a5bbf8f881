use crate::core::config::ThemeConfig;
use crate::core::errors::AppError;
use crate::core::helpers::parse_color;
use termion::color::Rgb;

#[derive(Debug, Clone)]
pub struct Theme {
    pub piece_char: String,
    pub empty_char: String,
    pub player_one_color: Rgb,
    pub player_two_color: Rgb,
    pub grid_color: Rgb,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self, AppError> {
        Ok(Theme {
            piece_char: config.piece_char.clone(),
            empty_char: config.empty_char.clone(),
            player_one_color: parse_color(&config.player_one_color)?,
            player_two_color: parse_color(&config.player_two_color)?,
            grid_color: parse_color(&config.grid_color)?,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            piece_char: "●".to_string(),
            empty_char: "·".to_string(),
            player_one_color: Rgb(0x1c, 0x1f, 0x25),
            player_two_color: Rgb(0xd7, 0x26, 0x3d),
            grid_color: Rgb(0x7d, 0x6c, 0x4b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::parse_app_config;

    #[test]
    fn default_config_matches_default_theme() {
        let config = parse_app_config("empty: true").unwrap();
        let theme = Theme::from_config(&config.theme).unwrap();
        let default = Theme::default();

        assert_eq!(theme.piece_char, default.piece_char);
        assert_eq!(theme.player_two_color.0, default.player_two_color.0);
        assert_eq!(theme.grid_color.2, default.grid_color.2);
    }

    #[test]
    fn bad_color_is_reported() {
        let config = parse_app_config("theme:\n  grid_color: brown\n").unwrap();
        let err = Theme::from_config(&config.theme).unwrap_err();
        assert!(err.message.contains("brown"));
    }
}
