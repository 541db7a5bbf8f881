use super::errors::AppError;
use simplelog::{
    CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, ThreadLogMode, WriteLogger,
};
use std::fs::File;

pub fn get_logger_level_by_verbosity(verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Records carry the thread name so the receive loop and the UI loop can be
/// told apart.
fn session_log_config() -> Config {
    ConfigBuilder::new()
        .set_thread_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Names)
        .set_target_level(LevelFilter::Debug)
        .build()
}

pub fn init_logger(log_file_path: Option<&str>, log_level: LevelFilter) -> Result<(), AppError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(
        log_level,
        session_log_config(),
        std::io::stderr(),
    )];

    if let Some(debug_file_path) = &log_file_path {
        let debug_file = File::create(&debug_file_path).map_err(|e| AppError {
            message: format!(
                "Error opening the debug file '{}': {}",
                &debug_file_path,
                &e.to_string()
            ),
        })?;

        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            session_log_config(),
            debug_file,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| AppError {
        message: format!("Error initializing the logger, {}", &e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(get_logger_level_by_verbosity(0), LevelFilter::Error);
        assert_eq!(get_logger_level_by_verbosity(1), LevelFilter::Warn);
        assert_eq!(get_logger_level_by_verbosity(2), LevelFilter::Info);
        assert_eq!(get_logger_level_by_verbosity(7), LevelFilter::Debug);
    }
}
