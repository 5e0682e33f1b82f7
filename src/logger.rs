use crate::error::{ServerError, ServerResult};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn prepare_logger_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Debug)
        .build()
}

/// Install the stderr logger. Only the first call in a process succeeds.
pub fn init_logger(level: LevelFilter) -> ServerResult<()> {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| ServerError::Config(format!("Logger already initialised: {}", e)))
}
