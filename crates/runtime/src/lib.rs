mod config;
pub mod logging;

pub use config::{
    CONFIG_ENV, ClientSettings, DEFAULT_BIND_HOST, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SERVER_ADDRESS, DEFAULT_THREADS, PROGRAM_LOG_LEVEL, PROGRAM_NAME, ServerSettings,
    Settings, default_config_path,
};

pub use logging::init;
