mod settings;

pub use settings::{LlmSettings, LoggingSettings, Settings};
