//! Process-wide settings resolved once at startup.
//!
//! Every threshold has a built-in default that an environment variable can
//! override, and a command-line flag overrides both. See [`Settings::resolve`].

pub mod settings;

pub use settings::{
    DEFAULT_KEEP_DAYS, DEFAULT_KEEP_RUNS, DEFAULT_MAX_FILE_BYTES, DEFAULT_SNIPPET_LIMIT,
    ENV_KEEP_DAYS, ENV_KEEP_RUNS, ENV_MAX_FILE_BYTES, ENV_SNIPPET_LIMIT, Settings,
    SettingsOverrides,
};
