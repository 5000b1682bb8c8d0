//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the expense store
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Directory (under the home directory) holding the config file
pub const CONFIG_DIR_NAME: &str = ".expense-tui";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written next to the working directory unless configured
pub const LOG_FILE_NAME: &str = "expense-tui.log";

/// Environment variable overriding the store URL
pub const ENV_API_URL: &str = "EXPENSE_TUI_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "EXPENSE_TUI_TIMEOUT_SECS";

/// Date format used by the store's query parameters and the filter inputs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Application name
pub const APP_NAME: &str = "Expense Tracker";
