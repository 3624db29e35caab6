//! Default value functions for configuration.

// =============================================================================
// API Defaults
// =============================================================================

pub fn default_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

pub fn default_user_agent() -> String {
    format!(
        "DiscordBot (https://github.com/chanline/chanline, {})",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn default_timeout_secs() -> u64 {
    15
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}
