use super::{types::Config, ConfigError};

const ANNOUNCE_SCHEMES: [&str; 3] = ["http://", "https://", "udp://"];

/// Validate configuration
/// Currently validates:
/// - Timeouts are not 0
/// - The copy buffer is not empty
/// - Packaging has a usable announce URL when enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.encoder.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "encoder.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.packager.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "packager.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.mirror.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "mirror.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.packager.enabled {
        let url = config.packager.announce_url.as_deref().unwrap_or_default();
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "packager.announce_url is required when packaging is enabled".to_string(),
            ));
        }
        if !ANNOUNCE_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return Err(ConfigError::ValidationError(format!(
                "packager.announce_url must start with one of {:?}",
                ANNOUNCE_SCHEMES
            )));
        }
    }

    Ok(())
}
