//! Logging Tests

use svcwire_infrastructure::config::LoggingConfig;
use svcwire_infrastructure::logging::parse_log_level;
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn test_default_logging_config_is_valid() {
    let config = LoggingConfig::default();

    assert!(parse_log_level(&config.level).is_ok());
    assert!(!config.json_format);
}
