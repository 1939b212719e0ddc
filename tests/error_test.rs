//! Tests for error types

use flylab_data::Error;

#[test]
fn test_already_exists_error() {
    let error = Error::AlreadyExists {
        what: "fly",
        name: "fly1".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("fly already exists"));
    assert!(error_str.contains("fly1"));
    assert!(error.is_recoverable());
}

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("node /Flies/fly9".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Not found"));
    assert!(error_str.contains("/Flies/fly9"));
    assert!(error.is_recoverable());
}

#[test]
fn test_precondition_error() {
    let error = Error::PreconditionViolation("define a fly first".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Precondition violated"));
    assert!(error_str.contains("define a fly first"));
    assert!(error.is_recoverable());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("ordinal 1000 exceeds 999".to_string());
    assert!(format!("{error}").contains("Invalid input"));
    assert!(error.is_recoverable());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::WouldBlock, "lock held");
    let error: Error = io.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("lock held"));
    assert!(!error.is_recoverable());
}

#[test]
fn test_serialization_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_err.into();
    assert!(format!("{error}").contains("Serialization error"));
    assert!(!error.is_recoverable());
}

#[test]
fn test_unsupported_format_error() {
    let error = Error::UnsupportedFormat("hdf5 v2".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Unsupported experiment file format"));
    assert!(!error.is_recoverable());
}

#[test]
fn test_config_error() {
    let error = Error::Config("no rig_config entry".to_string());
    assert!(format!("{error}").contains("Configuration error"));
    assert!(!error.is_recoverable());
}

#[test]
fn test_error_debug() {
    let error = Error::NotFound("x".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("NotFound"));
}
