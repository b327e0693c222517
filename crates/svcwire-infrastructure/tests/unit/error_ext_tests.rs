//! Error Extension Tests

use std::error::Error as StdError;
use std::io;

use svcwire_domain::error::{Error, Result};
use svcwire_infrastructure::error_ext::ErrorContext;

#[test]
fn test_config_context_keeps_source() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).config_context("failed to read settings");

    match result {
        Err(err @ Error::Config { .. }) => {
            assert!(err.to_string().contains("failed to read settings"));
            assert!(err.source().is_some());
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_with_config_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_config_context(|| -> String { panic!("context built for a success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_context_maps_to_internal() {
    let io_error = io::Error::other("broken pipe");

    let err = Err::<(), _>(io_error).context("subscriber").unwrap_err();

    assert!(matches!(err, Error::Internal { .. }));
    assert!(err.to_string().contains("subscriber: broken pipe"));
}
