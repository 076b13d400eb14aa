use stampbook::types::errors::*;

// === ApiError Tests ===

#[test]
fn api_error_display_variants() {
    assert_eq!(
        ApiError::Network("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(ApiError::Unauthorized.to_string(), "Authentication required");
    assert_eq!(
        ApiError::Status {
            code: 404,
            message: "stamp board 9 not found".to_string()
        }
        .to_string(),
        "Backend error (404): stamp board 9 not found"
    );
    assert_eq!(
        ApiError::Parse("expected value at line 1".to_string()).to_string(),
        "Could not parse response: expected value at line 1"
    );
}

#[test]
fn api_error_is_not_found_only_for_404() {
    let missing = ApiError::Status {
        code: 404,
        message: String::new(),
    };
    let conflict = ApiError::Status {
        code: 409,
        message: String::new(),
    };
    assert!(missing.is_not_found());
    assert!(!conflict.is_not_found());
    assert!(!ApiError::Unauthorized.is_not_found());
}

#[test]
fn api_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(ApiError::Unauthorized);
    assert!(err.source().is_none());
}

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::Validation("board title is empty".to_string()).to_string(),
        "Invalid input: board title is empty"
    );
    assert_eq!(
        StoreError::DuplicatePlace("스시로".to_string()).to_string(),
        "Place already in this board: 스시로"
    );
    assert_eq!(
        StoreError::NotFound("42".to_string()).to_string(),
        "Not found: 42"
    );
    assert_eq!(
        StoreError::Backend("boom".to_string()).to_string(),
        "Request failed: boom"
    );
    assert_eq!(
        StoreError::Unavailable("offline".to_string()).to_string(),
        "Data unavailable: offline"
    );
}

#[test]
fn store_error_from_api_error_keeps_message() {
    let err: StoreError = ApiError::Network("timed out".to_string()).into();
    assert_eq!(
        err,
        StoreError::Backend("Network error: timed out".to_string())
    );
}

// === SessionError Tests ===

#[test]
fn session_error_display_variants() {
    assert_eq!(
        SessionError::Database("locked".to_string()).to_string(),
        "Session storage error: locked"
    );
    assert_eq!(
        SessionError::Serialization("eof".to_string()).to_string(),
        "Session serialization error: eof"
    );
    assert_eq!(SessionError::NotLoggedIn.to_string(), "Not logged in");
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::InvalidValue("expected bool".to_string()).to_string(),
        "Invalid settings value: expected bool"
    );
}

// === MapError Tests ===

#[test]
fn map_error_display_variants() {
    assert_eq!(
        MapError::SdkUnavailable("no key".to_string()).to_string(),
        "Map SDK unavailable: no key"
    );
    assert_eq!(MapError::NotLoaded.to_string(), "Map SDK not loaded");
    assert_eq!(
        MapError::Render("bad center".to_string()).to_string(),
        "Map render failed: bad center"
    );
}

// === AccountError Tests ===

#[test]
fn account_error_wraps_sources() {
    let api: AccountError = ApiError::Unauthorized.into();
    assert_eq!(
        api.to_string(),
        "Account request failed: Authentication required"
    );

    let session: AccountError = SessionError::NotLoggedIn.into();
    assert_eq!(session.to_string(), "Not logged in");

    let invalid = AccountError::Validation("nickname is empty".to_string());
    assert_eq!(invalid.to_string(), "Invalid input: nickname is empty");
}
