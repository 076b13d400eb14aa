use std::fmt;

// === ApiError ===

/// Errors produced at the REST call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, timeout).
    Network(String),
    /// The backend answered 401; the stored token has been cleared.
    Unauthorized,
    /// The backend answered with a non-success status.
    Status { code: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Unauthorized => write!(f, "Authentication required"),
            ApiError::Status { code, message } => {
                write!(f, "Backend error ({}): {}", code, message)
            }
            ApiError::Parse(msg) => write!(f, "Could not parse response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { code: 404, .. })
    }
}

// === StoreError ===

/// Errors reported by the client-side stores.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A required field was empty or malformed. No request was sent.
    Validation(String),
    /// The place is already a member of the target board. No request was sent.
    DuplicatePlace(String),
    /// The id does not exist in local state.
    NotFound(String),
    /// The backend call failed.
    Backend(String),
    /// Initial load failed outside development mode; the store is empty.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            StoreError::DuplicatePlace(name) => {
                write!(f, "Place already in this board: {}", name)
            }
            StoreError::NotFound(id) => write!(f, "Not found: {}", id),
            StoreError::Backend(msg) => write!(f, "Request failed: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "Data unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ApiError> for StoreError {
    fn from(e: ApiError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

// === SessionError ===

/// Errors related to the persisted login session.
#[derive(Debug)]
pub enum SessionError {
    /// Local storage operation failed.
    Database(String),
    /// Cached user data could not be (de)serialized.
    Serialization(String),
    /// The operation needs a signed-in user.
    NotLoggedIn,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Database(msg) => write!(f, "Session storage error: {}", msg),
            SessionError::Serialization(msg) => {
                write!(f, "Session serialization error: {}", msg)
            }
            SessionError::NotLoggedIn => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for SessionError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === MapError ===

/// Errors raised by the map viewport and its SDK adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// The map SDK could not be loaded.
    SdkUnavailable(String),
    /// A render was requested before the SDK finished loading.
    NotLoaded,
    /// The SDK rejected the render request.
    Render(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::SdkUnavailable(msg) => write!(f, "Map SDK unavailable: {}", msg),
            MapError::NotLoaded => write!(f, "Map SDK not loaded"),
            MapError::Render(msg) => write!(f, "Map render failed: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

// === AccountError ===

/// Errors from sign-in and account edits.
#[derive(Debug)]
pub enum AccountError {
    /// A required field was empty. No request was sent.
    Validation(String),
    /// The backend call failed.
    Api(ApiError),
    /// The session could not be persisted.
    Session(SessionError),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            AccountError::Api(e) => write!(f, "Account request failed: {}", e),
            AccountError::Session(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<ApiError> for AccountError {
    fn from(e: ApiError) -> Self {
        AccountError::Api(e)
    }
}

impl From<SessionError> for AccountError {
    fn from(e: SessionError) -> Self {
        AccountError::Session(e)
    }
}
