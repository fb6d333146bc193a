//! API constants
//!
//! Every route except health and docs lives under [`API_PREFIX`].

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Versioned prefix for all upload routes
pub const API_PREFIX: &str = "/api/v0";

/// Header carrying the acting user's id, set by the session layer in front of us
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Multipart field holding the uploaded file
pub const FILE_FIELD: &str = "file";
