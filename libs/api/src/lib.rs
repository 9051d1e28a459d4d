pub mod path;
pub mod request;
pub mod response;

/// Name of the HTTP-only cookie carrying the opaque session token.
/// Part of the wire contract between the gateway and its clients.
pub const SESSION_COOKIE: &str = "access_token";
