// Version information for the launcher client

/// Crate name as reported to the gateway
pub const CLIENT_NAME: &str = "safe-launcher-client";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Gateway capabilities this client speaks
pub const FEATURES: &[&str] = &[
    "x25519-handshake",
    "xsalsa20-poly1305-envelope",
    "encrypted-query-strings",
    "plaintext-sentinels",
    "session-persistence",
    "nfs-files",
    "nfs-directories",
];

/// User-Agent header value
pub fn user_agent() -> String {
    format!("{}/{}", CLIENT_NAME, VERSION_NUMBER)
}

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("SAFE Launcher Client {}", VERSION_NUMBER)
}
