/// Middleware modules for the board server
///
/// - `security`: Security response headers
/// - `session`: Session token resolution

pub mod security;
pub mod session;
