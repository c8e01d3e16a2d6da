//! Request guards and layers shared by the HTTP API.
//!
//! - `auth` - Bearer token authentication and permission checks
//! - `rate_limit` - Per-IP token bucket layers

pub mod auth;
pub mod rate_limit;

#[cfg(test)]
mod test;
