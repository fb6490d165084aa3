/// Authentication utilities
///
/// - `password`: Argon2id password hashing and verification
/// - `jwt`: signed session tokens (HS256)

pub mod jwt;
pub mod password;
