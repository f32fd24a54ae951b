//! Operator authentication: Argon2id password hashing and JWT access tokens.

pub mod jwt;
pub mod password;
