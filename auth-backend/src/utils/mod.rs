// auth-backend/src/utils/mod.rs

pub mod password;
pub mod session;
pub mod validation;
