// src/domain/mod.rs
pub mod credential;
pub mod user_model;
