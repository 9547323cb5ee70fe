// src/repository/mod.rs
pub mod account_store;
pub mod user_repository;
