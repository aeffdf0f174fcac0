//! Backend of a personal portfolio site: accounts, sessions and a per-user
//! dollar-cost-averaging ledger on SQLite.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod dca;
pub mod error;
pub mod state;
