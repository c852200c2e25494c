//! Quotebook - A local-first quote book with periodic server reconciliation

pub mod book;
pub mod commands;
pub mod config;
pub mod db;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod store;
