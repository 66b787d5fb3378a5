#![deny(missing_docs)]
//! Sysmon Bot - Telegram front end for remote host diagnostics
//!
//! A Telegram bot that extracts emails and phone numbers from free text,
//! rates password strength and relays a fixed menu of read-only diagnostic
//! commands to a single remote host over SSH.

/// Telegram bot implementation
pub mod bot;
/// Configuration management
pub mod config;
/// Email, phone and password pattern matching
pub mod extract;
/// Diagnostic command menu
pub mod menu;
/// Remote command relay (SSH)
pub mod relay;
/// Storage layer (SQLite)
pub mod storage;
pub mod utils;
