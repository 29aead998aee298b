// The binary entry point is main.rs; this file re-declares the module tree
// so integration tests can drive the app headlessly via `runasimi::app::App`.
// Some items are only reached through the binary, so suppress dead_code.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "es");

pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod session;
pub mod store;
pub mod ui;

