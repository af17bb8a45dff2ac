//! Flitro: Workspace Contexts
//!
//! A context is a named, ordered set of applications, documents, browser tabs, and
//! terminal sessions. Activating a context opens all of them, grouped by the
//! application that owns each item; closing it undoes exactly what the activation
//! opened.

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod family;
pub mod item;
pub mod launcher;
pub mod library;
pub mod logging;
pub mod manager;
pub mod platform;
pub mod script;
pub mod store;
pub mod terminal;
pub mod types;
