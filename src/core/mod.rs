//! Core module - Indicator state, settings, configuration, and events

pub mod config;
pub mod error;
pub mod events;
pub mod indicator;
pub mod runner;
pub mod settings;
pub mod state;
