//! # Configuration Management
//!
//! Process configuration for the certflow pipeline. All inputs are
//! resolved once at startup into an explicit [`Settings`] value and passed
//! down by reference; the core never reads ambient environment state.

mod settings;

pub use settings::Settings;
