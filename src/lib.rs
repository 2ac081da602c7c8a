pub mod fuzzy;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod service;
pub mod session;
pub mod settings;
pub mod shell;
