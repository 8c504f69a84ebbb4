//! Output formatting for finished debates

pub mod console;
