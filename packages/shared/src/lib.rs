//! Utilities shared by the Kumite packages.

pub mod logger;
pub mod time;
