//! Command implementations

pub mod info;
pub mod transcode;
