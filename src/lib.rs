//! Resolve, download and cache a released command-line tool from GitHub.

pub mod asset;
pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod installer;
pub mod matcher;
pub mod provider;
pub mod runtime;
pub mod version;

pub use error::InstallError;
pub use installer::Installer;
