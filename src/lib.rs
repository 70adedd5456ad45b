//! pub-release: changelog-driven release pipeline for Dart/Flutter packages
//!
//! Reads the newest version from a changelog, creates a GitHub release for it
//! when it has not been released yet, installs the Flutter SDK, optionally
//! enforces a minimum pub score, and publishes the package to pub.dev. A
//! separate labeler marks revert and release pull requests.

pub mod actions;
pub mod auth;
pub mod changelog;
pub mod config;
pub mod error;
pub mod forge;
pub mod labeler;
pub mod pipeline;
pub mod process;
pub mod quality;
pub mod registry;
pub mod toolchain;
pub mod types;
