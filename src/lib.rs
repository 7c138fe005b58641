//! spamcheck: classify messages as spam / not spam and keep a
//! session-scoped history of the checks.
//!
//! The [`session::SessionManager`] is the core; classifiers plug in through
//! [`classifier::Classifier`] and the console in [`console`] is one display
//! layer on top.

pub mod classifier;
pub mod config;
pub mod error;
pub mod logger;
pub mod session;

#[cfg(feature = "channel-console")]
pub mod console;
