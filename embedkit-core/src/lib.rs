//! `embedkit-core` brokers account context between a host wallet and a
//! third-party web application embedded inside it.
//!
//! The [`SessionController`] opens the host bridge, discovers the accounts the
//! embedded app may operate on, picks one (honouring an explicit launch
//! account and the last persisted choice), and derives the URL the embedded
//! frame should load. Views read [`SessionView`] snapshots and call back into
//! the controller on user action.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod account;
pub use account::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod template;
pub use template::*;

/// Host platform bridge contract and an in-process mock.
pub mod bridge;

/// Forwarding of `log` records to a host-provided logger.
pub mod logger;

/// The account session state machine and the view derived from it.
pub mod session;
pub use session::{
    AccountRequestOutcome, ConnectionPhase, SessionController, SessionState,
    SessionStatus, SessionView,
};

/// Preference persistence with degraded-storage detection.
pub mod storage;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!("embedkit_core");
