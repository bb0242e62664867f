//! Course activity submission and grading engine.
//!
//! The pure decision logic lives in [`attempt_policy`], [`submission_state`] and
//! [`progress`]; the `*_service` modules wrap it with persistence and access
//! checks. File bytes never pass through the engine: uploads go to a
//! [`storage::FileStorage`] first and only the returned metadata is recorded.

pub mod access;
pub mod activity_service;
pub mod attempt_policy;
pub mod enrollment_service;
pub mod error;
pub mod progress;
pub mod progress_service;
pub mod storage;
pub mod submission_service;
pub mod submission_state;

pub use error::ServiceError;
