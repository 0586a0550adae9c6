//! Session orchestration, mini-games, and score normalization for the
//! Aadya assessment.
//!
//! This crate owns the flow a child walks through: log in, answer the
//! adaptive quiz, play three short activities, then view the intelligence
//! profile chart. All state lives in a sans-IO [`Session`]; the async
//! [`run_session`] loop performs the backend calls and timer ticks it asks
//! for.
//!
//! # Modules
//!
//! - [`backend`] -- [`AssessmentBackend`] trait and backend error type.
//! - [`config`] -- Configuration loading from `aadya-config.yaml` into
//!   strongly-typed structs.
//! - [`games`] -- Sequence, emotion, and motor mini-games.
//! - [`quiz`] -- One-question-at-a-time quiz controller.
//! - [`runner`] -- Async event loop and the [`Presenter`] trait.
//! - [`score`] -- Normalization of raw score payloads into chart entries.
//! - [`session`] -- The stage state machine.
//! - [`stage`] -- The stage transition table.
//! - [`timer`] -- Motor game elapsed-time ticker.
//!
//! [`AssessmentBackend`]: backend::AssessmentBackend
//! [`Session`]: session::Session
//! [`run_session`]: runner::run_session
//! [`Presenter`]: runner::Presenter

pub mod backend;
pub mod config;
pub mod games;
pub mod quiz;
pub mod runner;
pub mod score;
pub mod session;
pub mod stage;
pub mod timer;
