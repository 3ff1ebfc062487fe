//! HTTP client for the Satchel API.
//!
//! Provides the authenticated transport with transparent token
//! refresh, persisted session state, confirmed-state caches for
//! folders and records, the two-phase spreadsheet import pipeline,
//! and the activity feed, all wired together by [`context::Session`].

pub mod activity;
pub mod auth;
pub mod collections;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod import;
pub mod notify;
pub mod onboarding;
pub mod storage;
