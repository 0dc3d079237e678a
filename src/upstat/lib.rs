//! # Upstat Architecture
//!
//! Upstat accepts a file as a name plus raw bytes, checks it against an
//! extension allow-list and a size limit, counts its lines and words, and
//! keeps the result in an append-only store mirrored to a JSON file.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Reads files from disk, prints outcomes, sets exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pipeline (pipeline.rs)                                     │
//! │  - validate → process → persist → UploadResult              │
//! │  - Never returns an error for an expected rejection         │
//! └─────────────────────────────────────────────────────────────┘
//!            │                  │                    │
//!            ▼                  ▼                    ▼
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//! │ validator.rs     │ │ processor.rs     │ │ store/           │
//! │ extension, size  │ │ decode, count    │ │ RecordStore,     │
//! │                  │ │                  │ │ SnapshotSink     │
//! └──────────────────┘ └──────────────────┘ └──────────────────┘
//! ```
//!
//! ## Key Principle: Outcomes Are Values
//!
//! `UploadPipeline::upload` always returns an [`outcome::UploadResult`].
//! Blank names, missing content, disallowed types, oversized content and
//! decode faults all come back as failure results with a reason and a
//! message. Only infrastructure code (loading config, reading a snapshot,
//! installing the logger) returns [`error::Result`].
//!
//! ## Module Overview
//!
//! - [`pipeline`]: The upload entry point
//! - [`validator`]: Extension and size checks
//! - [`processor`]: UTF-8 decoding and line/word counting
//! - [`outcome`]: `UploadResult`, failure kinds and messages
//! - [`model`]: `Record` and `TextStats`
//! - [`store`]: In-memory store and snapshot sinks
//! - [`config`]: Upload policy loaded from `config.json`
//! - [`logging`]: tracing subscriber setup for binaries
//! - [`error`]: Infrastructure error type

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod pipeline;
pub mod processor;
pub mod store;
pub mod validator;
