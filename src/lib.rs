//! # Yojana Sahayak
//!
//! A multilingual assistant for discovering Indian government welfare
//! schemes.
//!
//! The crate serves a JSON API for a citizen-facing chat client: messages
//! go to a generative language model with a scheme-aware preamble, the
//! reply is paired with matching scheme records from a SQLite repository,
//! and a heuristic script/keyword detector identifies the language of
//! free-form text so voice clients can follow the speaker.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐
//! │  Client   │──▶│  HTTP API    │──▶│  Generative    │
//! │ (browser) │   │ chat/schemes │   │  model (API)   │
//! └──────────┘   └──────┬───────┘   └───────────────┘
//!                       │
//!            ┌──────────┴─────────┐
//!            ▼                    ▼
//!      ┌──────────┐        ┌──────────┐
//!      │  SQLite   │        │ Language │
//!      │  schemes  │        │ detector │
//!      └──────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sahayak init                          # create database
//! sahayak seed                          # load sample schemes
//! sahayak detect "मुझे किसान योजना बताओ"  # try the detector
//! sahayak serve api                     # start the JSON API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`language`] | Language codes and localized text |
//! | [`detect`] | Heuristic language detection |
//! | [`models`] | Core data types and API bodies |
//! | [`store`] | Scheme repository |
//! | [`assistant`] | Generative-model client |
//! | [`prompts`] | Prompt assembly and localized responses |
//! | [`chat`] | Chat orchestration |
//! | [`error`] | API error taxonomy |
//! | [`server`] | JSON HTTP server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod assistant;
pub mod chat;
pub mod config;
pub mod db;
pub mod detect;
pub mod error;
pub mod language;
pub mod migrate;
pub mod models;
pub mod prompts;
pub mod server;
pub mod store;
