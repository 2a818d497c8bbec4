//! # goal-tasks
//!
//! Turns a free-text goal into exactly N daily tasks using a language model.
//!
//! This library provides:
//! - A generation pipeline that prompts the model, decodes and validates its
//!   output, and retries with a varied temperature until the count is exact
//! - An OpenAI-compatible chat completions client
//! - An HTTP API (with permissive CORS) for browser clients
//!
//! ## Request Flow
//! 1. Receive `{ goalDescription, durationDays }` via `POST /api/generate-tasks`
//! 2. Reject bad input or a missing API key before any network call
//! 3. Call the model, decode and validate, retry up to the attempt bound
//! 4. Return `{ tasks }` or `{ error, kind, details }`
//!
//! ## Modules
//! - `generation`: prompt, decoder, schema validation, retry loop
//! - `llm`: chat completion client and error classification
//! - `api`: axum routes and payloads
//! - `config`: environment configuration

pub mod api;
pub mod config;
pub mod generation;
pub mod llm;

pub use config::Config;
pub use generation::{GeneratedTask, GenerationError, GenerationRequest, TaskGenerator};
