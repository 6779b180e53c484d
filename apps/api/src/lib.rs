//! LLM-backed text extraction: a provider adapter for hosted chat-completion
//! APIs, a generic extractor built on it, invoice and resume extractors on
//! top of that, and local text utilities. `routes::build_router` exposes all
//! of it over HTTP.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod invoice;
pub mod llm_client;
pub mod resume;
pub mod routes;
pub mod state;
pub mod text_utils;

#[cfg(test)]
pub(crate) mod testing;
