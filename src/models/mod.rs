//! Data models module
//!
//! Defines request and response data structures for the OpenAI-compatible API

pub mod openai;
