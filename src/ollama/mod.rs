// file: src/ollama/mod.rs
// description: thin client for the local Ollama HTTP API
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

pub mod client;

pub use client::OllamaClient;
