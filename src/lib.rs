//! Tempo Chat: a weather assistant for Portugal answering from IPMA open
//! data, phrased by a model served by a local Ollama runtime.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
