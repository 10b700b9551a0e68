//! VoiceLoop - push-to-talk terminal voice chat for AI agents
//!
//! This crate provides the core functionality for capturing microphone audio,
//! exchanging it with an agent backend, and rendering the conversation in the
//! terminal with spoken replies.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, agent API, rodio, etc.)
//! - **CLI**: Command-line interface, argument parsing, and the chat loop

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
