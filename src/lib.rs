//! Wordlik
//!
//! A concurrent word-guessing game engine: many participants each play their
//! own game against a shared, thread-safe session registry.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wordlik::core::{Feedback, Word};
//! use wordlik::registry::{RegistryConfig, SessionRegistry};
//! use wordlik::wordlists::WordList;
//!
//! // Score a guess directly
//! let guess = Word::new("robot").unwrap();
//! let target = Word::new("floor").unwrap();
//! println!("{}", Feedback::calculate(&guess, &target).to_emoji());
//!
//! // Or play through the registry
//! let words = Arc::new(WordList::new(["kocka", "dlaha"], 5).unwrap());
//! let registry = SessionRegistry::new(words, RegistryConfig::default());
//! registry.start_session(&"alice".into()).unwrap();
//! let outcome = registry.submit_guess(&"alice".into(), "kocka").unwrap();
//! println!("{} {}", outcome.word, outcome.feedback);
//! ```

// Core domain types
pub mod core;

// Per-session state machine
pub mod game;

// Concurrent session registry and idle sweeping
pub mod registry;

// Per-participant statistics
pub mod stats;

// Background maintenance tasks
pub mod scheduler;

// Runtime configuration
pub mod config;

// Word lists
pub mod wordlists;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
