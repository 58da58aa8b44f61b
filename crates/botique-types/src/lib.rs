//! Shared domain types for Botique.
//!
//! This crate contains the core domain types used across the Botique
//! marketplace: Bot, ConversationTurn, Subscription, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod identity;
pub mod subscription;
