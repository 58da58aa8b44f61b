//! Business logic and repository trait definitions for Botique.
//!
//! This crate defines the "ports" (repository, blob store, and generation
//! client traits) that the infrastructure layer implements, plus the chat
//! turn pipeline that orchestrates them. It depends only on `botique-types`
//! -- never on `botique-infra` or any database/IO crate.

pub mod chat;
pub mod generation;
pub mod repository;
pub mod service;
pub mod storage;
