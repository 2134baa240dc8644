//! # boardflow-domain
//!
//! Pure domain model for the boardflow automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **board snapshots** (tasks, labels, users as resolved by the
//!   event producer — the engine never loads them itself)
//! - Define **automation rules** (trigger → condition → action)
//! - Define **trigger contexts** (immutable snapshots of "what happened")
//! - Define **execution logs** (append-only per-rule audit records)
//! - Define **events** (records of engine activity for observability)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod board;
pub mod event;
