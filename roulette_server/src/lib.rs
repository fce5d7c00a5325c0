//! HTTP front end for the chat-room roulette game.
//!
//! A chat transport (Telegram long-poll worker, webhook relay, test
//! harness) forwards each incoming message here as "sender X wrote text Y
//! in room Z". This crate resolves the sender's identity, parses the text
//! into a [`roulette::entities::Command`], runs it against the session
//! registry and answers with the outcome plus the lines to post back.

pub mod api;
pub mod commands;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod render;
