//! NewsBar - A headline ticker
//!
//! This crate periodically fetches headlines from a news feed and from
//! Hacker News, and announces new ones on a scrolling ticker that falls back
//! to a static icon once it has run its course.

pub mod aggregator;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod menu;
pub mod models;
pub mod novelty;
pub mod scheduler;
pub mod sources;
pub mod surface;
pub mod terminal;
