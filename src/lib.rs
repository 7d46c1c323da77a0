//! Minitube - video-sharing backend
//!
//! This crate implements the comment subsystem of the service: a REST API
//! for posting and listing comments, and a per-video live fan-out that
//! pushes newly created comments to every connected viewer over WebSocket.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
