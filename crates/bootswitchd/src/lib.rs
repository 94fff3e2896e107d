//! Bootswitch daemon library - exposes modules for testing.

pub mod render;
pub mod routes;
pub mod server;
