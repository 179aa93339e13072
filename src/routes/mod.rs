//! HTTP route handlers

pub mod meta;
