//! Request handlers, grouped by resource.

pub mod screens;
