// Nearby search flow: geocoding, places search, per-place dish suggestions.

pub mod cuisine;
pub mod dishes;
pub mod handlers;
pub mod maps;
pub mod prompts;
pub mod service;
