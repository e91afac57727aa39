//! Middleware del sistema
//!
//! CORS para el front-end; trace, timeout y compresión se componen en `routes`.

pub mod cors;

pub use cors::*;
