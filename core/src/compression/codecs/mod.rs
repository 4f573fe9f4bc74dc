//! compression/codecs/mod.rs
//! Built-in codecs.

pub mod deflate;
pub mod none;

pub use deflate::*;
pub use none::*;
