// src/connectors/mod.rs - market data connectors

pub mod traits;
pub mod common;

pub use traits::*;

pub mod okx;
