//! Yahoo Finance option-chain source.
//!
//! Implements the `ChainSource` boundary over Yahoo's public options
//! endpoint, with client-side request pacing and typed error mapping.

pub mod client;

pub use client::YahooChainSource;
