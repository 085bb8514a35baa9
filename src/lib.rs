//! Percolator - Slab Codec
//!
//! Root package hosting the cross-crate integration and property tests.
//! The decoder, instruction codec and RPC client live in `percolator-sdk`;
//! the `percolator` binary lives in `percolator-cli`.

pub use percolator_sdk as sdk;
