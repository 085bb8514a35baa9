//! Percolator Slab Rust SDK
//!
//! Decodes the Percolator slab account (oracle config, occupancy bitmap and
//! LP/user position records) and encodes keeper instructions for it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use percolator_sdk::{parse_account, parse_config, parse_used_indices};
//!
//! let data: Vec<u8> = fetch_slab_somehow();
//! let config = parse_config(&data)?;
//! for idx in parse_used_indices(&data)? {
//!     if let Some(account) = parse_account(&data, idx)? {
//!         println!("{} {}: {}", account.kind(), idx, account.position().position_size);
//!     }
//! }
//! ```

pub mod bitmap;
pub mod builder;
pub mod client;
pub mod constants;
pub mod error;
pub mod fixed;
pub mod instructions;
pub mod layout;
pub mod slab;
pub mod types;

pub use bitmap::{decode_bitmap, encode_bitmap, UsedIndices};
pub use builder::SlabBuilder;
pub use client::*;
pub use constants::*;
pub use error::*;
pub use fixed::*;
pub use instructions::*;
pub use layout::SlabLayout;
pub use slab::*;
pub use types::*;
