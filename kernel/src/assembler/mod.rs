//! Board assembly.
//!
//! Turns fetched project data into a [`Board`](crate::board::Board). V2
//! projects go through schema discovery first; classic projects already
//! have columns and cards as resources and map one to one.

pub mod classic;
pub mod v2;

pub use classic::{assemble_classic, IssueLookup};
pub use v2::{assemble_v2, build_v2_board, card_from_item};
