//! Wire types shared by the fpn crates.

pub mod api;
