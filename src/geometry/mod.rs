//! Packing geometry: the rounded-rectangle track, exact-sum diameter
//! partitioning along it, and greedy disc packing inside a circle.

pub mod diameters;
pub mod discs;
pub mod path;

pub use diameters::{
    pack_diameters, pack_diameters_toward, pack_diameters_with,
    DiameterBounds, DiameterSet,
};
pub use discs::{pack_discs, pack_discs_with, Disc, DiscPackRequest};
pub use path::RoundedRect;
