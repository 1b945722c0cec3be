//! TRSKL skeleton reader.
//!
//! TRSKL files are relocatable: a root offset leads to a table, every table points back
//! to a small struct table listing where its fields are, and most fields are themselves
//! offsets to further tables. The reader walks the bone array through that indirection
//! and builds a [`BoneRegistry`] mapping bone names to the rig ids that skinned meshes
//! refer to.
pub mod cursor;
pub mod error;
pub mod header;
mod nom_helpers;
pub mod offset;
pub mod options;
mod parser;
pub mod registry;
mod types;
mod writer;

pub use error::TrsklError;
pub use header::{BoneLayout, RootHeader, RootLayout};
pub use options::{OffsetAnchor, ParseOptions, RigIdQuirk};
pub use parser::{parse_trskl, parse_trskl_with, walk_bones};
pub use registry::BoneRegistry;
pub use types::*;
pub use writer::write_trskl;

pub use glam::Vec3;
