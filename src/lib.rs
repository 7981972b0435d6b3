//! Sprite archive parsing.
//!
//! The container stores a u32 signature, a sprite count (16 or 32 bits wide
//! depending on the archive generation), a table of u32 offsets indexed by
//! sprite id, and one run-length-compressed block per sprite. All fields are
//! little-endian. Decoded sprites are 32x32 RGBA8 buffers; a zeroed index
//! slot means the id has no sprite.

pub mod error;

mod constants;
mod parser;
mod types;
mod utils;
mod writer;

pub use constants::SPRITE_SIZE;
pub use parser::{parse_header, parse_sprite};
pub use types::*;
pub use writer::{encode_sprite, ArchiveBuilder};
