use std::path::Path;

use crate::{
    constants::SPRITE_SIZE,
    error::SprPackError,
    parser::{parse_header, parse_index_entry, parse_sprite},
};

/// Width of the sprite count field in the archive header. Older archives
/// store the count as a u16, newer generations as a u32. The caller decides,
/// the archive never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWidth {
    U16,
    U32,
}

/// How the colored pixels of a run are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGB triples, alpha synthesized as fully opaque.
    ColorKey,
    /// Raw RGBA, four bytes per pixel.
    Alpha,
}

/// One decoded sprite: `size * size * 4` RGBA8 bytes, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub size: u32,
    pub pixels: Vec<u8>,
}

impl SpriteImage {
    /// A fully transparent sprite.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![0u8; (size * size * 4) as usize],
        }
    }
}

/// An opened sprite container.
///
/// The whole file is read into memory on load; sprite lookups slice into that
/// buffer, so the archive needs no seekable handle once loaded. Loading and
/// unloading take `&mut self`, everything else reads.
pub struct SpriteArchive {
    signature: u32,
    sprite_count: u32,
    sprite_size: u32,
    index_base: usize,
    data: Option<Vec<u8>>,
    on_load: Option<Box<dyn Fn(&Path)>>,
}

impl Default for SpriteArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteArchive {
    pub fn new() -> Self {
        Self {
            signature: 0,
            sprite_count: 0,
            sprite_size: SPRITE_SIZE,
            index_base: 0,
            data: None,
            on_load: None,
        }
    }

    pub fn from_file(
        path: impl AsRef<Path>,
        count_width: CountWidth,
    ) -> Result<Self, SprPackError> {
        let mut archive = Self::new();
        archive.load(path, count_width)?;

        Ok(archive)
    }

    /// Reads the archive at `path` and parses its header. On failure the
    /// archive is left unloaded, never half populated. A registered on-load
    /// observer is notified after a successful load.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        count_width: CountWidth,
    ) -> Result<(), SprPackError> {
        let path = path.as_ref();

        self.unload();

        let bytes = std::fs::read(path).map_err(|op| SprPackError::LoadArchive {
            path: path.to_path_buf(),
            source: Box::new(SprPackError::IOError { source: op }),
        })?;

        self.load_from_bytes(bytes, count_width)
            .map_err(|op| SprPackError::LoadArchive {
                path: path.to_path_buf(),
                source: Box::new(op),
            })?;

        if let Some(hook) = &self.on_load {
            hook(path);
        }

        Ok(())
    }

    /// Adopts an in-memory archive. The buffer becomes the byte source for
    /// every subsequent lookup.
    pub fn load_from_bytes(
        &mut self,
        data: Vec<u8>,
        count_width: CountWidth,
    ) -> Result<(), SprPackError> {
        self.unload();

        let (rest, (signature, sprite_count)) =
            parse_header(&data, count_width).map_err(|_| SprPackError::ParseHeader)?;
        let index_base = data.len() - rest.len();

        self.signature = signature;
        self.sprite_count = sprite_count;
        self.sprite_size = SPRITE_SIZE;
        self.index_base = index_base;
        self.data = Some(data);

        Ok(())
    }

    /// Drops the byte source and resets the header fields. Safe to call on an
    /// archive that was never loaded.
    pub fn unload(&mut self) {
        self.signature = 0;
        self.sprite_count = 0;
        self.index_base = 0;
        self.data = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn signature(&self) -> u32 {
        self.signature
    }

    pub fn sprite_count(&self) -> u32 {
        self.sprite_count
    }

    pub fn sprite_size(&self) -> u32 {
        self.sprite_size
    }

    /// Registers an observer invoked with the file path after every
    /// successful `load`.
    pub fn set_on_load(&mut self, hook: impl Fn(&Path) + 'static) {
        self.on_load = Some(Box::new(hook));
    }

    /// Resolves a sprite id to the byte offset of its compressed block.
    ///
    /// Id 0, an unloaded archive and a zeroed index slot are all ordinary
    /// absence, not faults. The index is permissive: ids beyond the declared
    /// count read whatever bytes sit at the extrapolated position, and only
    /// an entry lying outside the buffer is an error.
    pub fn sprite_offset(&self, id: u32) -> Result<Option<u32>, SprPackError> {
        if id == 0 {
            return Ok(None);
        }

        let Some(data) = &self.data else {
            return Ok(None);
        };

        let entry_start = self.index_base + (id as usize - 1) * 4;
        let entry = data
            .get(entry_start..)
            .ok_or(SprPackError::IndexEntryOutOfBounds { id })?;
        let (_, offset) =
            parse_index_entry(entry).map_err(|_| SprPackError::IndexEntryOutOfBounds { id })?;

        Ok((offset != 0).then_some(offset))
    }

    /// Decodes the sprite with the given id, propagating decode faults.
    pub fn sprite(
        &self,
        id: u32,
        pixel_format: PixelFormat,
    ) -> Result<Option<SpriteImage>, SprPackError> {
        let Some(data) = &self.data else {
            return Ok(None);
        };

        let Some(offset) = self.sprite_offset(id)? else {
            return Ok(None);
        };

        let block = data
            .get(offset as usize..)
            .ok_or(SprPackError::SpriteOutOfBounds { id })?;
        let (_, pixels) = parse_sprite(block, self.sprite_size, pixel_format)
            .map_err(|op| SprPackError::DecodeSprite {
                id,
                source: op.to_owned(),
            })?;

        Ok(Some(SpriteImage {
            size: self.sprite_size,
            pixels,
        }))
    }

    /// Decodes the sprite with the given id. Absent sprites and decode faults
    /// both come back as `None`; faults are reported to the log so a broken
    /// asset renders as nothing instead of taking the caller down.
    pub fn sprite_image(&self, id: u32, pixel_format: PixelFormat) -> Option<SpriteImage> {
        match self.sprite(id, pixel_format) {
            Ok(sprite) => sprite,
            Err(op) => {
                log::error!("failed to get sprite {id}: {op}");
                None
            }
        }
    }
}
