use std::{fs::OpenOptions, io::Write, path::Path};

use byte_writer::ByteWriter;

use crate::{
    constants::{COLOR_KEY, SPRITE_SIZE},
    error::SprPackError,
    types::{CountWidth, PixelFormat, SpriteImage},
};

/// Run-length encodes one RGBA buffer into the wire form `parse_sprite`
/// reads back.
///
/// A pixel is transparent when its alpha byte is 0. Trailing transparent
/// pixels are not emitted; the decoder's zeroed buffer already covers them.
pub fn encode_sprite(pixels: &[u8], pixel_format: PixelFormat) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    let total = pixels.len() / 4;
    let mut cursor = 0usize;

    while cursor < total {
        let mut transparent = 0usize;
        while cursor < total && transparent < u16::MAX as usize && pixels[cursor * 4 + 3] == 0 {
            transparent += 1;
            cursor += 1;
        }

        if cursor >= total {
            break;
        }

        let colored_start = cursor;
        let mut colored = 0usize;
        while cursor < total && colored < u16::MAX as usize && pixels[cursor * 4 + 3] != 0 {
            colored += 1;
            cursor += 1;
        }

        writer.append_u16(transparent as u16);
        writer.append_u16(colored as u16);

        for pixel in colored_start..colored_start + colored {
            match pixel_format {
                PixelFormat::Alpha => writer.append_u8_slice(&pixels[pixel * 4..pixel * 4 + 4]),
                PixelFormat::ColorKey => writer.append_u8_slice(&pixels[pixel * 4..pixel * 4 + 3]),
            }
        }
    }

    writer.data
}

/// Assembles a sprite archive from decoded sprites.
///
/// Slot order is id order: the first pushed sprite becomes id 1. `None`
/// slots keep a zeroed index entry, the wire form of an absent sprite.
pub struct ArchiveBuilder {
    pub signature: u32,
    pub sprites: Vec<Option<SpriteImage>>,
}

impl ArchiveBuilder {
    pub fn new(signature: u32) -> Self {
        Self {
            signature,
            sprites: vec![],
        }
    }

    pub fn push(&mut self, sprite: SpriteImage) {
        self.sprites.push(Some(sprite));
    }

    /// Reserves an id with no sprite stored behind it.
    pub fn push_empty(&mut self) {
        self.sprites.push(None);
    }

    pub fn write_to_bytes(&self, count_width: CountWidth, pixel_format: PixelFormat) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        writer.append_u32(self.signature);
        match count_width {
            CountWidth::U16 => writer.append_u16(self.sprites.len() as u16),
            CountWidth::U32 => writer.append_u32(self.sprites.len() as u32),
        }

        // dummy index, patched once the block offsets are known
        let index_start = writer.get_offset();
        for _ in &self.sprites {
            writer.append_u32(0);
        }

        for (slot, sprite) in self.sprites.iter().enumerate() {
            let Some(sprite) = sprite else {
                continue;
            };

            let offset = writer.get_offset();
            writer.replace_with_u32(index_start + slot * 4, offset as u32);

            if sprite.size == SPRITE_SIZE {
                writer.append_u8_slice(&COLOR_KEY);
            }

            let runs = encode_sprite(&sprite.pixels, pixel_format);
            writer.append_u16(runs.len() as u16);
            writer.append_u8_slice(&runs);
        }

        writer.data
    }

    pub fn write_to_file(
        &self,
        path: impl AsRef<Path>,
        count_width: CountWidth,
        pixel_format: PixelFormat,
    ) -> Result<(), SprPackError> {
        let bytes = self.write_to_bytes(count_width, pixel_format);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        file.write_all(&bytes)?;
        file.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encoder_emits_alternating_runs() {
        // 2 transparent, 3 colored, 3 trailing transparent pixels
        let mut pixels = vec![0u8; 8 * 4];
        pixels[8..20].copy_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255]);

        assert_eq!(
            encode_sprite(&pixels, PixelFormat::ColorKey),
            [2, 0, 3, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(
            encode_sprite(&pixels, PixelFormat::Alpha),
            [2, 0, 3, 0, 1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255]
        );
    }

    #[test]
    fn fully_transparent_encodes_to_nothing() {
        let pixels = vec![0u8; 16 * 4];

        assert!(encode_sprite(&pixels, PixelFormat::Alpha).is_empty());
    }

    #[test]
    fn builder_zeroes_empty_slots() {
        let mut builder = ArchiveBuilder::new(0x11223344);
        builder.push_empty();
        builder.push(SpriteImage::new(SPRITE_SIZE));

        let bytes = builder.write_to_bytes(CountWidth::U16, PixelFormat::Alpha);

        // u32 signature + u16 count, then the two index slots
        assert_eq!(&bytes[..4], &0x11223344u32.to_le_bytes());
        assert_eq!(&bytes[4..6], &2u16.to_le_bytes());
        assert_eq!(&bytes[6..10], &[0, 0, 0, 0]);
        assert_eq!(&bytes[10..14], &14u32.to_le_bytes());

        // block of the fully transparent sprite: color key + zero data size
        assert_eq!(&bytes[14..], &[0xFF, 0x00, 0xFF, 0, 0]);
    }
}
