use nom::{
    bytes::complete::take,
    combinator::map,
    number::complete::{le_u16, le_u32},
    IResult as _IResult, Parser,
};

use crate::types::{CountWidth, PixelFormat};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

pub fn parse_header(i: &'_ [u8], count_width: CountWidth) -> IResult<'_, (u32, u32)> {
    let (i, signature) = le_u32.parse(i)?;
    let (i, sprite_count) = match count_width {
        CountWidth::U16 => map(le_u16, u32::from).parse(i)?,
        CountWidth::U32 => le_u32.parse(i)?,
    };

    Ok((i, (signature, sprite_count)))
}

pub fn parse_index_entry(i: &'_ [u8]) -> IResult<'_, u32> {
    le_u32.parse(i)
}

/// Decompresses one sprite block into a `sprite_size * sprite_size * 4` RGBA
/// buffer.
///
/// The block alternates runs of transparent and colored pixels. Transparent
/// pixels occupy no bytes on disk; colored pixels are stored as raw RGBA or,
/// in the color-key layout, as RGB triples completed with an opaque alpha.
/// A run that claims more pixels than the buffer holds ends the decode early
/// without being treated as a fault, matching how existing archives in the
/// wild are cut.
pub fn parse_sprite(
    i: &'_ [u8],
    sprite_size: u32,
    pixel_format: PixelFormat,
) -> IResult<'_, Vec<u8>> {
    // legacy color-key field, present on 32x32 archives, never interpreted
    let i = if sprite_size == 32 {
        take(3usize).parse(i)?.0
    } else {
        i
    };

    let (mut i, pixel_data_size) = le_u16.parse(i)?;

    let buffer_len = (sprite_size * sprite_size * 4) as usize;
    let mut pixels = vec![0u8; buffer_len];

    let mut read = 0usize;
    let mut write = 0usize;

    while read < pixel_data_size as usize && write < buffer_len {
        let (rest, transparent) = le_u16.parse(i)?;
        let (rest, colored) = le_u16.parse(rest)?;

        // transparent pixels keep their zeroed value, nothing is stored for them
        write += transparent as usize * 4;

        match pixel_format {
            PixelFormat::Alpha => {
                let wanted = colored as usize * 4;
                let available = wanted.min(buffer_len.saturating_sub(write));
                let (rest, raw) = take(available).parse(rest)?;
                if available > 0 {
                    pixels[write..write + available].copy_from_slice(raw);
                }
                write += wanted;
                read += 4 + wanted;
                i = rest;
            }
            PixelFormat::ColorKey => {
                let mut rest = rest;
                for _ in 0..colored {
                    if write >= buffer_len {
                        break;
                    }
                    let (next, rgb) = take(3usize).parse(rest)?;
                    pixels[write..write + 3].copy_from_slice(rgb);
                    pixels[write + 3] = 0xFF;
                    write += 4;
                    rest = next;
                }
                // count-based, whether or not the inner pass stopped early
                read += 4 + colored as usize * 3;
                i = rest;
            }
        }
    }

    Ok((i, pixels))
}
