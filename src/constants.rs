/// Every sprite in the archive has this fixed width and height.
pub const SPRITE_SIZE: u32 = 32;

/// Legacy color-key field at the start of each 32x32 block. Readers skip it
/// unconditionally, so the value written here never matters.
pub const COLOR_KEY: [u8; 3] = [0xFF, 0x00, 0xFF];
