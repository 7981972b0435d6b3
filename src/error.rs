use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SprPackError {
    #[error("failed to load sprite archive '{}': {source}", path.display())]
    LoadArchive {
        path: PathBuf,
        #[source]
        source: Box<SprPackError>,
    },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
    #[error("sprite archive header is truncated")]
    ParseHeader,
    #[error("index entry of sprite {id} lies outside the archive")]
    IndexEntryOutOfBounds { id: u32 },
    #[error("sprite {id} points outside the archive")]
    SpriteOutOfBounds { id: u32 },
    #[error("failed to decode sprite {id}: {source}")]
    DecodeSprite {
        id: u32,
        #[source]
        source: nom::Err<nom::error::Error<Vec<u8>>>,
    },
}
