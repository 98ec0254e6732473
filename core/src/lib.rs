pub mod disparity;
pub mod image;

pub use disparity::*;
pub use image::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
