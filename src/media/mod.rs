//! Server-side image normalizer: turns an uploaded base64 payload into a
//! verified raster image ready to forward to the classifier.

pub mod decode;
pub mod detection;
pub mod types;

pub use decode::{MAX_IMAGE_BYTES, decode_image};
pub use types::{EncodedImage, ImageFormat};
