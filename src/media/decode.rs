use super::detection::detect_image_format;
use super::types::EncodedImage;
use crate::error::InputError;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

/// Same cap as the browser uploader.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Strip an optional `data:<mime>;base64,` header.
fn strip_data_url(input: &str) -> &str {
    let Some(rest) = input.strip_prefix("data:") else {
        return input;
    };
    rest.split_once(',')
        .filter(|(header, _)| header.ends_with(";base64"))
        .map_or(input, |(_, payload)| payload)
}

/// Decode and verify an uploaded image.
///
/// Accepts bare base64 or a data URL. The format comes from the decoded
/// magic bytes; a data-URL header claiming `image/png` over JPEG bytes is
/// forwarded as JPEG.
pub fn decode_image(input: &str) -> Result<EncodedImage, InputError> {
    let payload: String = strip_data_url(input.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if payload.is_empty() {
        return Err(InputError::EmptyImage);
    }

    // Reject before allocating the decoded buffer.
    if payload.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
        return Err(InputError::TooLarge {
            max_bytes: MAX_IMAGE_BYTES,
        });
    }

    let bytes = STANDARD
        .decode(&payload)
        .or_else(|_| STANDARD_NO_PAD.decode(&payload))
        .map_err(|e| InputError::Base64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(InputError::EmptyImage);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(InputError::TooLarge {
            max_bytes: MAX_IMAGE_BYTES,
        });
    }

    let format = detect_image_format(&bytes).ok_or_else(|| {
        InputError::UnsupportedFormat(
            super::detection::detect_mime(&bytes).unwrap_or_else(|| "unknown".into()),
        )
    })?;

    Ok(EncodedImage {
        format,
        base64: STANDARD.encode(&bytes),
        size_bytes: bytes.len(),
    })
}
