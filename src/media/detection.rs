use super::types::ImageFormat;

#[must_use]
pub fn detect_mime(data: &[u8]) -> Option<String> {
    infer::get(data).map(|info| info.mime_type().to_string())
}

/// Format from magic bytes only; file names and data-URL headers are not trusted.
#[must_use]
pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    detect_mime(data).and_then(|mime| ImageFormat::from_mime(&mime))
}
