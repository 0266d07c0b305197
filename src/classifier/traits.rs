use crate::error::ClassifierError;
use crate::media::EncodedImage;
use std::future::Future;
use std::pin::Pin;

pub type VisionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ClassifierError>> + Send + 'a>>;

/// An external image-understanding model.
///
/// Implementations send one prompt plus one image and return the model's
/// raw text answer. Parsing that answer is the caller's job.
pub trait VisionProvider: Send + Sync {
    /// Provider identifier (e.g. "openai").
    fn name(&self) -> &str;

    fn describe_image<'a>(&'a self, prompt: &'a str, image: &'a EncodedImage) -> VisionFuture<'a>;
}
