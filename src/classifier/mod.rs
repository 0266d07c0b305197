//! Receipt classifier client.
//!
//! Sends the uploaded photo plus a dated instruction prompt to an external
//! vision model and turns its free-form answer into a [`ClassificationVerdict`].

pub mod factory;
pub mod openai;
pub mod parse;
pub mod prompt;
pub mod traits;
pub mod types;

pub(crate) mod client;

pub use client::ReceiptClassifier;
pub use factory::{create_classifier, create_vision_provider};
pub use traits::VisionProvider;
pub use types::{BagType, ClassificationVerdict};
