pub mod errors;
pub mod model;
pub mod openai;

pub use errors::ClassifyError;
pub use model::{Answer, Classification, HeroGender};
pub use openai::OpenAiClassifier;

use async_trait::async_trait;

/// Assigns tags to a title from its description.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, title: &str, description: &str)
    -> Result<Classification, ClassifyError>;
}
