pub mod factory;
pub mod openai;
pub mod scrub;
pub mod traits;

pub use factory::create_model_client;
pub use openai::OpenAiChatClient;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{CompletionFuture, ModelClient};
