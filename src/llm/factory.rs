use super::openai::OpenAiChatClient;
use super::traits::ModelClient;
use crate::config::Config;
use std::sync::Arc;

/// Build the model client described by the config.
pub fn create_model_client(config: &Config) -> Arc<dyn ModelClient> {
    Arc::new(OpenAiChatClient::new(
        &config.api_base_url,
        &config.model,
        config.api_key.as_deref(),
    ))
}
