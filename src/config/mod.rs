// Configuration management module
// TOML settings for the model provider, chunking, retrieval and conversation behavior

pub mod interactive;
pub mod settings;


pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    Config, ConfigError, ConversationConfig, ProviderConfig, RetrievalConfig,
};
