use serde::{Deserialize, Serialize};

use crate::providers::openai::OpenAIContentItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAIContent {
    Text(String),
    Array(Vec<OpenAIContentItem>),
}
