//! Scripted backend for deterministic tests
//!
//! Returns a fixed sequence of canned responses (or failures) and records
//! every request it receives, so orchestration tests can assert on call
//! counts and prompt contents without a real provider.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{GenerationRequest, GenerationResponse, LlmBackend};

/// One canned reply: raw text or a backend failure.
pub type ScriptedReply = Result<String, LlmError>;

/// A generation backend driven by a prepared script.
#[derive(Debug)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script of successful text replies.
    #[must_use]
    pub fn from_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok((*t).to_string())).collect())
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    /// Prompts received so far, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        let reply = self.replies.lock().expect("replies lock").pop_front();
        match reply {
            Some(Ok(text)) => Ok(GenerationResponse::new(text, "scripted", "scripted-model")),
            Some(Err(error)) => Err(error),
            None => Err(LlmError::Transport("scripted replies exhausted".to_string())),
        }
    }
}
