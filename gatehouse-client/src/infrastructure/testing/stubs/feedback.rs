use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::infrastructure::services::feedback::{ConfirmPrompt, Confirmation, Notice, Notifier};

/// Answers prompts from a queue, falling back to a fixed answer once the
/// queue runs dry. Every prompt is recorded.
#[derive(Debug)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirmation {
    pub fn approving() -> Self {
        Self::with_fallback(true)
    }

    pub fn declining() -> Self {
        Self::with_fallback(false)
    }

    fn with_fallback(fallback: bool) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn then_answer(self, answer: bool) -> Self {
        self.answers.lock().push_back(answer);
        self
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.prompts.lock().last().map(ConfirmPrompt::message)
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.prompts.lock().push(prompt.clone());
        self.answers.lock().pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.is_error())
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
