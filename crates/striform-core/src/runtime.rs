//! Response collection runtime
//!
//! A [`FormSession`] walks a respondent through a form one question at a
//! time. The current index stays in `[0, question_count)` until submission,
//! after which it sits at `question_count` and the session is finished.
//!
//! Side effects on completion, in order: the completion handler, the
//! webhook (if one is configured for the form), the final local response.
//! Preview sessions skip every side effect.

use std::sync::Arc;

use crate::domain::{AnswerValue, Answers, Form, Question, Response, WebhookPayload};
use crate::error::{FormsError, Result};
use crate::ports::{CompletionHandler, WebhookSender};
use crate::store::LocalCache;

/// Who is filling the form in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    /// Paid tier; gates partial-submission capture.
    pub is_pro: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionMode {
    #[default]
    Live,
    Preview,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WebhookDelivery {
    Delivered,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct Submission {
    pub response: Response,
    pub webhook: Option<WebhookDelivery>,
    /// Where the respondent should be sent next, if the form says so.
    pub redirect_url: Option<String>,
}

#[derive(Clone, Debug)]
pub enum Advance {
    Next { index: usize },
    /// Preview reached the end; nothing was submitted.
    PreviewEnd,
    Submitted(Submission),
}

pub struct FormSession {
    form: Form,
    mode: SessionMode,
    viewer: Viewer,
    index: usize,
    answers: Answers,
    finished: bool,
    cache: LocalCache,
    completion: Arc<dyn CompletionHandler>,
    webhooks: Arc<dyn WebhookSender>,
}

impl FormSession {
    pub fn new(
        form: Form,
        cache: LocalCache,
        completion: Arc<dyn CompletionHandler>,
        webhooks: Arc<dyn WebhookSender>,
    ) -> Self {
        Self {
            form,
            mode: SessionMode::Live,
            viewer: Viewer::default(),
            index: 0,
            answers: Answers::new(),
            finished: false,
            cache,
            completion,
            webhooks,
        }
    }

    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_preview(&self) -> bool {
        self.mode == SessionMode::Preview
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.form.questions.get(self.index)
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.form.questions.len()
    }

    /// "Question 2 of 5"
    pub fn progress_label(&self) -> String {
        let total = self.form.questions.len();
        format!("Question {} of {}", (self.index + 1).min(total.max(1)), total)
    }

    pub fn button_label(&self) -> &str {
        if self.is_last_question() {
            self.form.button_text()
        } else {
            "Next"
        }
    }

    fn captures_partials(&self) -> bool {
        self.form.capture_partial_submissions && self.viewer.is_pro && !self.is_preview()
    }

    /// Records `value` as the answer to the current question, replacing any
    /// earlier one. Without a current question this does nothing.
    pub fn answer(&mut self, value: AnswerValue) -> Result<()> {
        if self.finished {
            return Err(FormsError::AlreadySubmitted);
        }
        let Some(question) = self.form.questions.get(self.index) else {
            return Ok(());
        };
        validate(question, &value)?;
        let question_id = question.id.clone();

        self.answers.set(question_id, value);
        if self.captures_partials() {
            let snapshot = Response::partial(&self.form.id, self.answers.clone(), self.index);
            self.cache.push_response(&snapshot)?;
        }
        Ok(())
    }

    /// Adds or removes `option` from the current multi-select answer.
    pub fn toggle_option(&mut self, option: &str) -> Result<()> {
        let Some(question) = self.current_question() else {
            return Ok(());
        };
        if !question.kind.is_multi_select() {
            return Err(FormsError::AnswerMismatch(question.kind));
        }
        let mut selected = match self.answers.get(&question.id) {
            Some(AnswerValue::List(items)) => items.clone(),
            _ => Vec::new(),
        };
        match selected.iter().position(|o| o == option) {
            Some(pos) => {
                selected.remove(pos);
            }
            None => selected.push(option.to_string()),
        }
        self.answer(AnswerValue::List(selected))
    }

    /// Moves to the next question, or submits from the last one.
    pub async fn advance(&mut self) -> Result<Advance> {
        if self.finished {
            return Err(FormsError::AlreadySubmitted);
        }
        if self.index + 1 < self.form.questions.len() {
            self.index += 1;
            return Ok(Advance::Next { index: self.index });
        }
        if self.is_preview() {
            return Ok(Advance::PreviewEnd);
        }
        self.submit().await.map(Advance::Submitted)
    }

    async fn submit(&mut self) -> Result<Submission> {
        let form_id = self.form.id.clone();
        tracing::debug!(form_id = %form_id, answers = self.answers.len(), "submitting form");

        // Finished before any side effect, so a failed step cannot fire them twice.
        self.finished = true;
        self.index = self.form.questions.len();

        let last = self.form.questions.len().saturating_sub(1);
        let response = Response::complete(&form_id, self.answers.clone(), last);

        self.completion.on_response(&response).await;

        let webhook_url = match self.cache.integrations(&form_id) {
            Ok(integrations) => integrations.webhook().map(str::to_owned),
            Err(e) => {
                tracing::warn!(form_id = %form_id, error = %e, "could not read integrations");
                None
            }
        };
        let webhook = match webhook_url {
            Some(url) => {
                let payload = WebhookPayload::new(&self.form, self.answers.clone());
                match self.webhooks.send(&url, &payload).await {
                    Ok(()) => Some(WebhookDelivery::Delivered),
                    Err(e) => {
                        tracing::error!(form_id = %form_id, url = %url, error = %e, "failed to send webhook");
                        Some(WebhookDelivery::Failed(e.to_string()))
                    }
                }
            }
            None => None,
        };

        if let Err(e) = self.cache.push_response(&response) {
            tracing::error!(form_id = %form_id, error = %e, "could not record final response locally");
        }

        Ok(Submission {
            response,
            webhook,
            redirect_url: self.form.redirect_url.clone().filter(|u| !u.is_empty()),
        })
    }
}

fn validate(question: &Question, value: &AnswerValue) -> Result<()> {
    if !question.kind.accepts(value) {
        return Err(FormsError::AnswerMismatch(question.kind));
    }
    match value {
        AnswerValue::Text(choice) if question.kind.requires_options() && !choice.is_empty() => {
            if !question.offers(choice) {
                return Err(FormsError::UnknownOption(choice.clone()));
            }
        }
        AnswerValue::List(choices) => {
            if let Some(unknown) = choices.iter().find(|c| !question.offers(c)) {
                return Err(FormsError::UnknownOption(unknown.clone()));
            }
        }
        AnswerValue::Files(files) => {
            if let Some(config) = &question.file_upload_config {
                config.check(files).map_err(FormsError::FileRejected)?;
            }
        }
        _ => {}
    }
    Ok(())
}
