//! Client-side form model
//!
//! Reconciles the local cache with the remote API. Forms prefer the remote
//! copy and fall back to the local one; response listings are the union of
//! both, matched by id. Network failures are logged and otherwise swallowed;
//! the operator carries on against the local copy.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::builder::FormSink;
use crate::domain::{Answers, Form, IntegrationKind, Integrations, Response};
use crate::error::{FormsError, Result};
use crate::ports::{CompletionHandler, FormsApi, RemoteError};
use crate::store::LocalCache;

#[derive(Clone)]
pub struct FormLibrary {
    cache: LocalCache,
    api: Option<Arc<dyn FormsApi>>,
}

impl FormLibrary {
    pub fn new(cache: LocalCache, api: Option<Arc<dyn FormsApi>>) -> Self {
        Self { cache, api }
    }

    /// Local-only library.
    pub fn offline(cache: LocalCache) -> Self {
        Self::new(cache, None)
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Forms as the dashboard lists them (local copy).
    pub fn forms(&self) -> Result<Vec<Form>> {
        Ok(self.cache.forms()?)
    }

    pub async fn create_form(&self) -> Result<Form> {
        let form = Form::untitled();
        self.cache.upsert_form(&form)?;
        if let Some(api) = &self.api {
            if let Err(e) = api.create_form(&form).await {
                tracing::warn!(form_id = %form.id, error = %e, "API save failed, using local store only");
            }
        }
        Ok(form)
    }

    /// Replaces the local copy. This is what the builder writes through to.
    pub fn save_form(&self, form: &Form) -> Result<()> {
        Ok(self.cache.upsert_form(form)?)
    }

    /// Pushes the local copy to the API, creating it remotely if missing.
    /// Returns whether the API accepted it.
    pub async fn sync_form(&self, id: &str) -> Result<bool> {
        let form = self
            .cache
            .find_form(id)?
            .ok_or_else(|| FormsError::FormNotFound(id.to_string()))?;
        let Some(api) = &self.api else {
            return Ok(false);
        };
        let outcome = match api.update_form(&form).await {
            Err(RemoteError::NotFound) => api.create_form(&form).await.map(|_| ()),
            other => other.map(|_| ()),
        };
        match outcome {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(form_id = %id, error = %e, "API sync failed, keeping local copy");
                Ok(false)
            }
        }
    }

    pub async fn delete_form(&self, id: &str) -> Result<bool> {
        if let Some(api) = &self.api {
            match api.delete_form(id).await {
                Ok(()) | Err(RemoteError::NotFound) => {}
                Err(e) => {
                    tracing::warn!(form_id = %id, error = %e, "API delete failed, removing from local store only");
                }
            }
        }
        Ok(self.cache.remove_form(id)?)
    }

    /// Fetches a form for viewing: API first, then the local copy.
    pub async fn load_form(&self, id: &str) -> Result<Form> {
        if let Some(api) = &self.api {
            match api.fetch_form(id).await {
                Ok(form) => return Ok(form),
                Err(RemoteError::NotFound) => {}
                Err(e) => {
                    tracing::warn!(form_id = %id, error = %e, "API fetch failed, falling back to local store");
                }
            }
        }
        self.cache
            .find_form(id)?
            .ok_or_else(|| FormsError::FormNotFound(id.to_string()))
    }

    /// Responses for a form: the API list plus every local row the API does
    /// not know about (partial snapshots, finals recorded while offline).
    /// Partial rows are dropped unless asked for.
    pub async fn responses(&self, form_id: &str, include_partial: bool) -> Result<Vec<Response>> {
        let mut responses = match &self.api {
            Some(api) => match api.list_responses(form_id).await {
                Ok(responses) => responses,
                Err(e) => {
                    tracing::warn!(form_id = %form_id, error = %e, "API fetch failed, falling back to local store");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let known: HashSet<String> = responses.iter().map(|r| r.id.clone()).collect();
        responses.extend(
            self.cache
                .responses(form_id)?
                .into_iter()
                .filter(|r| !known.contains(&r.id)),
        );
        responses.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        if !include_partial {
            responses.retain(|r| !r.is_partial);
        }
        Ok(responses)
    }

    /// Recomputes a local form's counter from its local non-partial responses.
    pub fn refresh_response_count(&self, form_id: &str) -> Result<u64> {
        let count = self.cache.responses(form_id)?.iter().filter(|r| !r.is_partial).count() as u64;
        let mut form = self
            .cache
            .find_form(form_id)?
            .ok_or_else(|| FormsError::FormNotFound(form_id.to_string()))?;
        form.response_count = count;
        self.cache.upsert_form(&form)?;
        Ok(count)
    }

    /// Sends a finished answer set to the API. Returns whether it got there.
    pub async fn submit_answers(&self, form_id: &str, answers: &Answers) -> bool {
        let response = Response {
            last_question_answered: None,
            ..Response::complete(form_id, answers.clone(), 0)
        };
        self.submit_response(&response).await
    }

    /// Posts a final response as-is, keeping its id so the local copy and
    /// the remote one stay the same row.
    pub async fn submit_response(&self, response: &Response) -> bool {
        if response.answers.is_empty() {
            return false;
        }
        let Some(api) = &self.api else {
            return false;
        };
        match api.create_response(response).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(form_id = %response.form_id, error = %e, "API submission failed, response kept in local store");
                false
            }
        }
    }

    // Integrations

    pub fn integrations(&self, form_id: &str) -> Result<Integrations> {
        Ok(self.cache.integrations(form_id)?)
    }

    pub fn connect_integration(
        &self,
        form_id: &str,
        kind: IntegrationKind,
        url: impl Into<String>,
    ) -> Result<Integrations> {
        let mut integrations = self.cache.integrations(form_id)?;
        integrations.connect(kind, url);
        self.cache.save_integrations(form_id, &integrations)?;
        Ok(integrations)
    }

    pub fn disconnect_integration(&self, form_id: &str, kind: IntegrationKind) -> Result<Integrations> {
        let mut integrations = self.cache.integrations(form_id)?;
        integrations.disconnect(kind);
        self.cache.save_integrations(form_id, &integrations)?;
        Ok(integrations)
    }
}

impl FormSink for FormLibrary {
    fn persist(&self, form: &Form) -> Result<()> {
        self.save_form(form)
    }
}

#[async_trait]
impl CompletionHandler for FormLibrary {
    async fn on_complete(&self, form_id: &str, answers: &Answers) {
        self.submit_answers(form_id, answers).await;
    }

    async fn on_response(&self, response: &Response) {
        self.submit_response(response).await;
    }
}

/// Share link for a form.
pub fn share_url(app_url: &str, form_id: &str) -> String {
    format!("{}/form/{}", app_url.trim_end_matches('/'), form_id)
}

/// HTML snippet embedding a form in another page.
pub fn embed_code(app_url: &str, form_id: &str) -> String {
    format!(
        r#"<iframe src="{}" width="100%" height="600" frameborder="0" style="border:none;max-width:100%;"></iframe>"#,
        share_url(app_url, form_id)
    )
}
