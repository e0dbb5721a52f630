//! HTTP adapters (reqwest)

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{Form, Response, WebhookPayload};
use crate::ports::{FormsApi, RemoteError, WebhookSender};

/// Client for the Striform REST API.
pub struct HttpFormsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFormsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn call<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| RemoteError::Unreachable(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        if !status.is_success() {
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(RemoteError::Status { status: status.as_u16(), message });
        }
        resp.json().await.map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FormsApi for HttpFormsApi {
    async fn list_forms(&self) -> Result<Vec<Form>, RemoteError> {
        self.call(Method::GET, "/api/forms", None::<&()>).await
    }

    async fn create_form(&self, form: &Form) -> Result<Form, RemoteError> {
        self.call(Method::POST, "/api/forms", Some(form)).await
    }

    async fn fetch_form(&self, id: &str) -> Result<Form, RemoteError> {
        self.call(Method::GET, &format!("/api/forms/{}", id), None::<&()>).await
    }

    async fn update_form(&self, form: &Form) -> Result<Form, RemoteError> {
        let body = update_body(form)?;
        self.call(Method::PUT, &format!("/api/forms/{}", form.id), Some(&body)).await
    }

    async fn delete_form(&self, id: &str) -> Result<(), RemoteError> {
        let _: serde_json::Value =
            self.call(Method::DELETE, &format!("/api/forms/{}", id), None::<&()>).await?;
        Ok(())
    }

    async fn list_responses(&self, form_id: &str) -> Result<Vec<Response>, RemoteError> {
        self.call(Method::GET, &format!("/api/responses/form/{}", form_id), None::<&()>).await
    }

    async fn create_response(&self, response: &Response) -> Result<Response, RemoteError> {
        self.call(Method::POST, "/api/responses", Some(response)).await
    }
}

/// PUT body for a form: every field except the server-owned counter.
fn update_body(form: &Form) -> Result<Map<String, Value>, RemoteError> {
    match serde_json::to_value(form).map_err(|e| RemoteError::Decode(e.to_string()))? {
        Value::Object(mut fields) => {
            fields.remove("responseCount");
            Ok(fields)
        }
        _ => Err(RemoteError::Decode("form did not serialize to an object".into())),
    }
}

/// Posts completion payloads to webhook URLs. Single attempt, no retry.
#[derive(Default)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
}

impl HttpWebhookSender {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<(), RemoteError> {
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: resp.status().as_u16(),
                message: "webhook rejected the payload".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_leaves_out_counter() {
        let form = Form { id: "f1".into(), title: "T".into(), response_count: 7, ..Default::default() };
        let body = update_body(&form).unwrap();
        assert!(!body.contains_key("responseCount"));
        assert_eq!(body["id"], "f1");
        assert_eq!(body["title"], "T");
    }
}
