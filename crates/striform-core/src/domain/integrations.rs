//! Per-form integration settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegrationKind {
    GoogleSheets,
    Slack,
    Zapier,
    Webhook,
}

impl IntegrationKind {
    pub const ALL: [IntegrationKind; 4] =
        [Self::GoogleSheets, Self::Slack, Self::Zapier, Self::Webhook];

    pub fn id(&self) -> &'static str {
        match self {
            Self::GoogleSheets => "google-sheets",
            Self::Slack => "slack",
            Self::Zapier => "zapier",
            Self::Webhook => "webhook",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleSheets => "Google Sheets",
            Self::Slack => "Slack",
            Self::Zapier => "Zapier",
            Self::Webhook => "Webhook",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::GoogleSheets => {
                "Connect to automatically send form responses to a Google Sheets spreadsheet."
            }
            Self::Slack => "Get notified in Slack when you receive new form submissions.",
            Self::Zapier => "Connect your form to 3000+ apps with automated workflows.",
            Self::Webhook => "Send form data to a specified URL in real-time upon submission.",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IntegrationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.id() == s)
            .ok_or_else(|| format!("unknown integration: {}", s))
    }
}

/// Connected integrations of one form: integration id to target URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Integrations(BTreeMap<String, String>);

impl Integrations {
    pub fn url(&self, kind: IntegrationKind) -> Option<&str> {
        self.0.get(kind.id()).map(String::as_str).filter(|u| !u.is_empty())
    }

    pub fn is_connected(&self, kind: IntegrationKind) -> bool {
        self.url(kind).is_some()
    }

    /// Connecting with an empty URL leaves the integration disconnected.
    pub fn connect(&mut self, kind: IntegrationKind, url: impl Into<String>) {
        let url = url.into();
        if url.is_empty() {
            self.0.remove(kind.id());
        } else {
            self.0.insert(kind.id().to_string(), url);
        }
    }

    pub fn disconnect(&mut self, kind: IntegrationKind) {
        self.0.remove(kind.id());
    }

    pub fn webhook(&self) -> Option<&str> {
        self.url(IntegrationKind::Webhook)
    }
}
