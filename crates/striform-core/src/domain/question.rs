//! Questions and their per-type settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::response::{AnswerValue, FileRef};

/// Prompt used when a question is added without one.
pub const DEFAULT_PROMPT: &str = "New Question";

/// Largest upload accepted by a freshly added file-upload question.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Options every new question starts with.
pub fn default_options() -> Vec<String> {
    vec!["Option 1".into(), "Option 2".into(), "Option 3".into()]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    #[serde(rename = "text")]
    ShortText,
    LongText,
    Number,
    SingleSelect,
    MultipleChoice,
    Checkbox,
    Date,
    Email,
    Url,
    Signature,
    Statement,
    FileUpload,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 12] = [
        Self::ShortText,
        Self::LongText,
        Self::Number,
        Self::SingleSelect,
        Self::MultipleChoice,
        Self::Checkbox,
        Self::Date,
        Self::Email,
        Self::Url,
        Self::Signature,
        Self::Statement,
        Self::FileUpload,
    ];

    /// Wire tag, e.g. `longText`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ShortText => "text",
            Self::LongText => "longText",
            Self::Number => "number",
            Self::SingleSelect => "singleSelect",
            Self::MultipleChoice => "multipleChoice",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
            Self::Signature => "signature",
            Self::Statement => "statement",
            Self::FileUpload => "fileUpload",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortText => "Short Text",
            Self::LongText => "Long Text",
            Self::Number => "Number",
            Self::SingleSelect => "Single Select",
            Self::MultipleChoice => "Multiple Choice",
            Self::Checkbox => "Checkbox",
            Self::Date => "Date",
            Self::Email => "Email",
            Self::Url => "Website URL",
            Self::Signature => "Signature",
            Self::Statement => "Statement Block",
            Self::FileUpload => "File Upload",
        }
    }

    /// Choice questions must always carry at least one option.
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::SingleSelect | Self::MultipleChoice | Self::Checkbox)
    }

    /// Questions answered with a list of selected options.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Checkbox)
    }

    /// Whether `value` has the right shape for this kind of question.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::Statement, _) => false,
            (Self::FileUpload, AnswerValue::Files(_)) => true,
            // An empty file list comes back from JSON as an empty `List`.
            (Self::FileUpload, AnswerValue::List(items)) => items.is_empty(),
            (Self::MultipleChoice | Self::Checkbox, AnswerValue::List(_)) => true,
            (Self::FileUpload | Self::MultipleChoice | Self::Checkbox, _) => false,
            (_, AnswerValue::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown question type: {}", s))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImagePlacement {
    #[default]
    Stack,
    Split,
    Wallpaper,
}

/// Side of the question an image sits on; only meaningful for `Split`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Left,
    Right,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionImage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub placement: ImagePlacement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ImagePosition>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<u32>,
    /// MIME types (`application/pdf`), wildcards (`image/*`) or extensions (`.csv`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_file_types: Option<Vec<String>>,
    /// Bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

impl FileUploadConfig {
    /// Configuration given to new file-upload questions.
    pub fn starter() -> Self {
        Self {
            max_files: Some(1),
            accepted_file_types: Some(vec!["application/pdf".into(), "image/*".into()]),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }

    pub fn accepts_type(&self, file: &FileRef) -> bool {
        let Some(patterns) = self.accepted_file_types.as_ref().filter(|p| !p.is_empty()) else {
            return true;
        };
        patterns.iter().any(|pattern| {
            let pattern = pattern.trim();
            if pattern.starts_with('.') {
                file.name.to_ascii_lowercase().ends_with(&pattern.to_ascii_lowercase())
            } else if let Some(prefix) = pattern.strip_suffix("/*") {
                file.mime_type
                    .split_once('/')
                    .map(|(top, _)| top.eq_ignore_ascii_case(prefix))
                    .unwrap_or(false)
            } else {
                file.mime_type.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Checks a whole upload against count, type and size limits.
    pub fn check(&self, files: &[FileRef]) -> Result<(), String> {
        if let Some(max) = self.max_files {
            if files.len() > max as usize {
                return Err(format!("at most {} file(s) allowed, got {}", max, files.len()));
            }
        }
        for file in files {
            if !self.accepts_type(file) {
                return Err(format!("{} has an unaccepted type ({})", file.name, file.mime_type));
            }
            if let Some(limit) = self.max_file_size {
                if file.size > limit {
                    return Err(format!("{} is {} bytes, limit is {}", file.name, file.size, limit));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question", default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<QuestionImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload_config: Option<FileUploadConfig>,
}

impl Question {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    pub fn offers(&self, option: &str) -> bool {
        self.options().iter().any(|o| o == option)
    }

    /// Restores the starter options when a choice question has none left.
    pub fn ensure_options(&mut self) {
        if self.kind.requires_options() && self.options().is_empty() {
            self.options = Some(default_options());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str, size: u64) -> FileRef {
        FileRef { name: name.into(), size, mime_type: mime.into() }
    }

    #[test]
    fn test_kind_tags_match_wire_format() {
        for kind in QuestionKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.tag().into()));
            assert_eq!(kind.tag().parse::<QuestionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_statement_takes_no_answer() {
        assert!(!QuestionKind::Statement.accepts(&AnswerValue::Text("x".into())));
        assert!(QuestionKind::Signature.accepts(&AnswerValue::Text("data:image/png".into())));
        assert!(!QuestionKind::Checkbox.accepts(&AnswerValue::Text("a".into())));
        assert!(QuestionKind::Checkbox.accepts(&AnswerValue::List(vec![])));
    }

    #[test]
    fn test_cleared_upload_survives_the_wire() {
        let cleared = serde_json::to_value(AnswerValue::Files(vec![])).unwrap();
        let back: AnswerValue = serde_json::from_value(cleared).unwrap();
        assert_eq!(back, AnswerValue::List(vec![]));
        assert!(back.is_empty());
        assert!(QuestionKind::FileUpload.accepts(&back));
        assert!(!QuestionKind::FileUpload.accepts(&AnswerValue::List(vec!["cv.pdf".into()])));
    }

    #[test]
    fn test_starter_upload_limits() {
        let config = FileUploadConfig::starter();
        assert!(config.check(&[file("cv.pdf", "application/pdf", 1024)]).is_ok());
        assert!(config.check(&[file("me.png", "image/png", 2048)]).is_ok());
        assert!(config.check(&[file("a.zip", "application/zip", 10)]).is_err());
        assert!(config.check(&[file("big.png", "image/png", DEFAULT_MAX_FILE_SIZE + 1)]).is_err());
        assert!(config
            .check(&[file("a.pdf", "application/pdf", 1), file("b.pdf", "application/pdf", 1)])
            .is_err());
    }

    #[test]
    fn test_extension_patterns() {
        let config = FileUploadConfig {
            accepted_file_types: Some(vec![".CSV".into()]),
            ..Default::default()
        };
        assert!(config.accepts_type(&file("data.csv", "text/csv", 1)));
        assert!(!config.accepts_type(&file("data.txt", "text/plain", 1)));
    }

    #[test]
    fn test_ensure_options_only_for_choices() {
        let mut q = Question {
            id: "q".into(),
            kind: QuestionKind::SingleSelect,
            prompt: "Pick".into(),
            options: Some(vec![]),
            statement: None,
            image: None,
            file_upload_config: None,
        };
        q.ensure_options();
        assert_eq!(q.options(), default_options().as_slice());

        q.kind = QuestionKind::Date;
        q.options = None;
        q.ensure_options();
        assert!(q.options.is_none());
    }
}
