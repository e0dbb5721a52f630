//! Form builder
//!
//! Holds one form as editable state. Every edit is applied locally first and
//! then handed to the [`FormSink`] as a whole form, last write wins.

use std::ops::Range;
use std::sync::Arc;

use crate::domain::question::{default_options, DEFAULT_PROMPT};
use crate::domain::{
    ColorTarget, FileUploadConfig, Form, ImagePlacement, ImagePosition, Question, QuestionImage,
    QuestionKind, TextAlign, TextStyle,
};
use crate::error::{FormsError, Result};

/// Persistence callback invoked after every edit.
pub trait FormSink: Send + Sync {
    fn persist(&self, form: &Form) -> Result<()>;
}

impl<F> FormSink for F
where
    F: Fn(&Form) -> Result<()> + Send + Sync,
{
    fn persist(&self, form: &Form) -> Result<()> {
        self(form)
    }
}

/// What the operator picked in the "add question" dialog.
#[derive(Clone, Debug)]
pub struct QuestionDraft {
    pub kind: QuestionKind,
    pub prompt: String,
    pub statement: String,
}

impl QuestionDraft {
    pub fn new(kind: QuestionKind, prompt: impl Into<String>) -> Self {
        Self { kind, prompt: prompt.into(), statement: String::new() }
    }

    pub fn statement(text: impl Into<String>) -> Self {
        Self { kind: QuestionKind::Statement, prompt: String::new(), statement: text.into() }
    }

    fn into_question(self) -> Question {
        let prompt = if self.prompt.trim().is_empty() { DEFAULT_PROMPT.to_string() } else { self.prompt };
        Question {
            id: crate::new_id(),
            kind: self.kind,
            prompt,
            options: Some(default_options()),
            statement: (self.kind == QuestionKind::Statement).then_some(self.statement),
            image: None,
            file_upload_config: (self.kind == QuestionKind::FileUpload)
                .then(FileUploadConfig::starter),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImagePatch {
    pub url: Option<String>,
    pub placement: Option<ImagePlacement>,
    pub position: Option<ImagePosition>,
}

#[derive(Clone, Debug, Default)]
pub struct FileUploadPatch {
    pub max_files: Option<u32>,
    pub accepted_file_types: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
}

/// Field-wise update of one question. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct QuestionPatch {
    pub kind: Option<QuestionKind>,
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub statement: Option<String>,
    pub image: Option<ImagePatch>,
    pub file_upload: Option<FileUploadPatch>,
}

impl QuestionPatch {
    fn apply(self, question: &mut Question) {
        if let Some(kind) = self.kind {
            question.kind = kind;
        }
        if let Some(prompt) = self.prompt {
            question.prompt = prompt;
        }
        if let Some(options) = self.options {
            question.options = Some(options);
        }
        if let Some(statement) = self.statement {
            question.statement = Some(statement);
        }
        if let Some(patch) = self.image {
            let image = question.image.get_or_insert_with(QuestionImage::default);
            if let Some(url) = patch.url {
                image.url = url;
            }
            if let Some(placement) = patch.placement {
                image.placement = placement;
            }
            if let Some(position) = patch.position {
                image.position = Some(position);
            }
        }
        if let Some(patch) = self.file_upload {
            let config = question.file_upload_config.get_or_insert_with(FileUploadConfig::default);
            if let Some(max_files) = patch.max_files {
                config.max_files = Some(max_files);
            }
            if let Some(types) = patch.accepted_file_types {
                config.accepted_file_types = Some(types);
            }
            if let Some(size) = patch.max_file_size {
                config.max_file_size = Some(size);
            }
        }
        question.ensure_options();
    }
}

pub struct FormBuilder {
    form: Form,
    sink: Arc<dyn FormSink>,
}

impl FormBuilder {
    pub fn new(form: Form, sink: Arc<dyn FormSink>) -> Self {
        Self { form, sink }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    fn commit(&self) -> Result<()> {
        self.sink.persist(&self.form)
    }

    fn edit(&mut self, f: impl FnOnce(&mut Form)) -> Result<()> {
        f(&mut self.form);
        self.commit()
    }

    // Form-level fields

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        self.edit(|form| form.set_title(title))
    }

    pub fn set_description(&mut self, description: Option<String>) -> Result<()> {
        self.edit(|form| form.set_description(description))
    }

    pub fn style_description(&mut self, selection: Range<usize>, style: TextStyle) -> Result<()> {
        self.edit(|form| form.style_description(selection, style))
    }

    pub fn set_color(&mut self, target: ColorTarget, color: impl Into<String>) -> Result<()> {
        let color = color.into();
        self.edit(|form| form.set_color(target, color))
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> Result<()> {
        self.edit(|form| form.set_text_align(align))
    }

    pub fn set_button_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.edit(|form| form.set_button_text(text))
    }

    pub fn set_redirect_url(&mut self, url: Option<String>) -> Result<()> {
        self.edit(|form| form.set_redirect_url(url))
    }

    pub fn set_capture_partial_submissions(&mut self, enabled: bool) -> Result<()> {
        self.edit(|form| form.set_capture_partial_submissions(enabled))
    }

    // Questions

    /// Appends a question built from `draft` and returns its fresh id.
    pub fn add_question(&mut self, draft: QuestionDraft) -> Result<String> {
        let question = draft.into_question();
        let id = question.id.clone();
        self.edit(|form| form.questions.push(question))?;
        Ok(id)
    }

    pub fn update_question(&mut self, id: &str, patch: QuestionPatch) -> Result<()> {
        let question = self
            .form
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| FormsError::QuestionNotFound(id.to_string()))?;
        patch.apply(question);
        self.commit()
    }

    pub fn remove_question(&mut self, id: &str) -> Result<Question> {
        let index = self
            .form
            .question_index(id)
            .ok_or_else(|| FormsError::QuestionNotFound(id.to_string()))?;
        let removed = self.form.questions.remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Moves the question at `from` so it ends up at `to`.
    pub fn move_question(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.form.questions.len();
        for index in [from, to] {
            if index >= len {
                return Err(FormsError::IndexOutOfRange { index, len });
            }
        }
        let question = self.form.questions.remove(from);
        self.form.questions.insert(to, question);
        self.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<Form>>,
    }

    impl FormSink for RecordingSink {
        fn persist(&self, form: &Form) -> Result<()> {
            self.saved.lock().push(form.clone());
            Ok(())
        }
    }

    fn builder() -> (FormBuilder, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (FormBuilder::new(Form::untitled(), sink.clone()), sink)
    }

    fn ids(builder: &FormBuilder) -> Vec<String> {
        builder.form().questions.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn test_every_edit_persists() {
        let (mut b, sink) = builder();
        b.set_title("T").unwrap();
        let id = b.add_question(QuestionDraft::new(QuestionKind::ShortText, "Name?")).unwrap();
        b.update_question(&id, QuestionPatch { prompt: Some("Full name?".into()), ..Default::default() })
            .unwrap();
        b.remove_question(&id).unwrap();

        let saved = sink.saved.lock();
        assert_eq!(saved.len(), 4);
        assert_eq!(saved[0].title, "T");
        assert_eq!(saved[2].questions[0].prompt, "Full name?");
        assert!(saved[3].questions.is_empty());
    }

    #[test]
    fn test_new_question_defaults() {
        let (mut b, _) = builder();
        let text = b.add_question(QuestionDraft::new(QuestionKind::ShortText, "  ")).unwrap();
        let upload = b.add_question(QuestionDraft::new(QuestionKind::FileUpload, "CV")).unwrap();
        let statement = b.add_question(QuestionDraft::statement("Welcome!")).unwrap();
        assert_ne!(text, upload);

        let form = b.form();
        assert_eq!(form.question(&text).unwrap().prompt, DEFAULT_PROMPT);
        assert_eq!(form.question(&text).unwrap().options(), default_options().as_slice());
        assert_eq!(form.question(&upload).unwrap().file_upload_config, Some(FileUploadConfig::starter()));
        assert_eq!(form.question(&statement).unwrap().statement.as_deref(), Some("Welcome!"));
        assert_eq!(form.question(&text).unwrap().statement, None);
    }

    #[test]
    fn test_nested_patches_merge() {
        let (mut b, _) = builder();
        let id = b.add_question(QuestionDraft::new(QuestionKind::FileUpload, "Photo")).unwrap();
        b.update_question(&id, QuestionPatch {
            image: Some(ImagePatch { url: Some("https://img/x.png".into()), ..Default::default() }),
            ..Default::default()
        })
        .unwrap();
        b.update_question(&id, QuestionPatch {
            image: Some(ImagePatch {
                placement: Some(ImagePlacement::Split),
                position: Some(ImagePosition::Right),
                ..Default::default()
            }),
            file_upload: Some(FileUploadPatch { max_files: Some(3), ..Default::default() }),
            ..Default::default()
        })
        .unwrap();

        let q = b.form().question(&id).unwrap();
        let image = q.image.as_ref().unwrap();
        assert_eq!(image.url, "https://img/x.png");
        assert_eq!(image.placement, ImagePlacement::Split);
        assert_eq!(image.position, Some(ImagePosition::Right));
        let config = q.file_upload_config.as_ref().unwrap();
        assert_eq!(config.max_files, Some(3));
        assert_eq!(config.max_file_size, FileUploadConfig::starter().max_file_size);
    }

    #[test]
    fn test_reorder_and_back_restores_order() {
        let (mut b, _) = builder();
        for prompt in ["a", "b", "c", "d"] {
            b.add_question(QuestionDraft::new(QuestionKind::ShortText, prompt)).unwrap();
        }
        let original = ids(&b);

        b.move_question(0, 2).unwrap();
        assert_eq!(ids(&b), vec![original[1].clone(), original[2].clone(), original[0].clone(), original[3].clone()]);
        b.move_question(2, 0).unwrap();
        assert_eq!(ids(&b), original);

        b.move_question(3, 1).unwrap();
        b.move_question(1, 3).unwrap();
        assert_eq!(ids(&b), original);
    }

    #[test]
    fn test_out_of_range_move_leaves_form_untouched() {
        let (mut b, sink) = builder();
        b.add_question(QuestionDraft::new(QuestionKind::Date, "When?")).unwrap();
        let err = b.move_question(0, 5).unwrap_err();
        assert!(matches!(err, FormsError::IndexOutOfRange { index: 5, len: 1 }));
        assert_eq!(sink.saved.lock().len(), 1);
    }

    #[test]
    fn test_choice_options_survive_edit_cycles() {
        let (mut b, _) = builder();
        let id = b.add_question(QuestionDraft::new(QuestionKind::SingleSelect, "Plan")).unwrap();
        b.update_question(&id, QuestionPatch { options: Some(vec![]), ..Default::default() }).unwrap();
        assert!(!b.form().question(&id).unwrap().options().is_empty());

        b.update_question(&id, QuestionPatch { kind: Some(QuestionKind::Email), options: Some(vec![]), ..Default::default() })
            .unwrap();
        b.update_question(&id, QuestionPatch { kind: Some(QuestionKind::Checkbox), ..Default::default() })
            .unwrap();
        let q = b.form().question(&id).unwrap();
        assert_eq!(q.kind, QuestionKind::Checkbox);
        assert_eq!(q.options(), default_options().as_slice());

        b.update_question(&id, QuestionPatch { options: Some(vec!["A".into(), "B".into()]), ..Default::default() })
            .unwrap();
        assert_eq!(b.form().question(&id).unwrap().options(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_unknown_question() {
        let (mut b, _) = builder();
        assert!(matches!(b.remove_question("nope"), Err(FormsError::QuestionNotFound(_))));
        assert!(matches!(
            b.update_question("nope", QuestionPatch::default()),
            Err(FormsError::QuestionNotFound(_))
        ));
    }

    #[test]
    fn test_closure_sink() {
        let count = Arc::new(Mutex::new(0));
        let seen = count.clone();
        let sink = move |_: &Form| -> Result<()> {
            *seen.lock() += 1;
            Ok(())
        };
        let mut b = FormBuilder::new(Form::untitled(), Arc::new(sink));
        b.set_text_align(TextAlign::Center).unwrap();
        b.set_color(ColorTarget::Title, "#111").unwrap();
        assert_eq!(*count.lock(), 2);
        assert_eq!(b.form().title_color.as_deref(), Some("#111"));
    }
}
