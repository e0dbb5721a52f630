//! Form builder commands

use std::sync::Arc;

use colored::Colorize;
use serde::de::DeserializeOwned;
use striform_core::{
    ColorTarget, FileUploadPatch, FormBuilder, ImagePatch, QuestionDraft, QuestionKind,
    QuestionPatch, TextAlign, TextStyle,
};

use super::Context;
use crate::error::{CliError, CliResult};
use crate::BuildCommands;

/// Parses a lowercase wire tag such as `split` into its enum.
fn parse_tag<T: DeserializeOwned>(what: &str, value: &str) -> CliResult<T> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| CliError::Invalid(format!("unknown {}: {}", what, value)))
}

fn parse_kind(value: &str) -> CliResult<QuestionKind> {
    value.parse().map_err(CliError::Invalid)
}

/// Applies one edit to the form. Every edit is written through to the local
/// store by the builder.
pub fn apply(builder: &mut FormBuilder, action: BuildCommands) -> CliResult<()> {
    match action {
        BuildCommands::Title { text } => builder.set_title(text)?,
        BuildCommands::Description { text, clear, bold, italic, link } => {
            if clear {
                builder.set_description(None)?;
            } else if let Some(text) = text {
                builder.set_description(Some(text))?;
            }
            for (range, style) in [(bold, TextStyle::Bold), (italic, TextStyle::Italic), (link, TextStyle::Link)] {
                if let Some(range) = range {
                    builder.style_description(range, style)?;
                }
            }
        }
        BuildCommands::Style {
            title_color,
            question_color,
            description_color,
            button_color,
            align,
            button_text,
            redirect_url,
            capture_partial,
        } => {
            let colors = [
                (ColorTarget::Title, title_color),
                (ColorTarget::Question, question_color),
                (ColorTarget::Description, description_color),
                (ColorTarget::SubmitButton, button_color),
            ];
            for (target, color) in colors {
                if let Some(color) = color {
                    builder.set_color(target, color)?;
                }
            }
            if let Some(align) = align {
                let align: TextAlign = align.parse().map_err(CliError::Invalid)?;
                builder.set_text_align(align)?;
            }
            if let Some(text) = button_text {
                builder.set_button_text(text)?;
            }
            if let Some(url) = redirect_url {
                builder.set_redirect_url(Some(url))?;
            }
            if let Some(enabled) = capture_partial {
                builder.set_capture_partial_submissions(enabled)?;
            }
        }
        BuildCommands::Add { kind, prompt, statement } => {
            let kind = parse_kind(&kind)?;
            let draft = if kind == QuestionKind::Statement {
                QuestionDraft::statement(statement.unwrap_or_default())
            } else {
                QuestionDraft::new(kind, prompt.unwrap_or_default())
            };
            let id = builder.add_question(draft)?;
            println!("Added {} question: {}", kind.label(), id.green());
        }
        BuildCommands::Update {
            question,
            kind,
            prompt,
            options,
            statement,
            image_url,
            image_placement,
            image_position,
            max_files,
            accept,
            max_file_size,
        } => {
            let image = if image_url.is_some() || image_placement.is_some() || image_position.is_some() {
                Some(ImagePatch {
                    url: image_url,
                    placement: image_placement.map(|p| parse_tag("image placement", &p)).transpose()?,
                    position: image_position.map(|p| parse_tag("image position", &p)).transpose()?,
                })
            } else {
                None
            };
            let file_upload = if max_files.is_some() || accept.is_some() || max_file_size.is_some() {
                Some(FileUploadPatch {
                    max_files,
                    accepted_file_types: accept,
                    max_file_size,
                })
            } else {
                None
            };
            let patch = QuestionPatch {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                prompt,
                options,
                statement,
                image,
                file_upload,
            };
            builder.update_question(&question, patch)?;
        }
        BuildCommands::Remove { question } => {
            let removed = builder.remove_question(&question)?;
            println!("Removed question: {}", removed.id);
        }
        BuildCommands::Move { from, to } => builder.move_question(from, to)?,
    }
    Ok(())
}

pub async fn handle(form_id: &str, action: BuildCommands, ctx: &Context) -> CliResult<()> {
    ctx.require_signup()?;
    let form = ctx.library.load_form(form_id).await?;
    let mut builder = FormBuilder::new(form, Arc::new(ctx.library.clone()));

    apply(&mut builder, action)?;

    if !ctx.library.sync_form(form_id).await? {
        println!("{} saved locally only", "warning:".yellow());
    }
    ctx.format.print(builder.form());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use striform_core::{FileUploadConfig, Form, FormLibrary, ImagePlacement, LocalCache};

    fn builder() -> (FormLibrary, FormBuilder) {
        let library = FormLibrary::offline(LocalCache::in_memory());
        let form = Form::untitled();
        library.save_form(&form).unwrap();
        let builder = FormBuilder::new(form, Arc::new(library.clone()));
        (library, builder)
    }

    #[test]
    fn test_add_and_update_question() {
        let (library, mut builder) = builder();
        apply(
            &mut builder,
            BuildCommands::Add { kind: "fileUpload".into(), prompt: Some("CV".into()), statement: None },
        )
        .unwrap();
        let id = builder.form().questions[0].id.clone();
        assert_eq!(builder.form().questions[0].file_upload_config, Some(FileUploadConfig::starter()));

        apply(
            &mut builder,
            BuildCommands::Update {
                question: id.clone(),
                kind: None,
                prompt: None,
                options: None,
                statement: None,
                image_url: Some("https://img.test/a.png".into()),
                image_placement: Some("Split".into()),
                image_position: Some("right".into()),
                max_files: Some(3),
                accept: None,
                max_file_size: None,
            },
        )
        .unwrap();

        let stored = library.cache().find_form(&builder.form().id).unwrap().unwrap();
        let question = &stored.questions[0];
        let image = question.image.as_ref().unwrap();
        assert_eq!(image.placement, ImagePlacement::Split);
        let config = question.file_upload_config.as_ref().unwrap();
        assert_eq!(config.max_files, Some(3));
        assert_eq!(config.accepted_file_types, FileUploadConfig::starter().accepted_file_types);
    }

    #[test]
    fn test_style_and_description() {
        let (_, mut builder) = builder();
        apply(
            &mut builder,
            BuildCommands::Description {
                text: Some("Hello world".into()),
                clear: false,
                bold: Some(0..5),
                italic: None,
                link: None,
            },
        )
        .unwrap();
        assert_eq!(builder.form().description.as_deref(), Some("**Hello** world"));

        apply(
            &mut builder,
            BuildCommands::Style {
                title_color: Some("#000".into()),
                question_color: None,
                description_color: None,
                button_color: None,
                align: Some("center".into()),
                button_text: Some("Send".into()),
                redirect_url: None,
                capture_partial: Some(true),
            },
        )
        .unwrap();
        let form = builder.form();
        assert_eq!(form.title_color.as_deref(), Some("#000"));
        assert_eq!(form.text_align(), TextAlign::Center);
        assert_eq!(form.button_text(), "Send");
        assert!(form.capture_partial_submissions);
    }

    #[test]
    fn test_rejects_unknown_tags() {
        let (_, mut builder) = builder();
        let err = apply(
            &mut builder,
            BuildCommands::Add { kind: "slider".into(), prompt: None, statement: None },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)));
        assert!(parse_tag::<ImagePlacement>("image placement", "diagonal").is_err());
    }

    #[test]
    fn test_move_out_of_range() {
        let (_, mut builder) = builder();
        let err = apply(&mut builder, BuildCommands::Move { from: 0, to: 1 }).unwrap_err();
        assert!(matches!(err, CliError::Forms(_)));
    }
}
