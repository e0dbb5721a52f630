//! Interactive form filling

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use striform_core::{
    Advance, AnswerValue, FileRef, FormSession, HttpWebhookSender, Question, QuestionKind,
    SessionMode, Submission, WebhookDelivery,
};

use super::Context;
use crate::error::CliResult;

pub async fn handle(form_id: &str, preview: bool, ctx: &Context) -> CliResult<()> {
    let form = ctx.library.load_form(form_id).await?;
    let mode = if preview { SessionMode::Preview } else { SessionMode::Live };
    let mut session = FormSession::new(
        form,
        ctx.library.cache().clone(),
        Arc::new(ctx.library.clone()),
        Arc::new(HttpWebhookSender::new()),
    )
    .with_mode(mode)
    .with_viewer(ctx.viewer());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    let submitted = run(&mut session, &mut input, &mut out).await?;

    if submitted.is_some() {
        if let Err(e) = ctx.library.refresh_response_count(form_id) {
            tracing::debug!(form_id = %form_id, error = %e, "form not stored locally, counter left alone");
        }
    }
    Ok(())
}

/// Walks the respondent through every question. Returns the submission, or
/// `None` for previews and abandoned sessions.
pub async fn run<R: BufRead, W: Write>(
    session: &mut FormSession,
    input: &mut R,
    out: &mut W,
) -> CliResult<Option<Submission>> {
    let form = session.form().clone();
    writeln!(out, "{}", form.title.bold())?;
    if let Some(description) = form.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "{}", description)?;
    }
    if session.is_preview() {
        writeln!(out, "{}", "(preview: nothing will be recorded)".dimmed())?;
    }

    loop {
        if let Some(question) = session.current_question().cloned() {
            writeln!(out)?;
            writeln!(out, "{}", session.progress_label().dimmed())?;
            render(&question, out)?;
            write!(out, "[{}] > ", session.button_label())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                writeln!(out, "Form abandoned.")?;
                return Ok(None);
            }

            match parse_answer(&question, line.trim()) {
                Ok(Some(value)) => {
                    if let Err(e) = session.answer(value) {
                        writeln!(out, "{} {}", "invalid:".red(), e)?;
                        continue;
                    }
                }
                Ok(None) => {}
                Err(message) => {
                    writeln!(out, "{} {}", "invalid:".red(), message)?;
                    continue;
                }
            }
        }

        match session.advance().await? {
            Advance::Next { .. } => {}
            Advance::PreviewEnd => {
                writeln!(out)?;
                writeln!(out, "End of preview.")?;
                return Ok(None);
            }
            Advance::Submitted(submission) => {
                report(&submission, out)?;
                return Ok(Some(submission));
            }
        }
    }
}

fn render<W: Write>(question: &Question, out: &mut W) -> CliResult<()> {
    if question.kind == QuestionKind::Statement {
        writeln!(out, "{}", question.statement.as_deref().unwrap_or_default())?;
        return Ok(());
    }
    writeln!(out, "{}", question.prompt.bold())?;
    if let Some(image) = question.image.as_ref().filter(|i| !i.url.is_empty()) {
        writeln!(out, "  image: {}", image.url)?;
    }
    if question.kind.requires_options() {
        for (i, option) in question.options().iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, option)?;
        }
        if question.kind.is_multi_select() {
            writeln!(out, "  {}", "(comma-separated numbers or names)".dimmed())?;
        }
    }
    if question.kind == QuestionKind::FileUpload {
        writeln!(out, "  {}", "(comma-separated file paths)".dimmed())?;
    }
    Ok(())
}

fn pick_option(question: &Question, choice: &str) -> String {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options().get(i).cloned())
        .unwrap_or_else(|| choice.to_string())
}

/// Turns one line of input into an answer. An empty line skips the question.
fn parse_answer(question: &Question, line: &str) -> Result<Option<AnswerValue>, String> {
    if line.is_empty() || question.kind == QuestionKind::Statement {
        return Ok(None);
    }
    let value = match question.kind {
        QuestionKind::MultipleChoice | QuestionKind::Checkbox => AnswerValue::List(
            line.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| pick_option(question, c))
                .collect(),
        ),
        QuestionKind::SingleSelect => AnswerValue::Text(pick_option(question, line)),
        QuestionKind::FileUpload => AnswerValue::Files(
            line.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| file_ref(Path::new(p)))
                .collect::<Result<_, _>>()?,
        ),
        _ => AnswerValue::Text(line.to_string()),
    };
    Ok(Some(value))
}

fn file_ref(path: &Path) -> Result<FileRef, String> {
    let meta = std::fs::metadata(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileRef { mime_type: mime_type(&name).to_string(), name, size: meta.len() })
}

fn mime_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn report<W: Write>(submission: &Submission, out: &mut W) -> CliResult<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Thank you! Your response has been recorded.".green())?;
    match &submission.webhook {
        Some(WebhookDelivery::Delivered) => writeln!(out, "Webhook notified.")?,
        Some(WebhookDelivery::Failed(reason)) => {
            writeln!(out, "{} webhook delivery failed: {}", "warning:".yellow(), reason)?
        }
        None => {}
    }
    if let Some(url) = &submission.redirect_url {
        writeln!(out, "Continue at {}", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fakes::Recorder;
    use std::io::Cursor;
    use striform_core::{Form, FormLibrary, IntegrationKind, LocalCache, Question};

    mod fakes {
        use super::*;
        use std::sync::Mutex;
        use striform_core::{RemoteError, WebhookPayload, WebhookSender};

        #[derive(Default)]
        pub struct Recorder {
            pub sent: Mutex<Vec<(String, WebhookPayload)>>,
        }

        #[async_trait]
        impl WebhookSender for Recorder {
            async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<(), RemoteError> {
                self.sent.lock().unwrap().push((url.to_string(), payload.clone()));
                Ok(())
            }
        }
    }

    fn question(id: &str, kind: QuestionKind, prompt: &str) -> Question {
        Question {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            options: kind.requires_options().then(|| vec!["Red".into(), "Green".into(), "Blue".into()]),
            statement: (kind == QuestionKind::Statement).then(|| "Welcome".into()),
            image: None,
            file_upload_config: None,
        }
    }

    fn survey() -> Form {
        Form {
            id: "f1".into(),
            title: "Survey".into(),
            redirect_url: Some("https://example.com/thanks".into()),
            questions: vec![
                question("intro", QuestionKind::Statement, ""),
                question("name", QuestionKind::ShortText, "Name?"),
                question("fav", QuestionKind::SingleSelect, "Favourite?"),
                question("all", QuestionKind::Checkbox, "Which ones?"),
            ],
            ..Default::default()
        }
    }

    fn session(form: Form, cache: &LocalCache, webhooks: Arc<Recorder>) -> FormSession {
        let library = FormLibrary::offline(cache.clone());
        FormSession::new(form, cache.clone(), Arc::new(library), webhooks)
    }

    #[tokio::test]
    async fn test_full_run_records_response_and_webhook() {
        let cache = LocalCache::in_memory();
        let mut integrations = cache.integrations("f1").unwrap();
        integrations.connect(IntegrationKind::Webhook, "https://hooks.test/x");
        cache.save_integrations("f1", &integrations).unwrap();

        let recorder = Arc::new(Recorder::default());
        let mut session = session(survey(), &cache, recorder.clone());

        let mut input = Cursor::new("\nAda\n2\n1, Blue\n");
        let mut out = Vec::new();
        let submission = run(&mut session, &mut input, &mut out).await.unwrap().unwrap();

        assert_eq!(submission.response.answers.get("name"), Some(&AnswerValue::Text("Ada".into())));
        assert_eq!(submission.response.answers.get("fav"), Some(&AnswerValue::Text("Green".into())));
        assert_eq!(
            submission.response.answers.get("all"),
            Some(&AnswerValue::List(vec!["Red".into(), "Blue".into()]))
        );
        assert_eq!(cache.responses("f1").unwrap().len(), 1);
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Question 2 of 4"));
        assert!(printed.contains("https://example.com/thanks"));
    }

    #[tokio::test]
    async fn test_invalid_option_reprompts() {
        let cache = LocalCache::in_memory();
        let form = Form {
            id: "f2".into(),
            questions: vec![question("fav", QuestionKind::SingleSelect, "Favourite?")],
            ..Default::default()
        };
        let mut session = session(form, &cache, Arc::new(Recorder::default()));

        let mut input = Cursor::new("Purple\n3\n");
        let mut out = Vec::new();
        let submission = run(&mut session, &mut input, &mut out).await.unwrap().unwrap();

        assert_eq!(submission.response.answers.get("fav"), Some(&AnswerValue::Text("Blue".into())));
        assert!(String::from_utf8(out).unwrap().contains("invalid:"));
    }

    #[tokio::test]
    async fn test_preview_records_nothing() {
        let cache = LocalCache::in_memory();
        let mut session = session(survey(), &cache, Arc::new(Recorder::default()))
            .with_mode(SessionMode::Preview);

        let mut input = Cursor::new("\nAda\n1\n2\n");
        let mut out = Vec::new();
        assert!(run(&mut session, &mut input, &mut out).await.unwrap().is_none());
        assert!(cache.responses("f1").unwrap().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("End of preview"));
    }

    #[tokio::test]
    async fn test_eof_abandons_session() {
        let cache = LocalCache::in_memory();
        let mut session = session(survey(), &cache, Arc::new(Recorder::default()));

        let mut input = Cursor::new("\nAda\n");
        let mut out = Vec::new();
        assert!(run(&mut session, &mut input, &mut out).await.unwrap().is_none());
        assert!(cache.responses("f1").unwrap().is_empty());
    }

    #[test]
    fn test_file_answers_use_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let q = question("cv", QuestionKind::FileUpload, "CV");
        let value = parse_answer(&q, path.to_str().unwrap()).unwrap().unwrap();
        match value {
            AnswerValue::Files(files) => {
                assert_eq!(files[0].name, "cv.PDF");
                assert_eq!(files[0].size, 8);
                assert_eq!(files[0].mime_type, "application/pdf");
            }
            other => panic!("expected files, got {:?}", other),
        }
        assert!(parse_answer(&q, "/definitely/not/here.pdf").is_err());
    }

    #[test]
    fn test_mime_type_ignores_extension_case() {
        assert_eq!(mime_type("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type("photo.Jpeg"), "image/jpeg");
        assert_eq!(mime_type("image.PNG"), "image/png");
        assert_eq!(mime_type("Report.Docx"), mime_type("report.docx"));
        assert_eq!(mime_type("archive.tar.gz"), "application/octet-stream");
        assert_eq!(mime_type("notes.xyz"), "application/octet-stream");
        assert_eq!(mime_type("README"), "application/octet-stream");
        assert_eq!(mime_type(".pdf"), "application/octet-stream");
    }
}
