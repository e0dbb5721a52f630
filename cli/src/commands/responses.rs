//! Response review commands

use serde::Serialize;
use striform_core::{Form, Response};

use super::Context;
use crate::error::CliResult;
use crate::output::OutputFormat;

/// One table row per response, one column per question.
#[derive(Debug, Serialize)]
pub struct ResponseRow {
    pub submitted_at: String,
    pub partial: bool,
    pub answers: Vec<String>,
}

/// Column headers: submission time, then each question's prompt.
pub fn headers(form: &Form) -> Vec<String> {
    let mut headers = vec!["Submitted".to_string()];
    headers.extend(form.questions.iter().map(|q| {
        if q.prompt.is_empty() {
            q.kind.label().to_string()
        } else {
            q.prompt.clone()
        }
    }));
    headers
}

pub fn rows(form: &Form, responses: &[Response]) -> Vec<ResponseRow> {
    responses
        .iter()
        .map(|r| ResponseRow {
            submitted_at: r.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            partial: r.is_partial,
            answers: form
                .questions
                .iter()
                .map(|q| r.answers.get(&q.id).map(|a| a.display()).unwrap_or_else(|| "-".into()))
                .collect(),
        })
        .collect()
}

fn render(form: &Form, rows: &[ResponseRow]) -> String {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(headers(form));
    for row in rows {
        let mut record = vec![if row.partial {
            format!("{} (partial)", row.submitted_at)
        } else {
            row.submitted_at.clone()
        }];
        record.extend(row.answers.iter().cloned());
        builder.push_record(record);
    }
    builder.build().with(tabled::settings::Style::rounded()).to_string()
}

pub async fn handle(form_id: &str, include_partial: bool, ctx: &Context) -> CliResult<()> {
    let form = ctx.library.load_form(form_id).await?;
    let responses = ctx.library.responses(form_id, include_partial).await?;

    match ctx.format {
        OutputFormat::Table => {
            println!("{} ({} responses)", form.title, responses.len());
            if responses.is_empty() {
                println!("No responses yet.");
            } else {
                println!("{}", render(&form, &rows(&form, &responses)));
            }
        }
        format => format.print(&responses),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use striform_core::{AnswerValue, Answers, Question, QuestionKind};

    fn form() -> Form {
        let q = |id: &str, prompt: &str| Question {
            id: id.into(),
            kind: QuestionKind::ShortText,
            prompt: prompt.into(),
            options: None,
            statement: None,
            image: None,
            file_upload_config: None,
        };
        Form {
            id: "f1".into(),
            title: "Survey".into(),
            questions: vec![q("q1", "Name?"), q("q2", "")],
            ..Default::default()
        }
    }

    #[test]
    fn test_headers_fall_back_to_kind_label() {
        assert_eq!(headers(&form()), vec!["Submitted", "Name?", "Short Text"]);
    }

    #[test]
    fn test_rows_fill_missing_answers() {
        let answers: Answers = [("q1", AnswerValue::Text("Ada".into()))].into_iter().collect();
        let responses = vec![Response::complete("f1", answers, 1)];
        let rows = rows(&form(), &responses);
        assert_eq!(rows[0].answers, vec!["Ada", "-"]);

        let rendered = render(&form(), &rows);
        assert!(rendered.contains("Name?"));
        assert!(rendered.contains("Ada"));
    }
}
