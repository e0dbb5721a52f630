//! Presentation settings
//!
//! Plain setters over a form's look. Nothing here validates colors or URLs.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;
use utoipa::ToSchema;

use super::form::Form;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown alignment: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTarget {
    Title,
    Question,
    Description,
    SubmitButton,
}

impl FromStr for ColorTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" | "titleColor" => Ok(Self::Title),
            "question" | "questionColor" => Ok(Self::Question),
            "description" | "descriptionColor" => Ok(Self::Description),
            "button" | "submitButtonColor" => Ok(Self::SubmitButton),
            other => Err(format!("unknown color target: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Italic,
    Link,
}

/// Wraps the selected part of `text` in markdown for `style`.
///
/// The selection is a byte range. Out-of-range ends are clamped and ends
/// falling inside a UTF-8 sequence move back to the previous boundary.
pub fn apply_text_style(text: &str, selection: Range<usize>, style: TextStyle) -> String {
    let floor = |mut i: usize| {
        i = i.min(text.len());
        while !text.is_char_boundary(i) {
            i -= 1;
        }
        i
    };
    let start = floor(selection.start);
    let end = floor(selection.end).max(start);
    let selected = &text[start..end];

    let wrapped = match style {
        TextStyle::Bold => format!("**{}**", selected),
        TextStyle::Italic => format!("*{}*", selected),
        TextStyle::Link => format!("[{}](url)", selected),
    };

    let mut out = String::with_capacity(text.len() + wrapped.len());
    out.push_str(&text[..start]);
    out.push_str(&wrapped);
    out.push_str(&text[end..]);
    out
}

impl Form {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_color(&mut self, target: ColorTarget, color: impl Into<String>) {
        let slot = match target {
            ColorTarget::Title => &mut self.title_color,
            ColorTarget::Question => &mut self.question_color,
            ColorTarget::Description => &mut self.description_color,
            ColorTarget::SubmitButton => &mut self.submit_button_color,
        };
        *slot = Some(color.into());
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = Some(align);
    }

    pub fn set_button_text(&mut self, text: impl Into<String>) {
        self.button_text = Some(text.into());
    }

    pub fn set_redirect_url(&mut self, url: Option<String>) {
        self.redirect_url = url.filter(|u| !u.is_empty());
    }

    pub fn set_capture_partial_submissions(&mut self, enabled: bool) {
        self.capture_partial_submissions = enabled;
    }

    /// Applies markdown emphasis to a selection of the description.
    pub fn style_description(&mut self, selection: Range<usize>, style: TextStyle) {
        let current = self.description.as_deref().unwrap_or_default();
        self.description = Some(apply_text_style(current, selection, style));
    }
}
