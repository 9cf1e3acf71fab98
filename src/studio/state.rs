//! Session state shared by the two flows.

use crate::image::{DataUri, ImageSize, ImageSource};

/// The single message line at the top of the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusLine {
    /// Nothing to report.
    #[default]
    Idle,
    /// The last action succeeded.
    Status(String),
    /// The last action failed.
    Error(String),
}

impl StatusLine {
    /// The success text, if any.
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Status(message) => Some(message),
            _ => None,
        }
    }

    /// The error text, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the view renders.
///
/// Each image field has one writer: the generation flow owns
/// `generated_image` and `base_image`, the edit flow owns `edited_image`.
/// Uploads and "use generated" also write `base_image`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudioState {
    /// Prompt of the generation form.
    pub generate_prompt: String,
    /// Size selected in the generation form.
    pub size: ImageSize,
    /// Prompt of the edit form.
    pub edit_prompt: String,
    /// Latest generation result.
    pub generated_image: Option<DataUri>,
    /// Image the next edit will use.
    pub base_image: ImageSource,
    /// Latest edit result.
    pub edited_image: Option<DataUri>,
    /// Status or error from the last action.
    pub status_line: StatusLine,
    /// A generation request is outstanding.
    pub generating: bool,
    /// An edit request is outstanding.
    pub editing: bool,
}

impl StudioState {
    /// Clears both status and error text.
    pub fn reset_status(&mut self) {
        self.status_line = StatusLine::Idle;
    }

    /// Label of the generate button.
    pub fn generate_button_label(&self) -> &'static str {
        if self.generating {
            "Generating..."
        } else {
            "Generate image"
        }
    }

    /// Label of the edit button.
    pub fn edit_button_label(&self) -> &'static str {
        if self.editing {
            "Editing..."
        } else {
            "Edit image"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_accessors() {
        let line = StatusLine::Status("done".into());
        assert_eq!(line.status(), Some("done"));
        assert_eq!(line.error(), None);

        let line = StatusLine::Error("failed".into());
        assert_eq!(line.status(), None);
        assert_eq!(line.error(), Some("failed"));

        assert_eq!(StatusLine::Idle.status(), None);
    }

    #[test]
    fn test_button_labels_follow_busy_flags() {
        let mut state = StudioState::default();
        assert_eq!(state.generate_button_label(), "Generate image");
        assert_eq!(state.edit_button_label(), "Edit image");

        state.generating = true;
        state.editing = true;
        assert_eq!(state.generate_button_label(), "Generating...");
        assert_eq!(state.edit_button_label(), "Editing...");
    }

    #[test]
    fn test_defaults() {
        let state = StudioState::default();
        assert_eq!(state.size, ImageSize::Square);
        assert_eq!(state.base_image, ImageSource::Empty);
        assert_eq!(state.status_line, StatusLine::Idle);
    }
}
