//! Modal prompts as continuation values.
//!
//! A modal carries the action to resume once the user answers. `submit` and
//! `cancel` consume the modal, so each one resolves exactly once and its state
//! is released on every path.

/// What to do with a submitted name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    CreateFolder { parent: String },
    RenameFolder { path: String },
    RenameFile { path: String, folder: String },
}

/// What to do once a destructive operation is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteFolder { path: String },
    DeleteFile { path: String, folder: String },
}

/// Single-line text input with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub title: String,
    pub message: String,
    input: String,
    /// Byte offset into `input`.
    cursor: usize,
    action: PromptAction,
}

impl TextPrompt {
    /// A prompt pre-filled with `default`, cursor at the end.
    pub fn new(title: &str, message: &str, default: &str, action: PromptAction) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            input: default.to_string(),
            cursor: default.len(),
            action,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn action(&self) -> &PromptAction {
        &self.action
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.input.remove(self.cursor);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.len();
    }
}

/// Yes/no question before a destructive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub title: String,
    pub message: String,
    action: ConfirmAction,
}

impl Confirm {
    pub fn new(title: &str, message: &str, action: ConfirmAction) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            action,
        }
    }

    pub fn action(&self) -> &ConfirmAction {
        &self.action
    }
}

/// The modal currently shown over the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Prompt(TextPrompt),
    Confirm(Confirm),
}

/// The answer a modal resolved to, paired with its pending action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// `None` when the prompt was cancelled.
    Prompt {
        action: PromptAction,
        value: Option<String>,
    },
    Confirm {
        action: ConfirmAction,
        confirmed: bool,
    },
}

impl Modal {
    /// Resolve with the entered text, or as confirmed.
    pub fn submit(self) -> Resolution {
        match self {
            Modal::Prompt(p) => Resolution::Prompt {
                action: p.action,
                value: Some(p.input),
            },
            Modal::Confirm(c) => Resolution::Confirm {
                action: c.action,
                confirmed: true,
            },
        }
    }

    /// Resolve with no result, or as declined.
    pub fn cancel(self) -> Resolution {
        match self {
            Modal::Prompt(p) => Resolution::Prompt {
                action: p.action,
                value: None,
            },
            Modal::Confirm(c) => Resolution::Confirm {
                action: c.action,
                confirmed: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(default: &str) -> TextPrompt {
        TextPrompt::new(
            "New folder",
            "Folder name:",
            default,
            PromptAction::CreateFolder {
                parent: "/".into(),
            },
        )
    }

    #[test]
    fn prefilled_cursor_at_end() {
        let p = prompt("Notes");
        assert_eq!(p.input(), "Notes");
        assert_eq!(p.cursor(), 5);
    }

    #[test]
    fn insert_and_backspace() {
        let mut p = prompt("");
        p.insert_char('a');
        p.insert_char('b');
        p.insert_char('c');
        assert_eq!(p.input(), "abc");
        p.delete_char();
        assert_eq!(p.input(), "ab");
        assert_eq!(p.cursor(), 2);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut p = prompt("x");
        p.home();
        p.delete_char();
        assert_eq!(p.input(), "x");
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn cursor_moves_over_multibyte_chars() {
        let mut p = prompt("añb");
        p.move_left();
        assert_eq!(p.cursor(), 3);
        p.move_left();
        assert_eq!(p.cursor(), 1);
        p.move_right();
        assert_eq!(p.cursor(), 3);
        p.delete_char();
        assert_eq!(p.input(), "ab");
        p.end();
        p.move_right();
        assert_eq!(p.cursor(), 2);
    }

    #[test]
    fn delete_forward_removes_under_cursor() {
        let mut p = prompt("abc");
        p.home();
        p.delete_forward();
        assert_eq!(p.input(), "bc");
        p.end();
        p.delete_forward();
        assert_eq!(p.input(), "bc");
    }

    #[test]
    fn prompt_submit_and_cancel() {
        let mut p = prompt("");
        p.insert_char('J');
        let action = p.action().clone();
        assert_eq!(
            Modal::Prompt(p.clone()).submit(),
            Resolution::Prompt {
                action: action.clone(),
                value: Some("J".into())
            }
        );
        assert_eq!(
            Modal::Prompt(p).cancel(),
            Resolution::Prompt {
                action,
                value: None
            }
        );
    }

    #[test]
    fn confirm_submit_and_cancel() {
        let action = ConfirmAction::DeleteFolder {
            path: "Notes".into(),
        };
        let c = Confirm::new("Delete folder", "Delete \"Notes\"?", action.clone());
        assert_eq!(
            Modal::Confirm(c.clone()).submit(),
            Resolution::Confirm {
                action: action.clone(),
                confirmed: true
            }
        );
        assert_eq!(
            Modal::Confirm(c).cancel(),
            Resolution::Confirm {
                action,
                confirmed: false
            }
        );
    }
}
