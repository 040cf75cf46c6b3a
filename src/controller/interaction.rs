//! Blocking user interaction the controller relies on.

/// Prompt, confirm and notify, each modal to the caller.
///
/// Front ends implement this over whatever they have (a terminal, native
/// dialogs); tests script the answers.
pub trait Interaction {
    /// Ask for a line of text. `None` means the user cancelled.
    fn prompt_text(&mut self, message: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a message the user has to acknowledge.
    fn notify(&mut self, message: &str);
}

/// Receives the current collection whenever the visible state changed.
pub trait Render {
    fn render(&mut self, lists: &crate::lists::ListCollection);
}

impl<F> Render for F
where
    F: FnMut(&crate::lists::ListCollection),
{
    fn render(&mut self, lists: &crate::lists::ListCollection) {
        self(lists)
    }
}
