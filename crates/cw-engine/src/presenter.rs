//! Output presentation abstraction.

use std::collections::VecDeque;

use serde::Deserialize;

/// How a line of text should be styled.
///
/// Presentation-only: the engine never branches on this beyond passing it
/// through to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// A spoken line.
    Dialogue,
    /// Narration text.
    Narration,
    /// An inner thought of the player character.
    Thought,
    /// An out-of-fiction message from the engine (errors, confirmations).
    System,
}

/// Style information attached to a displayed line.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle<'a> {
    /// Speaker category (a color/style hint, opaque to the engine).
    pub category: &'a str,
    /// The kind of line.
    pub kind: LineKind,
}

/// The presentation collaborator consumed by the engine.
///
/// Implementations own all rendering, pacing, and input reading; the
/// engine only hands over text and waits for answers. `prompt_choice`
/// must return a valid index into `labels`.
pub trait Presenter {
    /// Display a line of text attributed to a speaker.
    fn display(&mut self, speaker: &str, style: LineStyle<'_>, text: &str);

    /// Present a menu and return the index of the selected label.
    fn prompt_choice(&mut self, labels: &[String]) -> usize;

    /// Prompt the player for a line of free text.
    fn prompt_text(&mut self, prompt: &str) -> String;

    /// Pacing pause between dialogue lines. No-op by default.
    fn pause(&mut self, _millis: u64) {}
}

/// A presenter fed from pre-scripted answers, recording every line.
///
/// Used by tests and by non-interactive runs: choices and text inputs are
/// consumed front-to-back, falling back to index 0 / the empty string
/// when the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedPresenter {
    /// Every displayed line, as (speaker, text) pairs.
    pub lines: Vec<(String, String)>,
    choices: VecDeque<usize>,
    inputs: VecDeque<String>,
}

impl ScriptedPresenter {
    /// Create a presenter with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue choice indices to answer menus with.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.choices.extend(choices);
        self
    }

    /// Queue text answers for free-text prompts.
    pub fn with_inputs<S: Into<String>>(mut self, inputs: impl IntoIterator<Item = S>) -> Self {
        self.inputs.extend(inputs.into_iter().map(Into::into));
        self
    }

    /// Concatenated text of every displayed line.
    pub fn transcript(&self) -> String {
        self.lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Presenter for ScriptedPresenter {
    fn display(&mut self, speaker: &str, _style: LineStyle<'_>, text: &str) {
        self.lines.push((speaker.to_string(), text.to_string()));
    }

    fn prompt_choice(&mut self, labels: &[String]) -> usize {
        let picked = self.choices.pop_front().unwrap_or(0);
        picked.min(labels.len().saturating_sub(1))
    }

    fn prompt_text(&mut self, _prompt: &str) -> String {
        self.inputs.pop_front().unwrap_or_default()
    }
}
