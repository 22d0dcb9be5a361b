//! Turn module - the conversation transcript

use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// The assistant asking intake questions
    Assistant,

    /// The patient answering them
    User,
}

impl Speaker {
    /// Get the speaker name as used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Assistant => "assistant",
            Speaker::User => "user",
        }
    }

    /// Parse a speaker from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "assistant" | "bot" => Some(Speaker::Assistant),
            "user" | "patient" => Some(Speaker::User),
            _ => None,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Who said it
    pub role: Speaker,

    /// What was said
    pub content: String,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Render the turn as a `role: content` line
    pub fn render(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

/// Ordered, append-only list of turns
///
/// Insertion order is the only ordering that matters. Turns can be added but
/// never removed or reordered.
///
/// # Examples
///
/// ```
/// use mediassist_domain::{Speaker, Transcript};
///
/// let mut transcript = Transcript::new();
/// transcript.push_assistant("What is your name?");
/// transcript.push_user("Jane Doe");
///
/// assert_eq!(transcript.len(), 2);
/// assert_eq!(transcript.recent(1)[0].role, Speaker::User);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Turn::new(Speaker::Assistant, content));
    }

    /// Append a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Turn::new(Speaker::User, content));
    }

    /// All turns in insertion order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// The most recent turn, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterate over turns spoken by the patient
    pub fn user_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role == Speaker::User)
    }

    /// Render every turn as `role: content` lines
    pub fn render(&self) -> String {
        render_turns(&self.turns)
    }
}

impl FromIterator<Turn> for Transcript {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

/// Render a slice of turns as newline-separated `role: content` lines
pub fn render_turns(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(Turn::render)
        .collect::<Vec<_>>()
        .join("\n")
}
