// render.rs
// Purpose: turn a Decision into reply frames, including the typed reveal

use crate::gate::{Action, Decision};
use crate::role::{RoleId, RoleRef, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total time the typed reveal takes, regardless of text length.
pub const DEFAULT_REVEAL: Duration = Duration::from_millis(300);

/// Separates the headline from the colored confirmation block.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Shown when the platform refuses the grant/revoke call itself.
pub const PLATFORM_FAILURE_MESSAGE: &str = "⚠️ I lack permission to modify that role.";

/// Presentation color of the confirmation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Green,
    Red,
}

impl Color {
    pub fn ansi(self) -> &'static str {
        match self {
            Color::Green => "\u{1b}[0;32m",
            Color::Red => "\u{1b}[0;31m",
        }
    }
}

/// Who a reply update may ping. Never broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    pub users: Vec<UserId>,
    pub roles: Vec<RoleId>,
}

impl AllowedMentions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn exactly(user: UserId, role: RoleId) -> Self {
        Self {
            users: vec![user],
            roles: vec![role],
        }
    }
}

/// One reply update. Each frame replaces whatever the previous one showed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub text: String,
    pub color: Option<Color>,
    pub allowed_mentions: AllowedMentions,
    /// Byte length of the headline in the full text, when there is a
    /// confirmation block after it.
    #[serde(default)]
    pub headline_len: Option<usize>,
}

impl Frame {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            allowed_mentions: AllowedMentions::none(),
            headline_len: None,
        }
    }

    /// Message content in the platform's markup.
    ///
    /// Once the text reaches the confirmation line, that part is wrapped in an
    /// ANSI code block carrying the frame's color. The split point is the
    /// known headline length, so a headline containing a blank line stays
    /// outside the block.
    pub fn content(&self) -> String {
        let block_start = self.headline_len.map(|len| len + BLOCK_SEPARATOR.len());
        match (self.color, self.headline_len, block_start) {
            (Some(color), Some(len), Some(start))
                if self.text.len() >= start && self.text.is_char_boundary(len) =>
            {
                format!(
                    "{}{BLOCK_SEPARATOR}```ansi\n{}{}\n```",
                    &self.text[..len],
                    color.ansi(),
                    &self.text[start..]
                )
            }
            _ => self.text.clone(),
        }
    }
}

/// The approval text before it is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalMessage {
    pub headline: String,
    pub confirmation: &'static str,
    pub color: Color,
}

impl ApprovalMessage {
    pub fn new(
        action: Action,
        rank_or_descriptor: &str,
        target_descriptor: &str,
        target_user: UserId,
        target_role: &RoleRef,
    ) -> Self {
        let (verb, preposition, confirmation, color) = match action {
            Action::Grant => ("authorized", "for", "Authorization logged.", Color::Green),
            Action::Revoke => ("revoked", "from", "Revocation logged.", Color::Red),
        };
        Self {
            headline: format!(
                "{rank_or_descriptor} has {verb} {target_descriptor} [{}] {preposition} {}.",
                target_role.id.mention(),
                target_user.mention()
            ),
            confirmation,
            color,
        }
    }

    pub fn text(&self) -> String {
        format!("{}{BLOCK_SEPARATOR}{}", self.headline, self.confirmation)
    }
}

/// Lazy, finite sequence of ever-longer prefixes of a text, one per character.
///
/// Consuming it is the only way to read it; there is no rewind. An empty text
/// yields a single empty frame and a zero per-frame delay.
#[derive(Debug)]
pub struct TypedReveal {
    text: String,
    ends: Vec<usize>,
    next: usize,
    per_frame: Duration,
    color: Option<Color>,
    allowed_mentions: AllowedMentions,
    headline_len: Option<usize>,
}

impl TypedReveal {
    pub fn new(
        text: impl Into<String>,
        total: Duration,
        color: Option<Color>,
        allowed_mentions: AllowedMentions,
    ) -> Self {
        let text = text.into();
        let ends: Vec<usize> = if text.is_empty() {
            vec![0]
        } else {
            text.char_indices().map(|(i, c)| i + c.len_utf8()).collect()
        };
        let per_frame = if text.is_empty() {
            Duration::ZERO
        } else {
            total / u32::try_from(ends.len()).unwrap_or(u32::MAX)
        };
        Self {
            text,
            ends,
            next: 0,
            per_frame,
            color,
            allowed_mentions,
            headline_len: None,
        }
    }

    /// Mark the first `len` bytes as the headline; the confirmation block
    /// starts after the separator that follows it.
    pub fn with_headline_len(mut self, len: usize) -> Self {
        self.headline_len = Some(len);
        self
    }

    /// Suspension to apply after each emitted frame.
    pub fn per_frame(&self) -> Duration {
        self.per_frame
    }
}

impl Iterator for TypedReveal {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let end = *self.ends.get(self.next)?;
        self.next += 1;
        Some(Frame {
            text: self.text[..end].to_string(),
            color: self.color,
            allowed_mentions: self.allowed_mentions.clone(),
            headline_len: self.headline_len,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ends.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TypedReveal {}

/// Rendered outcome: either one static frame or a typed reveal.
#[derive(Debug)]
pub enum Rendered {
    Static(Frame),
    Reveal(TypedReveal),
}

impl Rendered {
    pub fn frame_delay(&self) -> Duration {
        match self {
            Rendered::Static(_) => Duration::ZERO,
            Rendered::Reveal(reveal) => reveal.per_frame(),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Rendered::Static(_))
    }
}

impl IntoIterator for Rendered {
    type Item = Frame;
    type IntoIter = Box<dyn Iterator<Item = Frame> + Send>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Rendered::Static(frame) => Box::new(std::iter::once(frame)),
            Rendered::Reveal(reveal) => Box::new(reveal),
        }
    }
}

/// Render a decision for the reply channel.
///
/// Denials are a single static frame with no mentions. Approvals are typed
/// out over `reveal`, pinging exactly the target user and role.
pub fn render(
    decision: &Decision,
    action: Action,
    target_user: UserId,
    target_role: &RoleRef,
    reveal: Duration,
) -> Rendered {
    match decision {
        Decision::Denied(reason) => Rendered::Static(Frame::plain(reason.message())),
        Decision::Approved {
            executor_rank,
            target_descriptor,
        } => {
            let message = ApprovalMessage::new(
                action,
                &executor_rank.to_string(),
                target_descriptor,
                target_user,
                target_role,
            );
            Rendered::Reveal(
                TypedReveal::new(
                    message.text(),
                    reveal,
                    Some(message.color),
                    AllowedMentions::exactly(target_user, target_role.id),
                )
                .with_headline_len(message.headline.len()),
            )
        }
    }
}

/// Static frame for a failed platform call.
pub fn render_platform_failure() -> Rendered {
    Rendered::Static(Frame::plain(PLATFORM_FAILURE_MESSAGE))
}
