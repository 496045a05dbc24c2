//! Transcript and audio rendering
//!
//! Pure reads of [`Session`]: the full conversation is re-rendered on every
//! turn as sender-distinguished chat bubbles with timestamps, and reply
//! audio is embedded as a base64 `<audio autoplay>` fragment.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::session::{Session, Speaker};

/// Escape text for safe embedding in HTML
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one turn as a chat bubble
///
/// User turns are left-aligned blue bubbles, assistant turns right-aligned
/// gray bubbles, each with its `HH:MM` timestamp.
fn render_bubble(speaker: Speaker, timestamp: &str, text: &str) -> String {
    let text = escape_html(text);
    let timestamp = escape_html(timestamp);
    match speaker {
        Speaker::User => format!(
            "<div class=\"turn user\" style=\"display:flex;align-items:center;\">\
             <div style=\"background-color:#007AFF;color:white;border-radius:12px;padding:8px 12px;margin-right:8px;\">{text}</div>\
             <div style=\"font-size:0.8rem;color:gray;\">{timestamp}</div></div>"
        ),
        Speaker::Assistant => format!(
            "<div class=\"turn assistant\" style=\"display:flex;align-items:center;justify-content:flex-end;\">\
             <div style=\"background-color:lightgray;border-radius:12px;padding:8px 12px;margin-left:8px;\">{text}</div>\
             <div style=\"font-size:0.8rem;color:gray;\">{timestamp}</div></div>"
        ),
    }
}

/// Render the full conversation as an ordered list of styled turn entries
#[must_use]
pub fn render_transcript(session: &Session) -> String {
    let mut out = String::new();
    for turn in session.turns() {
        out.push_str(&render_bubble(turn.speaker, &turn.timestamp, &turn.text));
        out.push('\n');
    }
    out
}

/// Build an inline autoplaying audio fragment from MP3 bytes
#[must_use]
pub fn audio_fragment(mp3: &[u8]) -> String {
    let b64 = BASE64.encode(mp3);
    format!(
        "<audio autoplay=\"true\">\
         <source src=\"data:audio/mp3;base64,{b64}\" type=\"audio/mp3\">\
         </audio>"
    )
}
