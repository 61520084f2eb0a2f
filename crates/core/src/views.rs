//! HTML presentation for the chat page and dashboard.
//!
//! Templates live in `templates/` and escape every interpolated value except the
//! chart SVG, which is produced by our own renderer.

use crate::chat::session::ChatTranscript;
use crate::dashboard::DashboardCard;
use crate::domain::message::ChatMessage;
use anyhow::{Context, Result};
use askama::Template;

#[derive(Template)]
#[template(path = "chat.html")]
struct ChatPage<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    cards: &'a [DashboardCard],
}

pub fn render_chat_page(transcript: &ChatTranscript) -> Result<String> {
    ChatPage {
        messages: &transcript.messages,
    }
    .render()
    .context("failed to render chat page")
}

pub fn render_dashboard(cards: &[DashboardCard]) -> Result<String> {
    DashboardPage { cards }
        .render()
        .context("failed to render dashboard")
}
