//! Plain-text rendering of the lobby view.
//!
//! The terminal redraws the whole panel on every change, so rendering is a
//! pure `LobbyView` to lines step that tests can pin line by line.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use arena_lobby::surface::{
    ATTACHMENT_HEADING, AttachmentView, CALL_CARD_HEADING, COMPOSER_PLACEHOLDER, Composer, LobbyView,
    READY_TO_SEND, ROSTER_HEADING, TimelineEntry,
};

/// ANSI clear-screen plus cursor-home prefix for a full redraw.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Render the panel as lines, top to bottom, ending with the composer prompt.
#[must_use]
pub fn render_lines(view: &LobbyView, composer: &Composer) -> Vec<String> {
    let mut lines = vec![
        format!("{} | {}", view.header.title, view.header.status),
        format!("{} [{}]", view.header.player, view.header.badge.label()),
        String::new(),
        format!("{ROSTER_HEADING} ({})", view.roster.len()),
    ];

    for entry in &view.roster {
        lines.push(match &entry.badge {
            Some(badge) => format!("  {}  {}", entry.name, badge.short_label()),
            None => format!("  {}", entry.name),
        });
    }
    lines.push(String::new());

    if let Some(placeholder) = view.placeholder {
        lines.push(placeholder.to_owned());
    }
    for entry in &view.timeline {
        push_entry(&mut lines, entry);
    }
    lines.push(String::new());

    if let Some(name) = composer.ready_card() {
        lines.push(format!("{READY_TO_SEND}: {name}"));
    }
    lines.push(format!("{COMPOSER_PLACEHOLDER} > "));
    lines
}

/// Full redraw text: clear, then every line. A notice sits just above the prompt.
#[must_use]
pub fn render(view: &LobbyView, composer: &Composer, notice: Option<&str>) -> String {
    let mut lines = render_lines(view, composer);
    if let Some(notice) = notice {
        lines.insert(lines.len() - 1, notice.to_owned());
    }
    format!("{CLEAR_SCREEN}{}", lines.join("\n"))
}

fn push_entry(lines: &mut Vec<String>, entry: &TimelineEntry) {
    match entry {
        TimelineEntry::System { line, call, .. } => {
            lines.push(line.clone());
            if let Some(call) = call {
                lines.push(format!("  [{CALL_CARD_HEADING}] {} <{}>", call.label, call.url));
            }
        }
        TimelineEntry::Chat { author, text, attachment, pending, .. } => {
            let marker = if *pending { " ..." } else { "" };
            lines.push(format!("{author}: {text}{marker}"));
            match attachment {
                Some(AttachmentView::Image { name, url }) => lines.push(format!("  [image] {name} <{url}>")),
                Some(AttachmentView::File { name }) => lines.push(format!("  [{ATTACHMENT_HEADING}] {name}")),
                None => {}
            }
        }
    }
}
