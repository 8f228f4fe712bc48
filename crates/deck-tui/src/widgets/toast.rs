//! Toasts: short launch and save notices stacked above the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

const MAX_VISIBLE: usize = 3;
const MAX_KEPT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Failures stay up longer than confirmations.
    fn lifetime(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_millis(2500),
            Self::Warning => Duration::from_secs(4),
            Self::Error => Duration::from_secs(6),
        }
    }

    fn look(self) -> (Color, &'static str) {
        match self {
            Self::Info => (C_TOAST_INFO, "·"),
            Self::Success => (C_TOAST_SUCCESS, "✓"),
            Self::Warning => (C_TOAST_WARNING, "!"),
            Self::Error => (C_TOAST_ERROR, "✗"),
        }
    }
}

struct Toast {
    text: String,
    severity: Severity,
    until: Instant,
}

#[derive(Default)]
pub struct ToastManager {
    queue: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice.  Re-posting the same text refreshes it instead of
    /// stacking a copy.
    pub fn push_at(&mut self, text: impl Into<String>, severity: Severity, now: Instant) {
        let text = text.into();
        self.queue.retain(|t| t.text != text);
        self.queue.push_back(Toast {
            until: now + severity.lifetime(),
            text,
            severity,
        });
        if self.queue.len() > MAX_KEPT {
            self.queue.pop_front();
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_at(text, Severity::Info, Instant::now());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push_at(text, Severity::Success, Instant::now());
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push_at(text, Severity::Warning, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_at(text, Severity::Error, Instant::now());
    }

    /// Expire old notices.  `true` when the stack changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.until > now);
        self.queue.len() != before
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.queue.iter().map(|t| (t.text.as_str(), t.severity))
    }

    /// Newest notice at the bottom of `area`, older ones stacked upwards.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let max_width = (area.width * 2 / 3).max(20).min(area.width) as usize;
        let mut bottom = area.y + area.height;

        for toast in self.queue.iter().rev().take(MAX_VISIBLE) {
            if bottom <= area.y {
                break;
            }
            bottom -= 1;
            let (color, icon) = toast.severity.look();
            let body = clip(&toast.text, max_width.saturating_sub(4));
            let width = (body.width() + 4).min(area.width as usize) as u16;
            let rect = Rect {
                x: area.x + area.width.saturating_sub(width + 1),
                y: bottom,
                width,
                height: 1,
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {} {} ", icon, body),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))),
                rect,
            );
        }
    }
}

/// Launch errors can be long; keep a toast to one line.
fn clip(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repost_replaces_instead_of_stacking() {
        let mut t = ToastManager::new();
        t.info("saved channel-0");
        t.error("saved channel-0");
        let all: Vec<_> = t.messages().collect();
        assert_eq!(all, vec![("saved channel-0", Severity::Error)]);
    }

    #[test]
    fn test_errors_outlive_confirmations() {
        let now = Instant::now();
        let mut t = ToastManager::new();
        t.push_at("launched channel-1", Severity::Success, now);
        t.push_at("channel-2 failed", Severity::Error, now);
        assert!(t.tick(now + Duration::from_secs(3)));
        assert_eq!(t.messages().count(), 1);
        assert!(!t.tick(now + Duration::from_secs(5)));
        assert!(t.tick(now + Duration::from_secs(7)));
        assert_eq!(t.messages().count(), 0);
    }

    #[test]
    fn test_queue_is_bounded() {
        let now = Instant::now();
        let mut t = ToastManager::new();
        for i in 0..20 {
            t.push_at(format!("cleared channel-{}", i), Severity::Info, now);
        }
        assert_eq!(t.messages().count(), MAX_KEPT);
        assert_eq!(t.messages().last().map(|m| m.0), Some("cleared channel-19"));
    }

    #[test]
    fn test_clip_long_error() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("failed to start C:\\x.exe", 8), "failed …");
    }
}
