//! Staggered section reveals
//!
//! The host reports section visibility changes; this turns them into timed
//! cues (show item N, reset section) released by `due`. Timing is driven by
//! frame timestamps, never by host timers.

use std::collections::{HashMap, HashSet};

use crate::transform::ElementRect;
use crate::viewport::ViewportDimensions;

/// Delay between items of a section
pub const ITEM_STAGGER_MS: f64 = 100.0;
/// A section that just closed ignores re-opening for this long
pub const CLOSE_GUARD_MS: f64 = 500.0;
/// Delay between characters of a text reveal
pub const CHAR_STAGGER_MS: f64 = 50.0;
/// Share of a section's height that must be on screen to count as visible
pub const VISIBLE_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealCue {
    /// Animate item `item` of `section` in
    Show { section: String, item: usize },
    /// Return every item of `section` to its hidden state
    Reset { section: String },
}

impl RevealCue {
    pub fn section(&self) -> &str {
        match self {
            RevealCue::Show { section, .. } | RevealCue::Reset { section } => section,
        }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    due_ms: f64,
    cue: RevealCue,
}

#[derive(Debug, Default)]
pub struct RevealScheduler {
    pending: Vec<Pending>,
    visible: HashSet<String>,
    /// Section -> end of its closing guard
    closing: HashMap<String, f64>,
}

/// Start offsets for `count` staggered items
pub fn stagger_delays(count: usize, step_ms: f64) -> Vec<f64> {
    (0..count).map(|i| i as f64 * step_ms).collect()
}

/// Per-character start offsets for a typed-out text reveal
pub fn text_delays(text: &str) -> Vec<f64> {
    stagger_delays(text.chars().count(), CHAR_STAGGER_MS)
}

/// Whether a section laid out at `rect` counts as visible. Collapsed
/// (zero-height) sections never do.
pub fn section_visible(rect: ElementRect, viewport: ViewportDimensions) -> bool {
    if rect.height <= 0.0 || rect.width <= 0.0 || !viewport.is_renderable() {
        return false;
    }
    let top = rect.top.max(0.0);
    let bottom = (rect.top + rect.height).min(viewport.height);
    (bottom - top) / rect.height >= VISIBLE_THRESHOLD
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, section: &str) -> bool {
        self.visible.contains(section)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn on_visibility(&mut self, section: &str, visible: bool, items: usize, now_ms: f64) {
        if visible {
            if self.closing.get(section).is_some_and(|&until| now_ms < until) {
                log::debug!("Section {} reopened inside close guard, ignored", section);
                return;
            }
            if !self.visible.insert(section.to_string()) {
                return;
            }
            self.closing.remove(section);
            for (item, delay) in stagger_delays(items, ITEM_STAGGER_MS).into_iter().enumerate() {
                self.pending.push(Pending {
                    due_ms: now_ms + delay,
                    cue: RevealCue::Show {
                        section: section.to_string(),
                        item,
                    },
                });
            }
        } else {
            if !self.visible.remove(section) {
                return;
            }
            self.pending.retain(|p| p.cue.section() != section);
            self.pending.push(Pending {
                due_ms: now_ms,
                cue: RevealCue::Reset {
                    section: section.to_string(),
                },
            });
            self.closing.insert(section.to_string(), now_ms + CLOSE_GUARD_MS);
        }
    }

    /// Cues whose time has come, earliest first
    pub fn due(&mut self, now_ms: f64) -> Vec<RevealCue> {
        let (mut ready, waiting): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = waiting;
        ready.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        ready.into_iter().map(|p| p.cue).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(section: &str, item: usize) -> RevealCue {
        RevealCue::Show {
            section: section.to_string(),
            item,
        }
    }

    #[test]
    fn test_items_staggered() {
        let mut reveal = RevealScheduler::new();
        reveal.on_visibility("about", true, 3, 1000.0);
        assert_eq!(reveal.due(1000.0), vec![show("about", 0)]);
        assert!(reveal.due(1099.0).is_empty());
        assert_eq!(reveal.due(1250.0), vec![show("about", 1), show("about", 2)]);
        assert_eq!(reveal.pending(), 0);
    }

    #[test]
    fn test_hide_cancels_and_guards() {
        let mut reveal = RevealScheduler::new();
        reveal.on_visibility("work", true, 5, 0.0);
        reveal.due(0.0);
        reveal.on_visibility("work", false, 0, 150.0);
        assert_eq!(
            reveal.due(150.0),
            vec![RevealCue::Reset {
                section: "work".to_string()
            }]
        );

        // Inside the guard: ignored
        reveal.on_visibility("work", true, 5, 400.0);
        assert!(!reveal.is_visible("work"));
        assert_eq!(reveal.pending(), 0);

        // After the guard: reveals again
        reveal.on_visibility("work", true, 2, 700.0);
        assert_eq!(reveal.due(800.0).len(), 2);
    }

    #[test]
    fn test_repeated_visible_is_idempotent() {
        let mut reveal = RevealScheduler::new();
        reveal.on_visibility("intro", true, 2, 0.0);
        reveal.on_visibility("intro", true, 2, 10.0);
        assert_eq!(reveal.pending(), 2);
        reveal.on_visibility("other", false, 0, 10.0);
        assert_eq!(reveal.pending(), 2);
    }

    #[test]
    fn test_text_delays() {
        assert_eq!(text_delays("héllo"), vec![0.0, 50.0, 100.0, 150.0, 200.0]);
        assert!(text_delays("").is_empty());
    }

    #[test]
    fn test_section_visibility_threshold() {
        let vp = ViewportDimensions::new(800.0, 600.0);
        let rect = |top, height| ElementRect {
            left: 0.0,
            top,
            width: 800.0,
            height,
        };
        assert!(section_visible(rect(100.0, 400.0), vp));
        // 50 of 1000 px on screen
        assert!(!section_visible(rect(550.0, 1000.0), vp));
        assert!(section_visible(rect(500.0, 1000.0), vp));
        assert!(!section_visible(rect(-400.0, 300.0), vp));
        assert!(!section_visible(rect(100.0, 0.0), vp));
    }
}
