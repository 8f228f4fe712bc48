//! Paged grid navigation with a single-flight transition lock.
//!
//! # States
//! ```text
//!  Idle                                  : page changes accepted
//!  Transitioning { direction, until }    : page already switched, chrome animating;
//!                                          further page requests are dropped
//! ```
//!
//! The return to `Idle` is a deadline polled by `tick()` from the UI tick,
//! so a transition always completes without a timer task.

use std::ops::Range;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Grid shape.  Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    columns: usize,
    rows: usize,
}

impl GridGeometry {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn channels_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// `ceil(total / per_page)`, never less than 1.
    pub fn total_pages(&self, total_channels: usize) -> usize {
        total_channels.div_ceil(self.channels_per_page()).max(1)
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// No paging chrome at all.
    Simple,
    /// Paged, animated chrome.
    Wii,
}

/// Page chrome flavour; each has its own transition length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionTiming {
    Dots,
    Wii,
}

impl TransitionTiming {
    pub fn duration(self) -> Duration {
        match self {
            Self::Dots => Duration::from_millis(300),
            Self::Wii => Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning { direction: Direction, until: Instant },
}

/// Keys the controller understands.  Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    /// `'1'..='9'` as the numeric value.
    Digit(u8),
    Other,
}

/// Where the key came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Ctrl / Meta held.
    pub modifier: bool,
    /// Focus is inside a text field.
    pub in_text_input: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The key belongs to navigation and must not be handled further.
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub const IGNORED: Self = Self {
        prevent_default: false,
    };
    pub const CONSUMED: Self = Self {
        prevent_default: true,
    };
}

/// Pointer button codes (DOM numbering).
pub const POINTER_BACK: u16 = 3;
pub const POINTER_FORWARD: u16 = 4;

#[derive(Debug, Clone)]
pub struct NavigationController {
    geometry: GridGeometry,
    total_channels: usize,
    total_pages: usize,
    current_page: usize,
    mode: NavigationMode,
    timing: TransitionTiming,
    phase: Phase,
}

impl NavigationController {
    pub fn new(
        total_channels: usize,
        geometry: GridGeometry,
        mode: NavigationMode,
        timing: TransitionTiming,
    ) -> Self {
        Self {
            geometry,
            total_channels,
            total_pages: geometry.total_pages(total_channels),
            current_page: 0,
            mode,
            timing,
            phase: Phase::Idle,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_channels(&self) -> usize {
        self.total_channels
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// `None` while idle.
    pub fn direction(&self) -> Option<Direction> {
        match self.phase {
            Phase::Idle => None,
            Phase::Transitioning { direction, .. } => Some(direction),
        }
    }

    pub fn chrome_visible(&self) -> bool {
        self.mode == NavigationMode::Wii && self.total_pages > 1
    }

    pub fn set_mode(&mut self, mode: NavigationMode) {
        self.mode = mode;
    }

    pub fn set_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }

    /// Re-derive the page count for a new grid.  Slot ids are not remapped;
    /// the current page is clamped into the new range.
    pub fn set_geometry(&mut self, total_channels: usize, geometry: GridGeometry) {
        self.geometry = geometry;
        self.total_channels = total_channels;
        self.total_pages = geometry.total_pages(total_channels);
        self.current_page = self.current_page.min(self.last_page());
        tracing::debug!(
            "grid geometry now {}x{} ({} channels, {} pages)",
            geometry.columns(),
            geometry.rows(),
            total_channels,
            self.total_pages
        );
    }

    fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    /// Slot indices shown on `page`.  The last page may be short.
    pub fn channel_index_range(&self, page: usize) -> Range<usize> {
        let per_page = self.geometry.channels_per_page();
        let start = page.saturating_mul(per_page).min(self.total_channels);
        let end = (start + per_page).min(self.total_channels);
        start..end
    }

    pub fn page_for_channel_index(&self, index: usize) -> usize {
        (index / self.geometry.channels_per_page()).min(self.last_page())
    }

    /// Switch pages.  Returns `true` if a transition started.
    pub fn go_to_page(&mut self, target: usize) -> bool {
        self.go_to_page_at(target, Instant::now())
    }

    pub fn go_to_page_at(&mut self, target: usize, now: Instant) -> bool {
        self.tick(now);
        let target = target.min(self.last_page());
        if target == self.current_page || self.is_animating() {
            return false;
        }
        let direction = if target > self.current_page {
            Direction::Right
        } else {
            Direction::Left
        };
        tracing::debug!("page {} -> {} ({:?})", self.current_page, target, direction);
        self.current_page = target;
        self.phase = Phase::Transitioning {
            direction,
            until: now + self.timing.duration(),
        };
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.next_page_at(Instant::now())
    }

    pub fn next_page_at(&mut self, now: Instant) -> bool {
        self.go_to_page_at(self.current_page + 1, now)
    }

    pub fn prev_page(&mut self) -> bool {
        self.prev_page_at(Instant::now())
    }

    pub fn prev_page_at(&mut self, now: Instant) -> bool {
        match self.current_page.checked_sub(1) {
            Some(target) => self.go_to_page_at(target, now),
            None => false,
        }
    }

    /// Release the transition lock once its deadline has passed.
    /// Returns `true` if the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Phase::Transitioning { until, .. } = self.phase {
            if now >= until {
                self.phase = Phase::Idle;
                return true;
            }
        }
        false
    }

    /// Release the lock now (animation-end callback).
    pub fn finish_animation(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn handle_key(&mut self, key: NavKey, ctx: KeyContext) -> KeyOutcome {
        self.handle_key_at(key, ctx, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: NavKey, ctx: KeyContext, now: Instant) -> KeyOutcome {
        if ctx.modifier || ctx.in_text_input {
            return KeyOutcome::IGNORED;
        }
        match key {
            NavKey::ArrowLeft => {
                self.prev_page_at(now);
                KeyOutcome::CONSUMED
            }
            NavKey::ArrowRight => {
                self.next_page_at(now);
                KeyOutcome::CONSUMED
            }
            NavKey::Home => {
                self.go_to_page_at(0, now);
                KeyOutcome::CONSUMED
            }
            NavKey::End => {
                self.go_to_page_at(self.last_page(), now);
                KeyOutcome::CONSUMED
            }
            NavKey::Digit(d @ 1..=9) => {
                let page = usize::from(d) - 1;
                if page < self.total_pages {
                    self.go_to_page_at(page, now);
                    KeyOutcome::CONSUMED
                } else {
                    KeyOutcome::IGNORED
                }
            }
            NavKey::Digit(_) | NavKey::Other => KeyOutcome::IGNORED,
        }
    }

    pub fn handle_pointer_button(&mut self, code: u16) -> KeyOutcome {
        self.handle_pointer_button_at(code, Instant::now())
    }

    pub fn handle_pointer_button_at(&mut self, code: u16, now: Instant) -> KeyOutcome {
        match code {
            POINTER_BACK => {
                self.prev_page_at(now);
                KeyOutcome::CONSUMED
            }
            POINTER_FORWARD => {
                self.next_page_at(now);
                KeyOutcome::CONSUMED
            }
            _ => KeyOutcome::IGNORED,
        }
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(
            36,
            GridGeometry::default(),
            NavigationMode::Wii,
            TransitionTiming::Wii,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(total: usize, cols: usize, rows: usize) -> NavigationController {
        NavigationController::new(
            total,
            GridGeometry::new(cols, rows),
            NavigationMode::Wii,
            TransitionTiming::Dots,
        )
    }

    fn after(now: Instant, ms: u64) -> Instant {
        now + Duration::from_millis(ms)
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for total in 1..50 {
            for cols in 1..6 {
                for rows in 1..5 {
                    let n = nav(total, cols, rows);
                    let per = cols * rows;
                    assert_eq!(n.total_pages(), (total + per - 1) / per);
                }
            }
        }
        assert_eq!(nav(0, 4, 3).total_pages(), 1);
        assert_eq!(nav(36, 4, 3).total_pages(), 3);
    }

    #[test]
    fn test_go_to_current_page_is_noop() {
        let mut n = nav(36, 4, 3);
        assert!(!n.go_to_page_at(0, Instant::now()));
        assert!(!n.is_animating());
        assert_eq!(n.direction(), None);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let mut n = nav(36, 4, 3);
        let now = Instant::now();
        assert!(n.go_to_page_at(99, now));
        assert_eq!(n.current_page(), 2);
        assert_eq!(n.direction(), Some(Direction::Right));
    }

    #[test]
    fn test_request_during_transition_is_dropped() {
        let mut n = nav(36, 4, 3);
        let now = Instant::now();
        assert!(n.go_to_page_at(1, now));
        assert!(!n.go_to_page_at(2, after(now, 100)));
        assert_eq!(n.current_page(), 1);

        // Dots timing is 300ms.
        assert!(n.go_to_page_at(0, after(now, 300)));
        assert_eq!(n.current_page(), 0);
        assert_eq!(n.direction(), Some(Direction::Left));
    }

    #[test]
    fn test_tick_releases_lock_at_deadline() {
        let mut n = nav(36, 4, 3);
        n.set_timing(TransitionTiming::Wii);
        let now = Instant::now();
        n.go_to_page_at(1, now);
        assert!(!n.tick(after(now, 499)));
        assert!(n.is_animating());
        assert!(n.tick(after(now, 500)));
        assert!(!n.is_animating());
    }

    #[test]
    fn test_next_page_walks_to_last_and_stops() {
        let mut n = nav(36, 4, 3);
        let mut now = Instant::now();
        for _ in 0..n.total_pages() {
            n.next_page_at(now);
            now = after(now, 300);
        }
        assert_eq!(n.current_page(), n.total_pages() - 1);
        assert!(!n.next_page_at(after(now, 1000)));
        assert_eq!(n.current_page(), 2);
    }

    #[test]
    fn test_prev_page_at_zero_does_not_wrap() {
        let mut n = nav(36, 4, 3);
        assert!(!n.prev_page_at(Instant::now()));
        assert_eq!(n.current_page(), 0);
    }

    #[test]
    fn test_current_page_stays_in_range_for_any_sequence() {
        let mut n = nav(25, 3, 2);
        let mut now = Instant::now();
        for target in [7, 0, 3, 100, 2, 5, 1, 4, 4, 0] {
            n.go_to_page_at(target, now);
            assert!(n.current_page() < n.total_pages());
            now = after(now, 50);
        }
    }

    #[test]
    fn test_keys_ignored_with_modifier_or_text_focus() {
        let mut n = nav(36, 4, 3);
        let now = Instant::now();
        let ctrl = KeyContext {
            modifier: true,
            ..Default::default()
        };
        assert_eq!(n.handle_key_at(NavKey::ArrowRight, ctrl, now), KeyOutcome::IGNORED);
        let typing = KeyContext {
            in_text_input: true,
            ..Default::default()
        };
        assert_eq!(n.handle_key_at(NavKey::End, typing, now), KeyOutcome::IGNORED);
        assert_eq!(n.current_page(), 0);
    }

    #[test]
    fn test_key_bindings() {
        let mut n = nav(36, 4, 3);
        let ctx = KeyContext::default();
        let mut now = Instant::now();

        assert!(n.handle_key_at(NavKey::End, ctx, now).prevent_default);
        assert_eq!(n.current_page(), 2);
        now = after(now, 300);

        assert!(n.handle_key_at(NavKey::Digit(2), ctx, now).prevent_default);
        assert_eq!(n.current_page(), 1);
        now = after(now, 300);

        assert_eq!(n.handle_key_at(NavKey::Digit(9), ctx, now), KeyOutcome::IGNORED);
        assert_eq!(n.current_page(), 1);

        assert!(n.handle_key_at(NavKey::Home, ctx, now).prevent_default);
        assert_eq!(n.current_page(), 0);
        now = after(now, 300);

        // Edge arrows still consume the key.
        assert!(n.handle_key_at(NavKey::ArrowLeft, ctx, now).prevent_default);
        assert_eq!(n.handle_key_at(NavKey::Other, ctx, now), KeyOutcome::IGNORED);
    }

    #[test]
    fn test_pointer_side_buttons() {
        let mut n = nav(36, 4, 3);
        let now = Instant::now();
        assert!(n.handle_pointer_button_at(POINTER_FORWARD, now).prevent_default);
        assert_eq!(n.current_page(), 1);
        n.finish_animation();
        assert!(n.handle_pointer_button_at(POINTER_BACK, now).prevent_default);
        assert_eq!(n.current_page(), 0);
        assert_eq!(n.handle_pointer_button_at(0, now), KeyOutcome::IGNORED);
    }

    #[test]
    fn test_chrome_visibility() {
        let mut n = nav(36, 4, 3);
        assert!(n.chrome_visible());
        n.set_mode(NavigationMode::Simple);
        assert!(!n.chrome_visible());
        n.set_mode(NavigationMode::Wii);
        n.set_geometry(12, GridGeometry::new(4, 3));
        assert!(!n.chrome_visible());
    }

    #[test]
    fn test_set_geometry_clamps_without_remap() {
        let mut n = nav(36, 4, 3);
        n.go_to_page_at(2, Instant::now());
        n.finish_animation();
        n.set_geometry(36, GridGeometry::new(6, 3));
        assert_eq!(n.total_pages(), 2);
        assert_eq!(n.current_page(), 1);
    }

    #[test]
    fn test_index_ranges() {
        let n = nav(30, 4, 3);
        assert_eq!(n.channel_index_range(0), 0..12);
        assert_eq!(n.channel_index_range(2), 24..30);
        assert_eq!(n.channel_index_range(5), 30..30);
        assert_eq!(n.page_for_channel_index(13), 1);
        assert_eq!(n.page_for_channel_index(500), 2);
    }

    #[test]
    fn test_huge_page_index_yields_empty_range() {
        let n = nav(30, 4, 3);
        assert_eq!(n.channel_index_range(usize::MAX), 30..30);
        assert_eq!(n.channel_index_range(usize::MAX / 12 + 1), 30..30);
    }
}
