//! Ambient grid behaviours: random idle animations and auto-fade.
//!
//! Both are driven from the App's 100ms tick and take `now` explicitly so
//! they can be tested without sleeping.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleKind {
    Pulse,
    Bounce,
    Glow,
}

impl IdleKind {
    pub const ALL: [IdleKind; 3] = [IdleKind::Pulse, IdleKind::Bounce, IdleKind::Glow];

    pub fn duration(self) -> Duration {
        match self {
            Self::Pulse => Duration::from_millis(2000),
            Self::Bounce => Duration::from_millis(1500),
            Self::Glow => Duration::from_millis(3000),
        }
    }
}

/// An animation running on one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdlePulse {
    /// Absolute channel index.
    pub index: usize,
    pub kind: IdleKind,
    pub started: Instant,
}

impl IdlePulse {
    /// 0.0 → 1.0 over the animation's lifetime.
    pub fn progress(&self, now: Instant) -> f32 {
        let total = self.kind.duration().as_secs_f32();
        (now.saturating_duration_since(self.started).as_secs_f32() / total).min(1.0)
    }

    /// Triangle wave peaking mid-animation, for brightness/offset effects.
    pub fn intensity(&self, now: Instant) -> f32 {
        let p = self.progress(now);
        1.0 - (2.0 * p - 1.0).abs()
    }

    fn expired(&self, now: Instant) -> bool {
        now >= self.started + self.kind.duration()
    }
}

pub struct IdleAnimator {
    enabled: bool,
    interval: Duration,
    next_at: Instant,
    current: Option<IdlePulse>,
}

impl IdleAnimator {
    pub fn new(enabled: bool, interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_secs(1));
        Self {
            enabled,
            interval,
            next_at: now + interval,
            current: None,
        }
    }

    pub fn current(&self) -> Option<IdlePulse> {
        self.current
    }

    /// Expire the running animation and, when the interval has elapsed,
    /// start a new one on a random channel from `candidates`.
    /// Returns `true` when the visible state changed.
    pub fn tick<R: Rng>(&mut self, now: Instant, candidates: &[usize], rng: &mut R) -> bool {
        if !self.enabled {
            return self.current.take().is_some();
        }
        let mut changed = false;
        if self.current.is_some_and(|p| p.expired(now)) {
            self.current = None;
            changed = true;
        }
        if now < self.next_at {
            return changed || self.current.is_some();
        }
        self.next_at = now + self.interval;
        let (Some(&index), Some(&kind)) = (candidates.choose(rng), IdleKind::ALL.choose(rng))
        else {
            return changed;
        };
        if self.current.is_some_and(|p| p.index == index && p.kind == kind) {
            return changed;
        }
        tracing::trace!("idle {:?} on channel-{}", kind, index);
        self.current = Some(IdlePulse {
            index,
            kind,
            started: now,
        });
        true
    }

    /// User activity pushes the next animation back a full interval.
    pub fn reset(&mut self, now: Instant) {
        self.next_at = now + self.interval;
    }
}

/// Dims the grid after a period without input.  A zero timeout disables it.
pub struct AutoFade {
    timeout: Duration,
    last_activity: Instant,
    faded: bool,
}

impl AutoFade {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            timeout,
            last_activity: now,
            faded: false,
        }
    }

    pub fn is_faded(&self) -> bool {
        self.faded
    }

    /// Returns `true` if the fade state flipped.
    pub fn activity(&mut self, now: Instant) -> bool {
        self.last_activity = now;
        std::mem::replace(&mut self.faded, false)
    }

    /// Returns `true` if the fade state flipped.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timeout.is_zero() || self.faded {
            return false;
        }
        if now.saturating_duration_since(self.last_activity) >= self.timeout {
            self.faded = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_idle_waits_for_interval() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(7);
        let mut idle = IdleAnimator::new(true, Duration::from_secs(8), t0);
        assert!(!idle.tick(t0 + Duration::from_secs(7), &[0, 1], &mut rng));
        assert!(idle.current().is_none());
        assert!(idle.tick(t0 + Duration::from_secs(8), &[0, 1], &mut rng));
        let pulse = idle.current().unwrap();
        assert!(pulse.index <= 1);
    }

    #[test]
    fn test_idle_animation_expires() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut idle = IdleAnimator::new(true, Duration::from_secs(8), t0);
        let start = t0 + Duration::from_secs(8);
        idle.tick(start, &[3], &mut rng);
        assert!(idle.current().is_some());
        assert!(idle.tick(start + Duration::from_secs(4), &[3], &mut rng));
        assert!(idle.current().is_none());
    }

    #[test]
    fn test_zero_interval_waits_the_minimum() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(3);
        let mut idle = IdleAnimator::new(true, Duration::ZERO, t0);
        assert!(!idle.tick(t0 + Duration::from_millis(100), &[0], &mut rng));
        assert!(idle.current().is_none());
        assert!(idle.tick(t0 + Duration::from_secs(1), &[0], &mut rng));
    }

    #[test]
    fn test_idle_needs_candidates() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut idle = IdleAnimator::new(true, Duration::from_secs(1), t0);
        assert!(!idle.tick(t0 + Duration::from_secs(2), &[], &mut rng));
        assert!(idle.current().is_none());
    }

    #[test]
    fn test_disabled_idle_never_animates() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut idle = IdleAnimator::new(false, Duration::from_secs(1), t0);
        assert!(!idle.tick(t0 + Duration::from_secs(60), &[0], &mut rng));
    }

    #[test]
    fn test_pulse_intensity_peaks_midway() {
        let t0 = Instant::now();
        let pulse = IdlePulse {
            index: 0,
            kind: IdleKind::Pulse,
            started: t0,
        };
        assert_eq!(pulse.intensity(t0), 0.0);
        assert!((pulse.intensity(t0 + Duration::from_millis(1000)) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_fade_after_timeout() {
        let t0 = Instant::now();
        let mut fade = AutoFade::new(Duration::from_secs(5), t0);
        assert!(!fade.tick(t0 + Duration::from_secs(4)));
        assert!(fade.tick(t0 + Duration::from_secs(5)));
        assert!(fade.is_faded());
        assert!(fade.activity(t0 + Duration::from_secs(6)));
        assert!(!fade.is_faded());
    }

    #[test]
    fn test_zero_timeout_disables_fade() {
        let t0 = Instant::now();
        let mut fade = AutoFade::new(Duration::ZERO, t0);
        assert!(!fade.tick(t0 + Duration::from_secs(3600)));
    }
}
