//! Index/transition state machine for the looping carousel.
//!
//! Time is passed in explicitly so the machine stays deterministic: the host
//! calls [`Carousel::on_tick`] once [`Carousel::next_deadline`] has passed and
//! forwards navigation requests as they arrive. Every timer is an owned
//! [`TimerSlot`]; dropping the carousel drops every pending deadline with it.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::padding::Slot;
use super::pages::Layout;
use super::timer::{MAX_DELAY, TimerSlot};
use crate::events::{
    CarouselCommand, CarouselEvent, CarouselSnapshot, Direction, IgnoreReason, NavOutcome,
    NavRequest, Trigger,
};

/// Auto-advance stays suspended this long after a manual navigation.
pub const INTERACTION_COOLDOWN: Duration = Duration::from_secs(4);

/// Runtime knobs of a carousel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselOptions {
    /// Animated transition length; also the delay before a silent reanchor.
    pub speed: Duration,
    pub auto: bool,
    pub interval: Duration,
    pub slides_to_show: usize,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            speed: Duration::from_millis(300),
            auto: false,
            interval: Duration::from_millis(3000),
            slides_to_show: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A transition window is open; buttons are ignored.
    Animating,
    /// Settled after a silent jump; the next render must not animate.
    Reanchoring,
}

#[derive(Debug)]
pub struct Carousel {
    layout: Layout,
    speed: Duration,
    auto: bool,
    interval: Duration,
    position: usize,
    animating: bool,
    silent_jump: bool,
    cooldown: bool,
    transition: TimerSlot,
    reanchor: TimerSlot,
    cooldown_timer: TimerSlot,
    autoplay: TimerSlot,
    outbox: Vec<CarouselEvent>,
}

impl Carousel {
    pub fn new(slide_count: usize, options: CarouselOptions, now: Instant) -> Self {
        let mut carousel = Self {
            layout: Layout::new(slide_count, options.slides_to_show),
            speed: capped("speed", options.speed),
            auto: options.auto,
            interval: capped("interval", options.interval),
            position: 1,
            animating: false,
            silent_jump: false,
            cooldown: false,
            transition: TimerSlot::new(),
            reanchor: TimerSlot::new(),
            cooldown_timer: TimerSlot::new(),
            autoplay: TimerSlot::new(),
            outbox: Vec::new(),
        };
        carousel.arm_autoplay(now);
        carousel
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn total_pages(&self) -> usize {
        self.layout.total_pages()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_silent_jump(&self) -> bool {
        self.silent_jump
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown
    }

    pub fn is_busy(&self) -> bool {
        self.animating
    }

    pub fn auto_enabled(&self) -> bool {
        self.auto
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn phase(&self) -> Phase {
        if self.animating {
            Phase::Animating
        } else if self.silent_jump {
            Phase::Reanchoring
        } else {
            Phase::Idle
        }
    }

    pub fn slot(&self) -> Option<Slot> {
        Slot::at(self.position, self.total_pages())
    }

    pub fn current_real_index(&self) -> Option<usize> {
        match self.slot()? {
            Slot::Real(index) => Some(index),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            position: self.position,
            total_pages: self.total_pages(),
            slides_to_show: self.layout.slides_to_show(),
            animating: self.animating,
            silent_jump: self.silent_jump,
            cooldown: self.cooldown,
            auto: self.auto,
            speed: self.speed,
        }
    }

    /// Earliest pending deadline across all timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            &self.transition,
            &self.reanchor,
            &self.cooldown_timer,
            &self.autoplay,
        ]
        .into_iter()
        .filter_map(TimerSlot::deadline)
        .min()
    }

    /// Events recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, CarouselEvent> {
        self.outbox.drain(..)
    }

    pub fn navigate(&mut self, request: NavRequest, now: Instant) -> NavOutcome {
        match request {
            NavRequest::Previous => self.previous(now),
            NavRequest::Next => self.next(now),
            NavRequest::Goto(index) => self.goto_real_index(index, now),
        }
    }

    pub fn apply(&mut self, command: CarouselCommand, now: Instant) {
        match command {
            CarouselCommand::SetAuto(enabled) => self.set_auto(enabled, now),
            CarouselCommand::SetInterval(interval) => self.set_interval(interval, now),
            CarouselCommand::SetSpeed(speed) => self.set_speed(speed, now),
        }
    }

    pub fn next(&mut self, now: Instant) -> NavOutcome {
        self.step(Direction::Forward, Trigger::Button, now)
    }

    pub fn previous(&mut self, now: Instant) -> NavOutcome {
        self.step(Direction::Backward, Trigger::Button, now)
    }

    /// Jump to a real page by zero-based index.
    ///
    /// Indicator jumps bypass the busy gate: they preempt any running
    /// transition and any pending reanchor.
    pub fn goto_real_index(&mut self, index: usize, now: Instant) -> NavOutcome {
        let trigger = Trigger::Indicator;
        if self.layout.is_inert() {
            return self.ignore(trigger, IgnoreReason::Inert);
        }
        if index >= self.total_pages() {
            return self.ignore(trigger, IgnoreReason::OutOfRange);
        }
        self.note_interaction(now);
        self.silent_jump = false;
        let target = index + 1;
        if target == self.position {
            return self.ignore(trigger, IgnoreReason::Unchanged);
        }
        self.move_to(target, trigger, now)
    }

    fn step(&mut self, direction: Direction, trigger: Trigger, now: Instant) -> NavOutcome {
        if self.layout.is_inert() {
            return self.ignore(trigger, IgnoreReason::Inert);
        }
        if self.animating {
            return self.ignore(trigger, IgnoreReason::Busy);
        }
        if self.slot().is_none_or(|slot| slot.is_clone()) {
            return self.ignore(trigger, IgnoreReason::AtCloneSlot);
        }
        if trigger.is_manual() {
            self.note_interaction(now);
        }
        self.silent_jump = false;
        let target = match direction {
            Direction::Forward => self.position + 1,
            Direction::Backward => self.position - 1,
        };
        self.move_to(target, trigger, now)
    }

    fn move_to(&mut self, target: usize, trigger: Trigger, now: Instant) -> NavOutcome {
        let from = self.position;
        self.position = target;
        self.animating = true;
        let generation = self.transition.arm(now, self.speed);
        debug!(from, to = target, ?trigger, generation, "transition window opened");

        match self.slot() {
            Some(slot) if slot.is_clone() => {
                let generation = self.reanchor.arm(now, self.speed);
                debug!(position = target, ?slot, generation, "reanchor scheduled");
            }
            _ => {
                if self.reanchor.cancel() {
                    debug!(position = target, "pending reanchor preempted");
                }
            }
        }

        self.outbox.push(CarouselEvent::Moved {
            from,
            to: target,
            trigger,
        });
        NavOutcome::Moved { from, to: target }
    }

    fn ignore(&mut self, trigger: Trigger, reason: IgnoreReason) -> NavOutcome {
        debug!(?trigger, ?reason, position = self.position, "navigation ignored");
        self.outbox.push(CarouselEvent::Ignored { trigger, reason });
        NavOutcome::Ignored(reason)
    }

    /// Manual navigation suspends auto-advance for [`INTERACTION_COOLDOWN`].
    fn note_interaction(&mut self, now: Instant) {
        if !self.auto {
            return;
        }
        let started = !self.cooldown;
        self.cooldown = true;
        let generation = self.cooldown_timer.arm(now, INTERACTION_COOLDOWN);
        self.autoplay.cancel();
        debug!(generation, restarted = !started, "interaction cooldown armed");
        if started {
            self.outbox.push(CarouselEvent::CooldownStarted);
        }
    }

    /// (Re)start the auto-advance timer one interval from `now`, or stop it
    /// when auto-advance cannot run.
    fn arm_autoplay(&mut self, now: Instant) {
        if self.auto && !self.cooldown && !self.layout.is_inert() {
            let generation = self.autoplay.arm(now, self.interval);
            debug!(
                generation,
                interval = %humantime::format_duration(self.interval),
                "auto-advance armed"
            );
        } else if self.autoplay.cancel() {
            debug!("auto-advance stopped");
        }
    }

    /// Fire every timer whose deadline has passed. Returns true if any fired.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut fired = false;

        if let Some(generation) = self.transition.fire_if_due(now) {
            fired = true;
            self.animating = false;
            debug!(generation, position = self.position, "transition window closed");
            self.outbox.push(CarouselEvent::TransitionFinished {
                position: self.position,
            });
        }

        if let Some(generation) = self.reanchor.fire_if_due(now) {
            fired = true;
            self.reanchor_silently(generation);
        }

        if let Some(generation) = self.cooldown_timer.fire_if_due(now) {
            fired = true;
            self.cooldown = false;
            debug!(generation, "interaction cooldown elapsed");
            self.outbox.push(CarouselEvent::CooldownEnded);
            self.arm_autoplay(now);
        }

        let scheduled = self.autoplay.deadline();
        if let Some(generation) = self.autoplay.fire_if_due(now) {
            fired = true;
            // Schedule from the missed deadline so late wakeups do not drift,
            // unless we are so late that the next tick is already due.
            match scheduled
                .and_then(|at| at.checked_add(self.interval))
                .filter(|at| *at > now)
            {
                Some(next_at) => self.autoplay.arm_at(next_at),
                None => self.autoplay.arm(now, self.interval),
            };
            debug!(generation, "auto-advance tick");
            self.step(Direction::Forward, Trigger::Auto, now);
        }

        fired
    }

    fn reanchor_silently(&mut self, generation: u64) {
        let total = self.total_pages();
        let Some(slot) = self.slot().filter(Slot::is_clone) else {
            return;
        };
        let from = self.position;
        let to = slot.anchor(total);
        self.transition.cancel();
        self.animating = false;
        self.silent_jump = true;
        self.position = to;
        debug!(generation, from, to, "silent reanchor");
        self.outbox.push(CarouselEvent::Reanchored { from, to });
    }

    pub fn set_auto(&mut self, enabled: bool, now: Instant) {
        if self.auto == enabled {
            return;
        }
        self.auto = enabled;
        if !enabled && self.cooldown_timer.cancel() {
            self.cooldown = false;
            self.outbox.push(CarouselEvent::CooldownEnded);
        }
        info!(enabled, "auto-advance toggled");
        self.arm_autoplay(now);
    }

    /// Zero and oversized intervals are refused; the previous interval stays
    /// in effect.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        if interval.is_zero() {
            warn!("refusing zero auto-advance interval");
            return;
        }
        if interval > MAX_DELAY {
            warn!(
                interval = %humantime::format_duration(interval),
                "refusing auto-advance interval above one day"
            );
            return;
        }
        if interval == self.interval {
            return;
        }
        self.interval = interval;
        self.arm_autoplay(now);
    }

    /// Pending transition and reanchor timers restart against the new speed.
    pub fn set_speed(&mut self, speed: Duration, now: Instant) {
        if speed > MAX_DELAY {
            warn!(
                speed = %humantime::format_duration(speed),
                "refusing transition speed above one day"
            );
            return;
        }
        if speed == self.speed {
            return;
        }
        self.speed = speed;
        if self.transition.is_armed() {
            self.transition.arm(now, speed);
        }
        if self.reanchor.is_armed() {
            self.reanchor.arm(now, speed);
        }
    }

    /// Regroup after the slide count or page size changed.
    ///
    /// Pending transitions are dropped and the position is clamped into the
    /// new real range without animation. A clone slot resolves to the page
    /// it was standing in for.
    pub fn relayout(&mut self, slide_count: usize, slides_to_show: usize, now: Instant) {
        let layout = Layout::new(slide_count, slides_to_show);
        if layout == self.layout {
            return;
        }
        let old_slot = self.slot();
        self.layout = layout;
        self.transition.cancel();
        self.reanchor.cancel();
        self.animating = false;
        self.silent_jump = true;

        let total = layout.total_pages();
        let from = self.position;
        self.position = match old_slot {
            _ if layout.is_inert() => 1,
            Some(Slot::CloneOfLast) => total,
            Some(Slot::Real(index)) => (index + 1).min(total),
            Some(Slot::CloneOfFirst) | None => 1,
        };

        if layout.is_inert() {
            if self.cooldown_timer.cancel() {
                self.cooldown = false;
                self.outbox.push(CarouselEvent::CooldownEnded);
            }
            self.arm_autoplay(now);
        } else if !self.autoplay.is_armed() {
            self.arm_autoplay(now);
        }

        info!(
            slide_count,
            slides_to_show = layout.slides_to_show(),
            total_pages = total,
            from,
            to = self.position,
            "carousel relaid"
        );
        self.outbox.push(CarouselEvent::Relaid {
            total_pages: total,
            from,
            to: self.position,
        });
    }
}

fn capped(name: &'static str, value: Duration) -> Duration {
    if value > MAX_DELAY {
        warn!(
            setting = name,
            requested = %humantime::format_duration(value),
            "capping to one day"
        );
        MAX_DELAY
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn manual(slides: usize) -> (Carousel, Instant) {
        let t0 = Instant::now();
        (Carousel::new(slides, CarouselOptions::default(), t0), t0)
    }

    fn auto(slides: usize, interval: Duration) -> (Carousel, Instant) {
        let t0 = Instant::now();
        let options = CarouselOptions {
            auto: true,
            interval,
            ..CarouselOptions::default()
        };
        (Carousel::new(slides, options, t0), t0)
    }

    /// Advance `now`, firing every deadline on the way like a host loop would.
    fn run_until(carousel: &mut Carousel, until: Instant) {
        while let Some(at) = carousel.next_deadline() {
            if at > until {
                break;
            }
            carousel.on_tick(at);
        }
    }

    #[test]
    fn starts_on_first_real_page() {
        let (carousel, _) = manual(4);
        assert_eq!(carousel.position(), 1);
        assert_eq!(carousel.current_real_index(), Some(0));
        assert_eq!(carousel.phase(), Phase::Idle);
        assert!(carousel.next_deadline().is_none());
    }

    #[test]
    fn wraps_forward_through_clone_and_reanchors_silently() {
        let (mut c, t0) = manual(4);
        let mut now = t0;
        for expected in 2..=4 {
            assert!(c.next(now).moved());
            now += SPEED;
            c.on_tick(now);
            assert_eq!(c.position(), expected);
        }

        assert_eq!(c.next(now), NavOutcome::Moved { from: 4, to: 5 });
        assert_eq!(c.slot(), Some(Slot::CloneOfFirst));
        assert_eq!(c.current_real_index(), None);
        assert!(!c.on_tick(now + ms(299)));
        assert_eq!(c.position(), 5);

        c.drain_events();
        c.on_tick(now + SPEED);
        assert_eq!(c.position(), 1);
        assert!(c.is_silent_jump());
        assert!(!c.is_animating());
        assert_eq!(c.phase(), Phase::Reanchoring);
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(
            events,
            vec![
                CarouselEvent::TransitionFinished { position: 5 },
                CarouselEvent::Reanchored { from: 5, to: 1 },
            ]
        );
    }

    #[test]
    fn wraps_backward_onto_last_page() {
        let (mut c, t0) = manual(4);
        assert_eq!(c.previous(t0), NavOutcome::Moved { from: 1, to: 0 });
        assert_eq!(c.slot(), Some(Slot::CloneOfLast));
        c.on_tick(t0 + SPEED);
        assert_eq!(c.position(), 4);
        assert!(c.is_silent_jump());
        assert_eq!(c.current_real_index(), Some(3));
    }

    #[test]
    fn full_cycle_returns_to_first_page() {
        for pages in 1..6 {
            let (mut c, t0) = manual(pages);
            let mut now = t0;
            for _ in 0..pages {
                assert!(c.next(now).moved());
                now += SPEED;
                run_until(&mut c, now);
            }
            assert_eq!(c.position(), 1, "pages={pages}");
            assert!(!c.is_busy());
        }
    }

    #[test]
    fn buttons_do_not_queue_while_animating() {
        let (mut c, t0) = manual(4);
        c.next(t0);
        for i in 1..5 {
            assert_eq!(
                c.next(t0 + ms(i * 50)),
                NavOutcome::Ignored(IgnoreReason::Busy)
            );
            assert_eq!(
                c.previous(t0 + ms(i * 50)),
                NavOutcome::Ignored(IgnoreReason::Busy)
            );
        }
        assert_eq!(c.position(), 2);
        c.on_tick(t0 + SPEED);
        assert!(!c.is_busy());
        assert!(c.next(t0 + SPEED).moved());
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn step_clears_silent_jump() {
        let (mut c, t0) = manual(2);
        c.previous(t0);
        c.on_tick(t0 + SPEED);
        assert!(c.is_silent_jump());
        c.next(t0 + SPEED);
        assert!(!c.is_silent_jump());
        assert_eq!(c.phase(), Phase::Animating);
    }

    #[test]
    fn indicator_jump_wins_over_running_transition() {
        let (mut c, t0) = manual(4);
        c.next(t0);
        let outcome = c.goto_real_index(3, t0 + ms(100));
        assert_eq!(outcome, NavOutcome::Moved { from: 2, to: 4 });
        // The window restarts from the jump.
        c.on_tick(t0 + SPEED);
        assert!(c.is_busy());
        c.on_tick(t0 + ms(400));
        assert!(!c.is_busy());
        assert_eq!(c.current_real_index(), Some(3));
    }

    #[test]
    fn indicator_jump_preempts_pending_reanchor() {
        let (mut c, t0) = manual(4);
        c.previous(t0);
        assert_eq!(c.position(), 0);
        c.goto_real_index(1, t0 + ms(100));
        assert_eq!(c.position(), 2);
        run_until(&mut c, t0 + Duration::from_secs(5));
        assert_eq!(c.position(), 2);
        assert!(!c.is_silent_jump());
        assert!(
            !c.drain_events()
                .any(|e| matches!(e, CarouselEvent::Reanchored { .. }))
        );
    }

    #[test]
    fn indicator_rejects_out_of_range_and_current_page() {
        let (mut c, t0) = manual(3);
        assert_eq!(
            c.goto_real_index(3, t0),
            NavOutcome::Ignored(IgnoreReason::OutOfRange)
        );
        assert_eq!(
            c.goto_real_index(0, t0),
            NavOutcome::Ignored(IgnoreReason::Unchanged)
        );
        assert_eq!(c.position(), 1);
        assert!(!c.is_busy());
    }

    #[test]
    fn inert_carousel_ignores_everything() {
        let (mut c, t0) = auto(0, ms(1000));
        assert!(c.layout().is_inert());
        assert_eq!(c.next(t0), NavOutcome::Ignored(IgnoreReason::Inert));
        assert_eq!(c.previous(t0), NavOutcome::Ignored(IgnoreReason::Inert));
        assert_eq!(
            c.goto_real_index(0, t0),
            NavOutcome::Ignored(IgnoreReason::Inert)
        );
        assert!(c.next_deadline().is_none());
        assert_eq!(c.current_real_index(), None);
    }

    #[test]
    fn auto_advance_moves_one_page_per_interval() {
        let (mut c, t0) = auto(3, ms(1000));
        let mut moves = 0;
        for second in 1..=12u64 {
            run_until(&mut c, t0 + ms(second * 1000));
            moves += c
                .drain_events()
                .filter(|e| {
                    matches!(
                        e,
                        CarouselEvent::Moved {
                            trigger: Trigger::Auto,
                            ..
                        }
                    )
                })
                .count();
            assert_eq!(moves, second as usize);
        }
        // Twelve steps over three pages is four full laps; the last one
        // lands on the trailing clone until its reanchor fires.
        assert_eq!(c.position(), 4);
        run_until(&mut c, t0 + ms(12_300));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn late_host_wakeup_does_not_drift_or_double_fire() {
        let (mut c, t0) = auto(5, ms(1000));
        c.on_tick(t0 + ms(1040));
        assert_eq!(c.position(), 2);
        assert_eq!(c.next_deadline(), Some(t0 + ms(1340)));
        c.on_tick(t0 + ms(1340));
        assert_eq!(c.next_deadline(), Some(t0 + ms(2000)));

        // Far too late: one tick, not a burst.
        c.on_tick(t0 + ms(9000));
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn manual_navigation_pauses_auto_advance_for_cooldown() {
        let (mut c, t0) = auto(4, ms(1000));
        assert!(c.next(t0 + ms(500)).moved());
        assert!(c.in_cooldown());
        run_until(&mut c, t0 + ms(5400));
        assert_eq!(c.position(), 2);
        assert!(!c.in_cooldown());
        run_until(&mut c, t0 + ms(5500));
        assert_eq!(c.position(), 3);
        run_until(&mut c, t0 + ms(6500));
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn repeated_interaction_restarts_cooldown_window() {
        let (mut c, t0) = auto(4, ms(1000));
        c.next(t0);
        run_until(&mut c, t0 + ms(3000));
        c.next(t0 + ms(3000));
        run_until(&mut c, t0 + ms(6900));
        assert!(c.in_cooldown());
        assert_eq!(c.position(), 3);
        run_until(&mut c, t0 + ms(7000));
        assert!(!c.in_cooldown());
        let started = c
            .drain_events()
            .filter(|e| *e == CarouselEvent::CooldownStarted)
            .count();
        assert_eq!(started, 1);
    }

    #[test]
    fn indicator_jump_pauses_auto_advance_for_cooldown() {
        let (mut c, t0) = auto(4, ms(1000));
        assert_eq!(
            c.goto_real_index(2, t0 + ms(500)),
            NavOutcome::Moved { from: 1, to: 3 }
        );
        assert!(c.in_cooldown());
        run_until(&mut c, t0 + ms(4400));
        assert_eq!(c.position(), 3);
        assert!(c.in_cooldown());
        run_until(&mut c, t0 + ms(5400));
        assert!(!c.in_cooldown());
        assert_eq!(c.position(), 3);
        run_until(&mut c, t0 + ms(5500));
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn indicator_on_current_page_still_counts_as_interaction() {
        let (mut c, t0) = auto(4, ms(1000));
        assert_eq!(
            c.goto_real_index(0, t0 + ms(200)),
            NavOutcome::Ignored(IgnoreReason::Unchanged)
        );
        assert!(c.in_cooldown());
        assert_eq!(c.next_deadline(), Some(t0 + ms(4200)));
        run_until(&mut c, t0 + ms(5100));
        assert_eq!(c.position(), 1);
        run_until(&mut c, t0 + ms(5200));
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn oversized_durations_are_capped_or_refused() {
        let t0 = Instant::now();
        let options = CarouselOptions {
            auto: true,
            interval: Duration::MAX,
            speed: Duration::MAX,
            ..CarouselOptions::default()
        };
        let mut c = Carousel::new(3, options, t0);
        assert_eq!(c.interval(), MAX_DELAY);
        assert_eq!(c.speed(), MAX_DELAY);
        assert_eq!(c.next_deadline(), Some(t0 + MAX_DELAY));

        c.set_interval(ms(1000), t0);
        c.set_speed(SPEED, t0);
        c.set_interval(Duration::from_secs(15_778_800_000_000_000_000), t0);
        c.set_speed(Duration::MAX, t0);
        assert_eq!(c.interval(), ms(1000));
        assert_eq!(c.speed(), SPEED);
        run_until(&mut c, t0 + ms(1000));
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn no_cooldown_without_auto_advance() {
        let (mut c, t0) = manual(4);
        c.next(t0);
        assert!(!c.in_cooldown());
    }

    #[test]
    fn auto_tick_while_busy_is_skipped() {
        let (mut c, t0) = auto(4, ms(1000));
        c.set_speed(ms(1500), t0);
        run_until(&mut c, t0 + ms(1000));
        assert_eq!(c.position(), 2);
        assert!(c.is_busy());
        run_until(&mut c, t0 + ms(2000));
        assert_eq!(c.position(), 2);
        assert!(
            c.drain_events().any(|e| e
                == CarouselEvent::Ignored {
                    trigger: Trigger::Auto,
                    reason: IgnoreReason::Busy
                })
        );
        run_until(&mut c, t0 + ms(3000));
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn toggling_auto_restarts_the_timer() {
        let (mut c, t0) = manual(4);
        c.set_auto(true, t0 + ms(200));
        assert_eq!(c.next_deadline(), Some(t0 + ms(3200)));
        c.set_interval(ms(500), t0 + ms(300));
        assert_eq!(c.next_deadline(), Some(t0 + ms(800)));
        c.set_interval(Duration::ZERO, t0 + ms(300));
        assert_eq!(c.interval(), ms(500));
        c.set_auto(false, t0 + ms(400));
        assert!(c.next_deadline().is_none());
    }

    #[test]
    fn disabling_auto_clears_cooldown() {
        let (mut c, t0) = auto(4, ms(1000));
        c.next(t0);
        assert!(c.in_cooldown());
        c.set_auto(false, t0 + ms(10));
        assert!(!c.in_cooldown());
        run_until(&mut c, t0 + Duration::from_secs(10));
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn speed_change_reschedules_pending_timers() {
        let (mut c, t0) = manual(3);
        c.previous(t0);
        c.set_speed(ms(1000), t0 + ms(100));
        c.on_tick(t0 + SPEED);
        assert_eq!(c.position(), 0);
        c.on_tick(t0 + ms(1100));
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn relayout_clamps_real_position() {
        let (mut c, t0) = manual(6);
        c.goto_real_index(5, t0);
        c.relayout(6, 2, t0 + ms(50));
        assert_eq!(c.total_pages(), 3);
        assert_eq!(c.position(), 3);
        assert!(!c.is_busy());
        assert!(c.is_silent_jump());
        assert!(c.next_deadline().is_none());
    }

    #[test]
    fn relayout_resolves_clone_slots() {
        let (mut c, t0) = manual(6);
        c.previous(t0);
        c.relayout(4, 1, t0 + ms(10));
        assert_eq!(c.position(), 4);
        run_until(&mut c, t0 + Duration::from_secs(1));
        assert_eq!(c.position(), 4);

        let (mut c, t0) = manual(2);
        c.next(t0);
        c.on_tick(t0 + SPEED);
        c.next(t0 + SPEED);
        assert_eq!(c.position(), 3);
        c.relayout(5, 1, t0 + ms(400));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn relayout_to_empty_goes_inert_and_back() {
        let (mut c, t0) = auto(4, ms(1000));
        c.next(t0);
        c.relayout(0, 1, t0 + ms(100));
        assert!(c.layout().is_inert());
        assert!(!c.in_cooldown());
        assert!(c.next_deadline().is_none());

        c.relayout(2, 1, t0 + ms(200));
        assert_eq!(c.position(), 1);
        assert_eq!(c.next_deadline(), Some(t0 + ms(1200)));
    }
}
