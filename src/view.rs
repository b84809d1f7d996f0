//! Consumers of the shared carousel state.
//!
//! Each consumer is built from its own [`CarouselHandle`] clone and reads
//! only the projections it needs. Rendering itself is left to the host.

use std::fmt;
use std::ops::Range;
use std::time::Duration;

use crate::carousel::{PaddedPage, Page, Slot, group, pad};
use crate::events::{CarouselSnapshot, IgnoreReason, NavOutcome};
use crate::tasks::driver::CarouselHandle;

/// How the track should move to its current offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStyle {
    /// Jump without animation (silent reanchor or relayout).
    None,
    Ease(Duration),
}

impl TransitionStyle {
    pub fn for_snapshot(snapshot: &CarouselSnapshot) -> Self {
        if snapshot.silent_jump {
            TransitionStyle::None
        } else {
            TransitionStyle::Ease(snapshot.speed)
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionStyle::None => f.write_str("none"),
            TransitionStyle::Ease(duration) => {
                write!(f, "transform {}ms ease-in-out", duration.as_millis())
            }
        }
    }
}

/// Horizontal translation of the track, in percent of the viewport width.
pub fn track_offset_percent(position: usize) -> f32 {
    -(position as f32) * 100.0
}

/// One padded entry, kept as slide ranges so the track can cache it
/// alongside the slides it points into.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PaddedSpan {
    slot: Slot,
    page: usize,
    slides: Range<usize>,
}

impl PaddedSpan {
    fn resolve<'a, S>(&self, slides: &'a [S]) -> PaddedPage<'a, S> {
        PaddedPage {
            slot: self.slot,
            page: Page::new(self.page, slides.get(self.slides.clone()).unwrap_or_default()),
        }
    }
}

fn padded_spans<S>(slides: &[S], slides_to_show: usize) -> Vec<PaddedSpan> {
    let slides_to_show = slides_to_show.max(1);
    pad(&group(slides, slides_to_show))
        .into_iter()
        .map(|entry| {
            let start = entry.page.index() * slides_to_show;
            PaddedSpan {
                slot: entry.slot,
                page: entry.page.index(),
                slides: start..start + entry.page.len(),
            }
        })
        .collect()
}

/// What the track renders for one state.
#[derive(Debug)]
pub struct TrackFrame<'a, S> {
    slides: &'a [S],
    spans: &'a [PaddedSpan],
    pub position: usize,
    pub offset_percent: f32,
    pub transition: TransitionStyle,
}

impl<'a, S> TrackFrame<'a, S> {
    /// Length of the padded sequence.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn pages(&self) -> impl Iterator<Item = PaddedPage<'a, S>> + '_ {
        let slides = self.slides;
        self.spans.iter().map(move |span| span.resolve(slides))
    }

    /// The padded entry under the viewport.
    pub fn visible(&self) -> Option<PaddedPage<'a, S>> {
        self.spans
            .get(self.position)
            .map(|span| span.resolve(self.slides))
    }
}

/// Owns the slide list and the padded sequence built from it.
///
/// The track is the only consumer that can relay the carousel out; the
/// padded sequence is rebuilt only when the slides or the page size change.
/// `slides` passed to [`SlideTrack::new`] must match the slide count the
/// carousel was spawned with.
#[derive(Debug)]
pub struct SlideTrack<S> {
    handle: CarouselHandle,
    slides: Vec<S>,
    slides_to_show: usize,
    spans: Vec<PaddedSpan>,
}

impl<S> SlideTrack<S> {
    pub fn new(handle: CarouselHandle, slides: Vec<S>) -> Self {
        let slides_to_show = handle.snapshot().slides_to_show;
        let spans = padded_spans(&slides, slides_to_show);
        Self {
            handle,
            slides,
            slides_to_show,
            spans,
        }
    }

    pub fn slides(&self) -> &[S] {
        &self.slides
    }

    pub fn frame(&self) -> TrackFrame<'_, S> {
        let snapshot = self.handle.snapshot();
        TrackFrame {
            slides: &self.slides,
            spans: &self.spans,
            position: snapshot.position,
            offset_percent: track_offset_percent(snapshot.position),
            transition: TransitionStyle::for_snapshot(&snapshot),
        }
    }

    /// Replace the slide list and regroup the carousel around it.
    pub async fn set_slides(&mut self, slides: Vec<S>) -> crate::Result<()> {
        self.handle
            .relayout(slides.len(), self.slides_to_show)
            .await?;
        self.spans = padded_spans(&slides, self.slides_to_show);
        self.slides = slides;
        Ok(())
    }

    pub async fn set_slides_to_show(&mut self, slides_to_show: usize) -> crate::Result<()> {
        let slides_to_show = slides_to_show.max(1);
        self.handle
            .relayout(self.slides.len(), slides_to_show)
            .await?;
        self.slides_to_show = slides_to_show;
        self.spans = padded_spans(&self.slides, slides_to_show);
        Ok(())
    }
}

/// Buttons drop clicks while a transition is running instead of queueing them.
fn button_gate(snapshot: &CarouselSnapshot) -> Option<IgnoreReason> {
    if snapshot.is_inert() {
        Some(IgnoreReason::Inert)
    } else if snapshot.is_busy() {
        Some(IgnoreReason::Busy)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct PrevButton {
    handle: CarouselHandle,
}

impl PrevButton {
    pub fn new(handle: CarouselHandle) -> Self {
        Self { handle }
    }

    pub fn disabled(&self) -> bool {
        button_gate(&self.handle.snapshot()).is_some()
    }

    pub async fn click(&self) -> crate::Result<NavOutcome> {
        if let Some(reason) = button_gate(&self.handle.snapshot()) {
            return Ok(NavOutcome::Ignored(reason));
        }
        self.handle.previous().await
    }
}

#[derive(Debug, Clone)]
pub struct NextButton {
    handle: CarouselHandle,
}

impl NextButton {
    pub fn new(handle: CarouselHandle) -> Self {
        Self { handle }
    }

    pub fn disabled(&self) -> bool {
        button_gate(&self.handle.snapshot()).is_some()
    }

    pub async fn click(&self) -> crate::Result<NavOutcome> {
        if let Some(reason) = button_gate(&self.handle.snapshot()) {
            return Ok(NavOutcome::Ignored(reason));
        }
        self.handle.next().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub index: usize,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct IndicatorRow {
    handle: CarouselHandle,
}

impl IndicatorRow {
    pub fn new(handle: CarouselHandle) -> Self {
        Self { handle }
    }

    /// One bullet per real page. None is active while a clone slot is shown.
    pub fn bullets(&self) -> Vec<Bullet> {
        let snapshot = self.handle.snapshot();
        let active = snapshot.current_real_index();
        (0..snapshot.total_pages)
            .map(|index| Bullet {
                index,
                active: active == Some(index),
            })
            .collect()
    }

    /// Indicators are not gated on `is_busy`; a click always wins.
    pub async fn select(&self, index: usize) -> crate::Result<NavOutcome> {
        self.handle.goto_real_index(index).await
    }
}

/// Text rendering of a bullet row, e.g. `( ) (*) ( )`.
pub fn render_bullets(bullets: &[Bullet]) -> String {
    bullets
        .iter()
        .map(|b| if b.active { "(*)" } else { "( )" })
        .collect::<Vec<_>>()
        .join(" ")
}
