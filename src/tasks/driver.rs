use anyhow::Result;
use tokio::select;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::carousel::{Carousel, CarouselOptions};
use crate::error::Error;
use crate::events::{CarouselCommand, CarouselEvent, CarouselSnapshot, NavOutcome, NavRequest};

const COMMAND_BUFFER: usize = 16;
const EVENT_BUFFER: usize = 64;

#[derive(Debug)]
enum Message {
    Navigate(NavRequest, oneshot::Sender<NavOutcome>),
    Configure(CarouselCommand, oneshot::Sender<()>),
    Relayout {
        slide_count: usize,
        slides_to_show: usize,
        reply: oneshot::Sender<()>,
    },
}

/// Shared access to one running carousel.
///
/// Every consumer (track, buttons, indicators) gets its own clone; all
/// mutations funnel through the single carousel task.
#[derive(Debug, Clone)]
pub struct CarouselHandle {
    commands: mpsc::Sender<Message>,
    state: watch::Receiver<CarouselSnapshot>,
    events: broadcast::Sender<CarouselEvent>,
}

impl CarouselHandle {
    pub async fn navigate(&self, request: NavRequest) -> crate::Result<NavOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Message::Navigate(request, reply))
            .await
            .map_err(|_| Error::Closed)?;
        outcome.await.map_err(|_| Error::Closed)
    }

    /// Resolves once the carousel task has applied the change.
    pub async fn configure(&self, command: CarouselCommand) -> crate::Result<()> {
        let (reply, applied) = oneshot::channel();
        self.commands
            .send(Message::Configure(command, reply))
            .await
            .map_err(|_| Error::Closed)?;
        applied.await.map_err(|_| Error::Closed)
    }

    pub async fn next(&self) -> crate::Result<NavOutcome> {
        self.navigate(NavRequest::Next).await
    }

    pub async fn previous(&self) -> crate::Result<NavOutcome> {
        self.navigate(NavRequest::Previous).await
    }

    pub async fn goto_real_index(&self, index: usize) -> crate::Result<NavOutcome> {
        self.navigate(NavRequest::Goto(index)).await
    }

    pub async fn set_auto(&self, enabled: bool) -> crate::Result<()> {
        self.configure(CarouselCommand::SetAuto(enabled)).await
    }

    /// Only the slide track relays the carousel out, so the page count
    /// always matches the slides it renders.
    pub(crate) async fn relayout(
        &self,
        slide_count: usize,
        slides_to_show: usize,
    ) -> crate::Result<()> {
        let (reply, applied) = oneshot::channel();
        self.commands
            .send(Message::Relayout {
                slide_count,
                slides_to_show,
                reply,
            })
            .await
            .map_err(|_| Error::Closed)?;
        applied.await.map_err(|_| Error::Closed)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.state.borrow()
    }

    /// Receiver that wakes on every state change.
    pub fn watch(&self) -> watch::Receiver<CarouselSnapshot> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CarouselEvent> {
        self.events.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Build a carousel and start its task on the current runtime.
///
/// The task stops when `cancel` fires or every handle has been dropped.
pub fn spawn(
    slide_count: usize,
    options: CarouselOptions,
    cancel: CancellationToken,
) -> (CarouselHandle, JoinHandle<Result<()>>) {
    let carousel = Carousel::new(slide_count, options, Instant::now().into_std());
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (state_tx, state_rx) = watch::channel(carousel.snapshot());
    let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
    let handle = CarouselHandle {
        commands: command_tx,
        state: state_rx,
        events: events_tx.clone(),
    };
    let task = tokio::spawn(run(carousel, command_rx, state_tx, events_tx, cancel));
    (handle, task)
}

/// Hosts the state machine: sleeps until its nearest deadline and applies
/// requests in arrival order.
///
/// State is published before a request is acknowledged, so a caller sees
/// its own change. Dropping the carousel on exit drops every pending timer.
#[instrument(skip_all, fields(total_pages = carousel.total_pages()))]
async fn run(
    mut carousel: Carousel,
    mut commands: mpsc::Receiver<Message>,
    state: watch::Sender<CarouselSnapshot>,
    events: broadcast::Sender<CarouselEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    info!(
        position = carousel.position(),
        auto = carousel.auto_enabled(),
        "carousel task started"
    );

    loop {
        let deadline = carousel.next_deadline().map(Instant::from_std);

        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; tearing down carousel");
                break;
            }

            maybe_msg = commands.recv() => {
                let now = Instant::now().into_std();
                match maybe_msg {
                    Some(Message::Navigate(request, reply)) => {
                        let outcome = carousel.navigate(request, now);
                        debug!(?request, ?outcome, "navigation handled");
                        publish(&mut carousel, &state, &events);
                        // The requester may have given up waiting; that is fine.
                        let _ = reply.send(outcome);
                    }
                    Some(Message::Configure(command, reply)) => {
                        carousel.apply(command, now);
                        debug!(?command, "configuration applied");
                        publish(&mut carousel, &state, &events);
                        let _ = reply.send(());
                    }
                    Some(Message::Relayout { slide_count, slides_to_show, reply }) => {
                        carousel.relayout(slide_count, slides_to_show, now);
                        publish(&mut carousel, &state, &events);
                        let _ = reply.send(());
                    }
                    None => {
                        debug!("all handles dropped");
                        break;
                    }
                }
            }

            _ = sleep_until_deadline(deadline) => {
                carousel.on_tick(Instant::now().into_std());
                publish(&mut carousel, &state, &events);
            }
        }
    }

    Ok(())
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn publish(
    carousel: &mut Carousel,
    state: &watch::Sender<CarouselSnapshot>,
    events: &broadcast::Sender<CarouselEvent>,
) {
    let snapshot = carousel.snapshot();
    state.send_if_modified(|current| {
        if *current == snapshot {
            return false;
        }
        *current = snapshot;
        true
    });
    for event in carousel.drain_events() {
        // No subscribers is not an error.
        let _ = events.send(event);
    }
}
