//! Distribution actor — owns the registry and the replay history.
//!
//! One task owns all distribution state. The pipeline hands appended
//! signals over a channel (the single cross-task boundary), and connection
//! handlers talk to the actor through a command channel with oneshot
//! replies — so a history query observes the log before or after an
//! append, never partway through one.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use signalcast_core::domain::Signal;

use crate::protocol::SignalMessage;
use crate::registry::{SubscriberId, SubscriberRegistry};

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Errors surfaced to connection handlers and the bootstrap.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("distribution service is no longer running")]
    ServiceClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Requests from connection handlers to the actor.
#[derive(Debug)]
pub enum Command {
    Subscribe {
        outbox: mpsc::Sender<String>,
        reply: oneshot::Sender<SubscriberId>,
    },
    Unsubscribe {
        id: SubscriberId,
    },
    /// Full history, serialized as a JSON array.
    History {
        reply: oneshot::Sender<String>,
    },
    /// Most recent signal, serialized; `None` when the history is empty.
    Latest {
        reply: oneshot::Sender<Option<String>>,
    },
}

/// Cloneable handle used by connection handlers to reach the actor.
#[derive(Debug, Clone)]
pub struct DistributionHandle {
    commands: mpsc::Sender<Command>,
}

impl DistributionHandle {
    pub async fn subscribe(
        &self,
        outbox: mpsc::Sender<String>,
    ) -> Result<SubscriberId, ServerError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Subscribe { outbox, reply })
            .await
            .map_err(|_| ServerError::ServiceClosed)?;
        rx.await.map_err(|_| ServerError::ServiceClosed)
    }

    pub async fn unsubscribe(&self, id: SubscriberId) {
        let _ = self.commands.send(Command::Unsubscribe { id }).await;
    }

    pub async fn history(&self) -> Result<String, ServerError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::History { reply })
            .await
            .map_err(|_| ServerError::ServiceClosed)?;
        rx.await.map_err(|_| ServerError::ServiceClosed)
    }

    pub async fn latest(&self) -> Result<Option<String>, ServerError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Latest { reply })
            .await
            .map_err(|_| ServerError::ServiceClosed)?;
        rx.await.map_err(|_| ServerError::ServiceClosed)
    }
}

/// The distribution actor. Construct, spawn `run()`, publish signals into
/// the returned sender, and hand the handle to connection handlers.
pub struct DistributionService {
    registry: SubscriberRegistry,
    history: Vec<SignalMessage>,
    signals: mpsc::UnboundedReceiver<Signal>,
    commands: mpsc::Receiver<Command>,
    feed_closed: bool,
    today: Box<dyn Fn() -> NaiveDate + Send>,
}

impl DistributionService {
    /// Service with the real clock for the backfill cutoff.
    pub fn new() -> (Self, mpsc::UnboundedSender<Signal>, DistributionHandle) {
        Self::with_clock(|| Utc::now().date_naive())
    }

    /// Service with an injected clock; tests pin the cutoff date.
    pub fn with_clock(
        today: impl Fn() -> NaiveDate + Send + 'static,
    ) -> (Self, mpsc::UnboundedSender<Signal>, DistributionHandle) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let service = Self {
            registry: SubscriberRegistry::new(),
            history: Vec::new(),
            signals: signal_rx,
            commands: command_rx,
            feed_closed: false,
            today: Box::new(today),
        };
        let handle = DistributionHandle {
            commands: command_tx,
        };
        (service, signal_tx, handle)
    }

    /// Run until every handle is dropped. A closed pipeline channel stops
    /// pushes but history queries keep working.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                signal = self.signals.recv(), if !self.feed_closed => match signal {
                    Some(signal) => self.on_signal(signal),
                    None => {
                        debug!("pipeline channel closed; serving queries only");
                        self.feed_closed = true;
                    }
                },
                command = self.commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
            }
        }
        info!("distribution service stopped");
    }

    fn on_signal(&mut self, signal: Signal) {
        let message = SignalMessage::from_signal(&signal);
        let live = signal.timestamp.date() >= (self.today)();
        self.history.push(message.clone());

        if !live {
            // Backfill: retained for history queries, never pushed.
            debug!(datetime = %message.datetime, "suppressing push for stale-dated signal");
            return;
        }
        match serde_json::to_string(&message) {
            Ok(text) => {
                let delivered = self.registry.broadcast(&text);
                info!(signal = %message.signal, delivered, "signal pushed");
            }
            Err(err) => debug!(%err, "failed to serialize signal for push"),
        }
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Subscribe { outbox, reply } => {
                let id = self.registry.register(outbox);
                let _ = reply.send(id);
            }
            Command::Unsubscribe { id } => {
                self.registry.unregister(id);
            }
            Command::History { reply } => {
                let json = serde_json::to_string(&self.history)
                    .unwrap_or_else(|_| "[]".to_string());
                let _ = reply.send(json);
            }
            Command::Latest { reply } => {
                let json = self
                    .history
                    .last()
                    .and_then(|message| serde_json::to_string(message).ok());
                let _ = reply.send(json);
            }
        }
    }
}
