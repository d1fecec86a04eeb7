//! Message relay between the chat context and the overlay context.
//!
//! The chat side only knows a [`RelayHandle`]; the overlay side only knows
//! the receiver it got from [`Relay::subscribe`]. Messages that cannot be
//! delivered are dropped.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatToRelay {
    NewMessageData { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayToOverlay {
    AddDanmaku { text: String },
}

enum RelayCommand {
    Chat(ChatToRelay),
    Subscribe(Sender<RelayToOverlay>),
    Shutdown,
}

/// Translate a chat-side message into what the overlay should receive.
pub fn route(message: ChatToRelay) -> Option<RelayToOverlay> {
    match message {
        ChatToRelay::NewMessageData { text } => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(RelayToOverlay::AddDanmaku {
                    text: text.to_owned(),
                })
            }
        }
    }
}

/// Sending half used by chat watchers. Sending never blocks and never fails
/// visibly.
#[derive(Clone)]
pub struct RelayHandle {
    tx: Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn send(&self, message: ChatToRelay) {
        if self.tx.send(RelayCommand::Chat(message)).is_err() {
            tracing::trace!("relay gone, dropping chat message");
        }
    }
}

pub struct Relay {
    tx: Sender<RelayCommand>,
    thread: Option<JoinHandle<()>>,
}

impl Relay {
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = channel::<RelayCommand>();
        let thread = thread::Builder::new()
            .name("danmaku-relay".to_string())
            .spawn(move || run_relay(rx))
            .map_err(|err| anyhow!("failed to spawn relay thread: {err}"))?;
        Ok(Self {
            tx,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> RelayHandle {
        RelayHandle {
            tx: self.tx.clone(),
        }
    }

    /// Register the overlay receiver. A later subscription replaces the
    /// earlier one.
    pub fn subscribe(&self) -> Receiver<RelayToOverlay> {
        let (tx, rx) = channel();
        if self.tx.send(RelayCommand::Subscribe(tx)).is_err() {
            tracing::warn!("relay thread is not running; overlay will receive nothing");
        }
        rx
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.tx.send(RelayCommand::Shutdown);
        if thread.join().is_err() {
            tracing::error!("relay thread panicked");
        }
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_relay(rx: Receiver<RelayCommand>) {
    let mut subscriber: Option<Sender<RelayToOverlay>> = None;
    let mut forwarded: u64 = 0;
    let mut dropped: u64 = 0;
    while let Ok(command) = rx.recv() {
        match command {
            RelayCommand::Subscribe(tx) => {
                tracing::debug!("overlay subscribed to relay");
                subscriber = Some(tx);
            }
            RelayCommand::Chat(message) => {
                let Some(outgoing) = route(message) else {
                    continue;
                };
                let delivered = subscriber
                    .as_ref()
                    .is_some_and(|tx| tx.send(outgoing).is_ok());
                if delivered {
                    forwarded += 1;
                } else {
                    // Overlay not ready or gone; same as a failed tab message.
                    subscriber = None;
                    dropped += 1;
                }
            }
            RelayCommand::Shutdown => break,
        }
    }
    tracing::debug!(forwarded, dropped, "relay stopped");
}

#[cfg(test)]
mod tests {
    use super::{route, ChatToRelay, RelayToOverlay};

    #[test]
    fn route_trims_and_skips_blank_text() {
        assert_eq!(
            route(ChatToRelay::NewMessageData {
                text: "  hi there \n".into()
            }),
            Some(RelayToOverlay::AddDanmaku {
                text: "hi there".into()
            })
        );
        assert_eq!(
            route(ChatToRelay::NewMessageData { text: " \t ".into() }),
            None
        );
    }
}
