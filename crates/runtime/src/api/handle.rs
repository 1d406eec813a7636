//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting actions, stepping the selection timer or streaming events from
//! specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{Action, PlayerId, SubmissionReceipt, SubmitError, UnitView};

use super::errors::{Result, RuntimeError};
use super::snapshot::TurnSnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit `action` for `player`'s slot in the current turn.
    ///
    /// The outer result reports runtime failures; the inner one is the
    /// controller's verdict. When this submission locks the second slot the
    /// turn has already resolved by the time the receipt arrives.
    pub async fn submit_action(
        &self,
        player: PlayerId,
        action: Action,
    ) -> Result<std::result::Result<SubmissionReceipt, SubmitError>> {
        self.request(|reply| Command::SubmitAction {
            player,
            action,
            reply,
        })
        .await
    }

    /// Resolve the current turn immediately, treating unlocked players as passing.
    pub async fn force_resolution(&self) -> Result<()> {
        self.request(|reply| Command::ForceResolution { reply })
            .await?
    }

    /// Advance the selection timer by `ticks` ticks.
    ///
    /// Used to drive the match by hand when the periodic tick is disabled.
    pub async fn advance_ticks(&self, ticks: u32) -> Result<()> {
        self.request(|reply| Command::AdvanceTicks { ticks, reply })
            .await?
    }

    pub async fn query_turn(&self) -> Result<TurnSnapshot> {
        self.request(|reply| Command::QueryTurn { reply }).await
    }

    /// Capability views of every registered unit, dead ones included.
    pub async fn query_units(&self) -> Result<Vec<UnitView>> {
        self.request(|reply| Command::QueryUnits { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Phase changes, reveals, resolution reports, game end
    /// - `Topic::Submission` - Accepted and rejected submissions with their codes
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
