//! Simulation worker that owns the authoritative [`tactics_core::MatchState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives them through a
//! [`TurnController`] built per command, and publishes the resulting
//! notifications to the EventBus. Periodic ticks share the same task, so every
//! mutation of the match happens here, one at a time, in arrival order.

use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use tactics_core::{
    AbilityExecutor, Action, EndOfTurnTicker, Env, MatchState, PlayerId, SubmissionReceipt,
    SubmitError, TurnController, TurnEvent, UnitRegistry, UnitView, WinConditionOracle,
};
use tracing::{debug, info, warn};

use crate::api::{Result, TurnSnapshot};
use crate::arena::Arena;
use crate::events::{Event, EventBus, SubmissionEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Offer an action for a player's slot in the current turn.
    SubmitAction {
        player: PlayerId,
        action: Action,
        reply: oneshot::Sender<std::result::Result<SubmissionReceipt, SubmitError>>,
    },
    /// Resolve the current turn now.
    ForceResolution { reply: oneshot::Sender<Result<()>> },
    /// Step the selection timer by hand.
    AdvanceTicks {
        ticks: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the turn bookkeeping (read-only).
    QueryTurn { reply: oneshot::Sender<TurnSnapshot> },
    /// Query the unit views (read-only).
    QueryUnits { reply: oneshot::Sender<Vec<UnitView>> },
}

/// Rule plug-ins handed to the core on every command.
pub struct Collaborators {
    pub executor: Box<dyn AbilityExecutor + Send>,
    pub ticker: Box<dyn EndOfTurnTicker + Send>,
    pub oracle: Box<dyn WinConditionOracle + Send>,
}

/// Background task that processes gameplay commands and selection ticks.
pub struct SimulationWorker {
    state: MatchState,
    arena: Arena,
    collaborators: Collaborators,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Option<Duration>,
}

impl SimulationWorker {
    pub fn new(
        state: MatchState,
        arena: Arena,
        collaborators: Collaborators,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Option<Duration>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            units = arena.units.unit_ids().len(),
            turn = state.turn_number(),
            ?tick_interval,
            "SimulationWorker initialized"
        );

        Self {
            state,
            arena,
            collaborators,
            command_rx,
            event_bus,
            tick_interval,
        }
    }

    /// Main worker loop. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        // Opening notifications (TurnStarted for turn 1).
        self.publish_turn_events();

        let mut ticker = self.tick_interval.map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    if let Err(error) = self.advance(1) {
                        warn!(target: "runtime::worker", %error, "Selection tick failed");
                    }
                }
            }
        }

        debug!(target: "runtime::worker", "Command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitAction {
                player,
                action,
                reply,
            } => {
                let result = self.handle_submission(player, action);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "SubmitAction reply channel closed (caller dropped)");
                }
            }
            Command::ForceResolution { reply } => {
                let result = self.with_controller(|controller| controller.force_resolution());
                self.publish_turn_events();
                if reply.send(result.map_err(Into::into)).is_err() {
                    debug!(target: "runtime::worker", "ForceResolution reply channel closed (caller dropped)");
                }
            }
            Command::AdvanceTicks { ticks, reply } => {
                let result = self.advance(ticks);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "AdvanceTicks reply channel closed (caller dropped)");
                }
            }
            Command::QueryTurn { reply } => {
                if reply.send(TurnSnapshot::capture(&self.state)).is_err() {
                    debug!(target: "runtime::worker", "QueryTurn reply channel closed (caller dropped)");
                }
            }
            Command::QueryUnits { reply } => {
                let units = self
                    .arena
                    .units
                    .records()
                    .map(|record| record.view())
                    .collect();
                if reply.send(units).is_err() {
                    debug!(target: "runtime::worker", "QueryUnits reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_submission(
        &mut self,
        player: PlayerId,
        action: Action,
    ) -> std::result::Result<SubmissionReceipt, SubmitError> {
        let turn = self.state.turn_number();
        let actor = action.actor;
        let result = self.with_controller(|controller| controller.submit(player, action));

        let event = match &result {
            Ok(receipt) => SubmissionEvent::accepted(receipt),
            Err(error) => {
                debug!(
                    target: "runtime::worker",
                    %player,
                    %actor,
                    turn,
                    %error,
                    "Submission rejected"
                );
                SubmissionEvent::rejected(player, actor, turn, error)
            }
        };
        self.event_bus.publish(Event::Submission(event));
        // Turn events go out after the submission verdict so observers see the
        // lock before the resolution it triggered.
        self.publish_turn_events();

        result
    }

    fn advance(&mut self, ticks: u32) -> Result<()> {
        for _ in 0..ticks {
            if self.state.is_over() {
                break;
            }
            let result = self.with_controller(|controller| controller.tick());
            self.publish_turn_events();
            result?;
        }
        Ok(())
    }

    /// Runs `f` against a controller wired to the arena, then frees the cells of
    /// units that died along the way.
    fn with_controller<T>(&mut self, f: impl FnOnce(&mut TurnController<'_>) -> T) -> T {
        let env = Env::new(
            &mut self.arena.grid,
            &mut self.arena.units,
            &mut *self.collaborators.executor,
            &mut *self.collaborators.ticker,
            &*self.collaborators.oracle,
        );
        let mut controller = TurnController::new(&mut self.state, env);
        let output = f(&mut controller);

        let fallen = self.arena.clear_fallen();
        if !fallen.is_empty() {
            debug!(target: "runtime::worker", ?fallen, "Cleared fallen units from the grid");
        }
        output
    }

    fn publish_turn_events(&mut self) {
        for event in self.state.drain_events() {
            if let TurnEvent::GameEnded { outcome } = &event {
                info!(
                    target: "runtime::worker",
                    winner = ?outcome.winner,
                    reason = %outcome.reason,
                    turn = outcome.turn,
                    "Match finished"
                );
            }
            self.event_bus.publish(Event::Turn(event));
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
