//! Dungeon runner: drives a run from generation to its outcome.
//!
//! One run at a time. Each step selects the next encounter, announces it,
//! waits for the pacing beat, then resolves the battle. The session lock is
//! released while pacing, so `pause` and `exit` can land between the
//! announcement and the battle. A generation counter makes any step that
//! straddles an exit (or a pause/resume cycle) stand down instead of
//! resolving a stale encounter. Only one driver may step a run at a time;
//! a second `drive` or `step` is refused while the first holds the driver
//! lock.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use delve_domain::{
    DefeatReason, DungeonId, Encounter, EncounterKind, EncounterSlot, LogTone,
    MemberBattleStats, Progress, RewardInfo, RewardItem, Run, RunEvent, RunRecord, Team,
};

use crate::entities::{AvailableDungeon, CompletionOutcome, DungeonProgression};
use crate::infrastructure::ports::{
    CharacterRegistry, ClockPort, CombatResolver, PacingPort, RunEventSink,
};

use super::error::DungeonError;
use super::generate::{FallbackReport, RunGenerator};
use super::persistence::{DiscardReason, Recovery, RunPersistence};
use super::rewards::RewardProcessor;
use super::snapshots::PartySnapshots;

// =============================================================================
// Public types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Initializing,
    AwaitingEncounter(EncounterKind),
    Resolving,
    Paused,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStarted {
    pub dungeon_id: DungeonId,
    pub total_encounters: usize,
    pub fallback: FallbackReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dungeon_id: DungeonId,
    pub dungeon_name: String,
    pub final_boss_defeated: bool,
    pub first_completion: bool,
    pub gold_awarded: u64,
    pub unlocked: Option<DungeonId>,
    pub experience: u64,
    pub rewards: Vec<RewardItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Failed(RunRecord),
    /// Exploration was paused; the run stays saved.
    Paused,
    /// The run this driver was working on was exited or superseded.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Continue { progress: Progress },
    Finished(RunOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRestore {
    Resumed {
        dungeon_id: DungeonId,
        progress: Progress,
    },
    Clean,
    Discarded(DiscardReason),
}

// =============================================================================
// Runner
// =============================================================================

struct Session {
    run: Option<Run>,
    state: RunnerState,
    running: bool,
    paused: bool,
    generation: u64,
    last_record: Option<RunRecord>,
}

impl Session {
    fn new() -> Self {
        Self {
            run: None,
            state: RunnerState::Idle,
            running: false,
            paused: false,
            generation: 0,
            last_record: None,
        }
    }

    /// Why a driver working on `generation` must stop, if it must.
    fn interruption(&self, generation: u64) -> Option<RunOutcome> {
        if self.generation != generation {
            return Some(RunOutcome::Interrupted);
        }
        if !self.running {
            return Some(if self.paused {
                RunOutcome::Paused
            } else {
                RunOutcome::Interrupted
            });
        }
        None
    }

    fn ensure_idle(&self) -> Result<(), DungeonError> {
        if self.running {
            return Err(DungeonError::AlreadyRunning);
        }
        if self.run.is_some() {
            return Err(DungeonError::RunInProgress);
        }
        Ok(())
    }

    fn activate(&mut self, run: Run) {
        self.run = Some(run);
        self.running = true;
        self.paused = false;
        self.generation += 1;
        self.state = RunnerState::Initializing;
    }

    fn finish(&mut self, state: RunnerState) -> Option<Run> {
        self.running = false;
        self.paused = false;
        self.state = state;
        self.run.take()
    }
}

pub struct DungeonRunner {
    generator: Arc<RunGenerator>,
    rewards: Arc<RewardProcessor>,
    snapshots: Arc<PartySnapshots>,
    persistence: Arc<RunPersistence>,
    progression: Arc<DungeonProgression>,
    combat: Arc<dyn CombatResolver>,
    characters: Arc<dyn CharacterRegistry>,
    pacer: Arc<dyn PacingPort>,
    events: Arc<dyn RunEventSink>,
    clock: Arc<dyn ClockPort>,
    session: Mutex<Session>,
    driver: Mutex<()>,
}

impl DungeonRunner {
    pub fn new(
        generator: Arc<RunGenerator>,
        rewards: Arc<RewardProcessor>,
        snapshots: Arc<PartySnapshots>,
        persistence: Arc<RunPersistence>,
        progression: Arc<DungeonProgression>,
        combat: Arc<dyn CombatResolver>,
        characters: Arc<dyn CharacterRegistry>,
        pacer: Arc<dyn PacingPort>,
        events: Arc<dyn RunEventSink>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            generator,
            rewards,
            snapshots,
            persistence,
            progression,
            combat,
            characters,
            pacer,
            events,
            clock,
            session: Mutex::new(Session::new()),
            driver: Mutex::new(()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn state(&self) -> RunnerState {
        self.session.lock().await.state
    }

    pub async fn is_running(&self) -> bool {
        self.session.lock().await.running
    }

    pub async fn current_run(&self) -> Option<Run> {
        self.session.lock().await.run.clone()
    }

    /// Most recent failure record, from this session or from storage.
    pub async fn last_record(&self) -> Option<RunRecord> {
        if let Some(record) = self.session.lock().await.last_record.clone() {
            return Some(record);
        }
        self.persistence.load_record().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load last run record");
            None
        })
    }

    /// False while any run is active, or if the dungeon is unknown or locked.
    pub async fn can_enter(&self, dungeon_id: &DungeonId) -> Result<bool, DungeonError> {
        if self.session.lock().await.run.is_some() {
            return Ok(false);
        }
        if self.generator.templates().dungeon(dungeon_id).is_none() {
            return Ok(false);
        }
        Ok(self.progression.is_unlocked(dungeon_id)?)
    }

    pub fn available_dungeons(&self) -> Result<Vec<AvailableDungeon>, DungeonError> {
        Ok(self.progression.available_dungeons()?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Generates and saves a new run for the active team without fighting.
    pub async fn begin(&self, dungeon_id: &DungeonId) -> Result<RunStarted, DungeonError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        session.ensure_idle()?;
        if self.generator.templates().dungeon(dungeon_id).is_none() {
            return Err(DungeonError::TemplateNotFound(dungeon_id.clone()));
        }
        if !self.progression.is_unlocked(dungeon_id)? {
            return Err(DungeonError::Locked(dungeon_id.clone()));
        }
        let team = self
            .characters
            .active_team()?
            .filter(|team| !team.is_empty())
            .ok_or(DungeonError::NoActiveTeam)?;

        session.state = RunnerState::Initializing;
        let (run, fallback) = match self.prepare(dungeon_id, &team) {
            Ok(prepared) => prepared,
            Err(e) => {
                session.state = RunnerState::Idle;
                return Err(e);
            }
        };

        if let Err(e) = self.persistence.clear_record() {
            tracing::warn!(error = %e, "Failed to clear previous run record");
        }
        session.last_record = None;

        let started = RunStarted {
            dungeon_id: run.dungeon_id().clone(),
            total_encounters: run.total_encounters(),
            fallback,
        };
        self.events.publish(RunEvent::RunStarted {
            dungeon_id: started.dungeon_id.clone(),
            dungeon_name: run.dungeon_name().to_string(),
            total_encounters: started.total_encounters as u32,
        });
        self.log(format!("Entering {}", run.dungeon_name()), LogTone::Info);
        if fallback.used() {
            self.log(
                "Some creatures could not be found; stand-ins have taken their place",
                LogTone::Warning,
            );
        }
        self.events.publish(RunEvent::ProgressUpdated {
            dungeon_id: started.dungeon_id.clone(),
            progress: run.progress(),
        });

        tracing::info!(
            dungeon_id = %started.dungeon_id,
            encounters = started.total_encounters,
            party = run.party().len(),
            "Dungeon run started"
        );
        session.activate(run);
        Ok(started)
    }

    /// Generation, snapshots and the first save, undone together on failure.
    fn prepare(
        &self,
        dungeon_id: &DungeonId,
        team: &Team,
    ) -> Result<(Run, FallbackReport), DungeonError> {
        let generated = self.generator.generate(dungeon_id, team.members.clone())?;
        let run = generated.run;

        if let Err(e) = self.snapshots.capture(run.party()) {
            self.snapshots.restore(run.party());
            return Err(e.into());
        }
        if let Err(e) = self.persistence.save_run(&run) {
            self.snapshots.restore(run.party());
            return Err(e.into());
        }
        Ok((run, generated.fallback))
    }

    /// Starts a run and drives it to its outcome.
    pub async fn start(&self, dungeon_id: &DungeonId) -> Result<RunOutcome, DungeonError> {
        self.session.lock().await.ensure_idle()?;
        // A driver left over from an exited run stands down on its next beat.
        let _driver = self.driver.lock().await;
        self.begin(dungeon_id).await?;
        self.drive_claimed().await
    }

    /// Drives the active run until it completes, fails, pauses or is exited.
    pub async fn drive(&self) -> Result<RunOutcome, DungeonError> {
        let _driver = self.claim_driver()?;
        self.drive_claimed().await
    }

    fn claim_driver(&self) -> Result<MutexGuard<'_, ()>, DungeonError> {
        self.driver
            .try_lock()
            .map_err(|_| DungeonError::AlreadyRunning)
    }

    async fn drive_claimed(&self) -> Result<RunOutcome, DungeonError> {
        let generation = self.session.lock().await.generation;
        loop {
            match self.step_in(generation).await? {
                StepOutcome::Continue { .. } => self.pacer.pause(EncounterKind::Normal).await,
                StepOutcome::Finished(outcome) => return Ok(outcome),
            }
        }
    }

    /// Fights exactly one encounter.
    pub async fn step(&self) -> Result<StepOutcome, DungeonError> {
        let _driver = self.claim_driver()?;
        let generation = self.session.lock().await.generation;
        self.step_in(generation).await
    }

    async fn step_in(&self, generation: u64) -> Result<StepOutcome, DungeonError> {
        let (slot, kind) = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            if session.generation == generation && session.run.is_none() {
                return Err(DungeonError::NoActiveRun);
            }
            if let Some(outcome) = session.interruption(generation) {
                return Ok(StepOutcome::Finished(outcome));
            }
            let Some(run) = session.run.as_mut() else {
                return Err(DungeonError::NoActiveRun);
            };

            let Some(next) = run.select_next() else {
                return self.complete(session).map(StepOutcome::Finished);
            };
            if next.revealed_final_boss {
                if let Err(e) = self.persistence.save_run(run) {
                    tracing::error!(error = %e, "Failed to save final boss reveal");
                }
                self.log("The dungeon's guardian has appeared!", LogTone::Danger);
            }

            let encounter = run
                .encounter(next.slot)
                .ok_or(DungeonError::EncounterMissing)?;
            let kind = next.slot.kind();
            self.announce(run.dungeon_id(), encounter, kind);
            session.state = RunnerState::AwaitingEncounter(kind);
            (next.slot, kind)
        };

        self.pacer.pause(kind).await;

        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        if let Some(outcome) = session.interruption(generation) {
            tracing::debug!(outcome = ?outcome, "Step interrupted before battle");
            return Ok(StepOutcome::Finished(outcome));
        }
        session.state = RunnerState::Resolving;
        self.resolve(session, slot)
    }

    fn announce(&self, dungeon_id: &DungeonId, encounter: &Encounter, kind: EncounterKind) {
        self.events.publish(RunEvent::EncounterAppeared {
            dungeon_id: dungeon_id.clone(),
            encounter_id: encounter.id,
            name: encounter.name.clone(),
            kind,
            attribute: encounter.attribute,
            max_hp: encounter.max_hp(),
        });
        let (message, tone) = match kind {
            EncounterKind::Normal => (format!("Encountered {}", encounter.name), LogTone::Info),
            EncounterKind::MiniBoss => (
                format!("A powerful foe blocks the way: {}", encounter.name),
                LogTone::Warning,
            ),
            EncounterKind::FinalBoss => (
                format!("Final battle: {}", encounter.name),
                LogTone::Danger,
            ),
        };
        self.log(message, tone);
        tracing::debug!(
            dungeon_id = %dungeon_id,
            encounter = %encounter.name,
            kind = %kind,
            "Encounter appeared"
        );
    }

    fn resolve(
        &self,
        session: &mut Session,
        slot: EncounterSlot,
    ) -> Result<StepOutcome, DungeonError> {
        let run = session.run.as_ref().ok_or(DungeonError::NoActiveRun)?;
        let team = match self.fighting_party(run) {
            Ok(team) => team,
            Err(e) => return Err(self.suspend(session, e)),
        };

        let run = session.run.as_mut().ok_or(DungeonError::NoActiveRun)?;
        let encounter = run
            .encounter_mut(slot)
            .ok_or(DungeonError::EncounterMissing)?;
        self.log(format!("Battle with {} begins", encounter.name), LogTone::Info);

        let result = match self.combat.resolve(&team, encounter) {
            Ok(result) => result.validate_for(encounter).map(|()| result),
            Err(e) => Err(e),
        };
        let encounter = encounter.clone();

        match result {
            Ok(result) if result.victory => self.on_victory(session, slot, &encounter, &team),
            Ok(result) => {
                let reason = DefeatReason::classify(
                    result.statistics.total_damage(),
                    encounter.max_hp(),
                );
                self.on_defeat(session, &encounter, result.statistics.members, reason)
                    .map(StepOutcome::Finished)
            }
            Err(e) => {
                tracing::error!(
                    encounter = %encounter.name,
                    error = %e,
                    "Combat resolution failed"
                );
                self.log("The battle could not be resolved", LogTone::Danger);
                self.on_defeat(session, &encounter, Vec::new(), DefeatReason::CombatAborted)
                    .map(StepOutcome::Finished)
            }
        }
    }

    /// The party captured at the start of the run, minus anyone who has
    /// since left the roster.
    fn fighting_party(&self, run: &Run) -> Result<Team, DungeonError> {
        let mut members = Vec::with_capacity(run.party().len());
        for &member in run.party() {
            if self.characters.get_character(member)?.is_some() {
                members.push(member);
            }
        }
        if members.is_empty() {
            return Err(DungeonError::PartyUnavailable);
        }
        Ok(Team::new(run.dungeon_name(), members))
    }

    /// Stops exploring but keeps the run saved, so it can be resumed once
    /// the cause is fixed.
    fn suspend(&self, session: &mut Session, error: DungeonError) -> DungeonError {
        session.running = false;
        session.paused = true;
        session.state = RunnerState::Paused;
        tracing::warn!(error = %error, "Dungeon run suspended");
        self.log(format!("Exploration halted: {}", error), LogTone::Warning);
        if let Some(run) = session.run.as_ref() {
            self.events.publish(RunEvent::RunPaused {
                dungeon_id: run.dungeon_id().clone(),
            });
        }
        error
    }

    fn on_victory(
        &self,
        session: &mut Session,
        slot: EncounterSlot,
        encounter: &Encounter,
        team: &Team,
    ) -> Result<StepOutcome, DungeonError> {
        let run = session.run.as_mut().ok_or(DungeonError::NoActiveRun)?;
        let victory = match run.record_victory(slot) {
            Ok(victory) => victory,
            Err(e) => {
                tracing::error!(
                    encounter = %encounter.name,
                    error = %e,
                    "Victory does not match run position"
                );
                self.log("The battle could not be resolved", LogTone::Danger);
                return self
                    .on_defeat(session, encounter, Vec::new(), DefeatReason::CombatAborted)
                    .map(StepOutcome::Finished);
            }
        };

        self.log(format!("Defeated {}!", encounter.name), LogTone::Success);
        let reward = self.rewards.process(encounter, team);
        self.log(reward_line(&reward), LogTone::Info);
        run.add_rewards(&reward);
        if victory.final_boss_defeated {
            return self.complete(session).map(StepOutcome::Finished);
        }

        if let Err(e) = self.persistence.save_run(run) {
            tracing::error!(error = %e, "Failed to save run progress");
        }
        self.events.publish(RunEvent::ProgressUpdated {
            dungeon_id: run.dungeon_id().clone(),
            progress: victory.progress,
        });
        if let Some(next) = run.peek_next() {
            session.state = RunnerState::AwaitingEncounter(next.kind());
        }

        Ok(StepOutcome::Continue {
            progress: victory.progress,
        })
    }

    fn complete(&self, session: &mut Session) -> Result<RunOutcome, DungeonError> {
        let run = session
            .finish(RunnerState::Completed)
            .ok_or(DungeonError::NoActiveRun)?;
        self.snapshots.restore(run.party());
        if let Err(e) = self.persistence.clear_run() {
            tracing::error!(error = %e, "Failed to clear completed run");
        }

        let final_boss_defeated = run.is_completed();
        let completion = if final_boss_defeated {
            self.progression
                .record_completion(run.dungeon_id())
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to record dungeon completion");
                    CompletionOutcome::default()
                })
        } else {
            CompletionOutcome::default()
        };

        if final_boss_defeated {
            self.log(format!("{} cleared!", run.dungeon_name()), LogTone::Success);
        } else {
            self.log(
                format!("{} explored, but its guardian never showed", run.dungeon_name()),
                LogTone::Info,
            );
        }
        if completion.first_completion && completion.gold_awarded > 0 {
            self.log(
                format!("First clear bonus: {} gold", completion.gold_awarded),
                LogTone::Success,
            );
        }
        if let Some(next) = completion.unlocked.as_ref() {
            let name = self
                .generator
                .templates()
                .dungeon(next)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| next.to_string());
            self.log(format!("New dungeon unlocked: {}", name), LogTone::Success);
        }

        let summary = RunSummary {
            dungeon_id: run.dungeon_id().clone(),
            dungeon_name: run.dungeon_name().to_string(),
            final_boss_defeated,
            first_completion: completion.first_completion,
            gold_awarded: completion.gold_awarded,
            unlocked: completion.unlocked,
            experience: run.experience_gained(),
            rewards: run.rewards().to_vec(),
        };
        self.events.publish(RunEvent::ProgressUpdated {
            dungeon_id: summary.dungeon_id.clone(),
            progress: run.progress(),
        });
        self.events.publish(RunEvent::RunCompleted {
            dungeon_id: summary.dungeon_id.clone(),
            dungeon_name: summary.dungeon_name.clone(),
            final_boss_defeated,
            first_completion: summary.first_completion,
            experience: summary.experience,
            rewards: summary.rewards.clone(),
        });

        tracing::info!(
            dungeon_id = %summary.dungeon_id,
            final_boss_defeated,
            first_completion = summary.first_completion,
            experience = summary.experience,
            "Dungeon run completed"
        );
        Ok(RunOutcome::Completed(summary))
    }

    fn on_defeat(
        &self,
        session: &mut Session,
        encounter: &Encounter,
        team_stats: Vec<MemberBattleStats>,
        reason: DefeatReason,
    ) -> Result<RunOutcome, DungeonError> {
        let run = session
            .finish(RunnerState::Failed)
            .ok_or(DungeonError::NoActiveRun)?;
        let record = RunRecord::from_defeat(&run, encounter, team_stats, reason, self.clock.now());
        session.last_record = Some(record.clone());

        self.snapshots.restore(run.party());
        if let Err(e) = self.persistence.clear_run() {
            tracing::error!(error = %e, "Failed to clear failed run");
        }
        if let Err(e) = self.persistence.save_record(&record) {
            tracing::error!(error = %e, "Failed to save run record");
        }

        self.log(
            format!(
                "The party fell to {} on floor {} ({})",
                record.monster_name, record.floor, record.defeat_reason
            ),
            LogTone::Danger,
        );
        self.log(
            format!("{} challenge failed", run.dungeon_name()),
            LogTone::Danger,
        );
        self.events.publish(RunEvent::RunFailed {
            record: record.clone(),
        });

        tracing::warn!(
            dungeon_id = %record.dungeon_id,
            floor = record.floor,
            monster = %record.monster_name,
            reason = %record.defeat_reason,
            "Dungeon run failed"
        );
        Ok(RunOutcome::Failed(record))
    }

    /// Abandons the active run. Waits for an in-flight battle to settle,
    /// then restores the party and clears saved state.
    pub async fn exit(&self) -> Result<(), DungeonError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        if session.run.is_none() {
            return Err(DungeonError::NoActiveRun);
        }
        let run = session
            .finish(RunnerState::Idle)
            .ok_or(DungeonError::NoActiveRun)?;
        session.generation += 1;

        self.snapshots.restore(run.party());
        if let Err(e) = self.persistence.clear_run() {
            tracing::error!(error = %e, "Failed to clear exited run");
        }

        self.log(format!("Left {}", run.dungeon_name()), LogTone::Warning);
        self.events.publish(RunEvent::RunExited {
            dungeon_id: run.dungeon_id().clone(),
        });
        tracing::info!(
            dungeon_id = %run.dungeon_id(),
            progress = run.progress().value(),
            "Dungeon run exited"
        );
        Ok(())
    }

    pub async fn pause(&self) -> Result<(), DungeonError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        let dungeon_id = session
            .run
            .as_ref()
            .map(|run| run.dungeon_id().clone())
            .ok_or(DungeonError::NoActiveRun)?;
        if !session.running {
            return Err(DungeonError::NotRunning);
        }

        session.running = false;
        session.paused = true;
        session.state = RunnerState::Paused;
        self.log("Exploration paused", LogTone::Info);
        self.events.publish(RunEvent::RunPaused {
            dungeon_id: dungeon_id.clone(),
        });
        tracing::info!(dungeon_id = %dungeon_id, "Dungeon run paused");
        Ok(())
    }

    /// Resumes a paused run and drives it.
    pub async fn resume(&self) -> Result<RunOutcome, DungeonError> {
        Self::ensure_resumable(&*self.session.lock().await)?;
        // The driver that was paused gives the lock back on its next beat.
        let _driver = self.driver.lock().await;
        {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            let dungeon_id = Self::ensure_resumable(session)?.clone();

            session.running = true;
            session.paused = false;
            session.generation += 1;
            session.state = RunnerState::Initializing;
            self.log("Exploration resumed", LogTone::Info);
            self.events.publish(RunEvent::RunResumed {
                dungeon_id: dungeon_id.clone(),
            });
            tracing::info!(dungeon_id = %dungeon_id, "Dungeon run resumed");
        }
        self.drive_claimed().await
    }

    fn ensure_resumable(session: &Session) -> Result<&DungeonId, DungeonError> {
        let run = session.run.as_ref().ok_or(DungeonError::NoActiveRun)?;
        if session.running {
            return Err(DungeonError::AlreadyRunning);
        }
        if !session.paused {
            return Err(DungeonError::NotPaused);
        }
        Ok(run.dungeon_id())
    }

    /// Reconciles saved state at startup. A resumable run becomes the
    /// active run; call `drive` to continue it.
    pub async fn restore_session(&self) -> Result<SessionRestore, DungeonError> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        if session.running || session.run.is_some() {
            return Err(DungeonError::AlreadyRunning);
        }

        match self.persistence.reconcile(&self.snapshots)? {
            Recovery::Resumable(run) => {
                let restored = SessionRestore::Resumed {
                    dungeon_id: run.dungeon_id().clone(),
                    progress: run.progress(),
                };
                self.events.publish(RunEvent::RunResumed {
                    dungeon_id: run.dungeon_id().clone(),
                });
                self.events.publish(RunEvent::ProgressUpdated {
                    dungeon_id: run.dungeon_id().clone(),
                    progress: run.progress(),
                });
                self.log(
                    format!("Returning to {} ({})", run.dungeon_name(), run.progress()),
                    LogTone::Info,
                );
                session.activate(run);
                Ok(restored)
            }
            Recovery::Clean => Ok(SessionRestore::Clean),
            Recovery::Discarded(reason) => {
                self.log(
                    "Saved dungeon progress was inconsistent and has been discarded",
                    LogTone::Warning,
                );
                Ok(SessionRestore::Discarded(reason))
            }
        }
    }

    fn log(&self, message: impl Into<String>, tone: LogTone) {
        self.events.publish(RunEvent::log(message, tone));
    }
}

fn reward_line(reward: &RewardInfo) -> String {
    let mut line = format!("Gained {} EXP", reward.exp);
    for item in &reward.items {
        line.push_str(&format!(", {} x{}", item.item_id, item.count));
    }
    line
}
