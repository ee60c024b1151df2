//! The game engine. Owns the state and drives every change to it.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Production subsystem   (every production interval)
//!   2. Calendar subsystem     (every day interval)
//!   3. Briefing completion    (whenever the worker has replied)
//!   4. Mission replenishment  (every mission-scan interval)
//!
//! RULES:
//!   - The engine is the single owner of GameState; subsystems and
//!     actions receive it explicitly and re-read it on every call.
//!   - All randomness flows through the RngBank.
//!   - Every change is recorded in the event log, and the save slot
//!     is rewritten after every mutation.
//!   - Validation failures are journal entries, never errors.
//!   - Narrator calls run on a briefing worker. A scan is in flight
//!     from the moment its offers are drafted until the briefings are
//!     posted; the clock keeps running meanwhile.

use crate::{
    briefing::BriefingJob,
    calendar_subsystem::CalendarSubsystem,
    clock::{is_due, GameClock},
    command::PlayerCommand,
    config::GameConfig,
    error::{GameError, GameResult},
    event::{EventLogEntry, GameEvent, Rejection},
    journal::Severity,
    mission::{self, BattleOutcome, MissionBoard, MissionDraft, ScanToken},
    name_generator::OperationNames,
    narrative::{self, Narrator, SituationReport, BRIEFING_FALLBACK},
    production_subsystem::ProductionSubsystem,
    resources::describe_bundle,
    rng::{RngBank, RngSlot, SubsystemRng},
    snapshot::{Provenance, SaveSlot},
    state::GameState,
    store::GameStore,
    subsystem::GameSubsystem,
    types::SessionId,
    unit,
};
use std::{iter, sync::Arc};

/// A replenishment between drafting and posting. Holding it holds the
/// scan token.
struct PendingScan {
    token:     ScanToken,
    manual:    bool,
    drafts:    Vec<MissionDraft>,
    briefings: BriefingJob,
}

pub struct GameEngine {
    pub session_id: SessionId,
    pub clock:      GameClock,
    pub state:      GameState,
    pub missions:   MissionBoard,
    config:         GameConfig,
    seed:           u64,
    slot:           SaveSlot,
    narrator:       Arc<dyn Narrator>,
    pending_scan:   Option<PendingScan>,
    subsystems:     Vec<Box<dyn GameSubsystem>>,
    mission_rng:    SubsystemRng,
    combat_rng:     SubsystemRng,
    pub store:      GameStore,
}

impl GameEngine {
    /// Wire an engine around the saved (or initial) state.
    /// The mission board starts empty; see `boot()`.
    pub fn new(
        config: GameConfig,
        seed: u64,
        store: GameStore,
        narrator: Box<dyn Narrator>,
    ) -> GameResult<Self> {
        let slot = SaveSlot::new(config.save_key.clone());
        let (state, provenance) = slot.load_or_initial(&store, &config)?;
        let session_id = uuid::Uuid::new_v4().to_string();
        store.insert_session(&session_id, seed, env!("CARGO_PKG_VERSION"))?;

        let rng_bank = RngBank::new(seed);
        let mut engine = Self {
            session_id:  session_id.clone(),
            clock:       GameClock::new(),
            state,
            missions:    MissionBoard::new(),
            mission_rng: rng_bank.for_slot(RngSlot::Missions),
            combat_rng:  rng_bank.for_slot(RngSlot::Combat),
            subsystems:  Vec::new(),
            slot,
            narrator:     Arc::from(narrator),
            pending_scan: None,
            seed,
            config,
            store,
        };

        // EXECUTION ORDER: fixed, see module docs.
        let intervals = engine.config.intervals;
        engine.register(Box::new(ProductionSubsystem::new(intervals.production_ticks)));
        engine.register(Box::new(CalendarSubsystem::new(intervals.day_ticks)));

        let restored = provenance == Provenance::Restored;
        log::info!(
            "session {session_id} started (seed={seed}, {})",
            if restored { "restored save" } else { "fresh game" }
        );
        engine.record(
            "engine",
            &[GameEvent::SessionStarted { session_id, seed, restored }],
        )?;
        engine.persist()?;
        Ok(engine)
    }

    /// Build an engine and start the startup mission scan. The board
    /// fills once the briefings arrive.
    pub fn boot(
        config: GameConfig,
        seed: u64,
        store: GameStore,
        narrator: Box<dyn Narrator>,
    ) -> GameResult<Self> {
        let mut engine = Self::new(config, seed, store, narrator)?;
        engine.scan_for_missions(false)?;
        Ok(engine)
    }

    /// Booted engine on an in-memory store with the default catalog,
    /// no narrative link, and the startup scan already posted.
    pub fn build_test(seed: u64) -> GameResult<Self> {
        let store = GameStore::in_memory()?;
        store.migrate()?;
        let mut engine = Self::boot(GameConfig::default(), seed, store, Box::new(narrative::Offline))?;
        engine.await_scan()?;
        Ok(engine)
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, subsystem: Box<dyn GameSubsystem>) {
        self.subsystems.push(subsystem);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ── Clock ─────────────────────────────────────────────────

    /// Advance one tick and run every effect that is due.
    pub fn tick(&mut self) -> GameResult<Vec<GameEvent>> {
        let tick = self.clock.advance();
        let mut tick_events = Vec::new();

        for subsystem in &mut self.subsystems {
            let new_events = subsystem.update(tick, &mut self.state)?;
            for event in &new_events {
                let entry = EventLogEntry {
                    id:         None,
                    session_id: self.session_id.clone(),
                    tick,
                    source:     subsystem.name().to_string(),
                    event_type: event.type_name().to_string(),
                    payload:    serde_json::to_string(event)?,
                };
                self.store.append_event(&entry)?;
            }
            tick_events.extend(new_events);
        }

        tick_events.extend(self.poll_scan()?);
        if is_due(tick, self.config.intervals.mission_scan_ticks) {
            tick_events.extend(self.scan_for_missions(false)?);
        }

        if !tick_events.is_empty() {
            self.persist()?;
        }
        Ok(tick_events)
    }

    /// Run n ticks in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> GameResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    // ── Player actions ────────────────────────────────────────

    pub fn apply(&mut self, command: PlayerCommand) -> GameResult<Vec<GameEvent>> {
        log::info!("tick={} command: {}", self.clock.current_tick, command.name());
        let mut events = self.poll_scan()?;
        events.extend(self.dispatch(command)?);
        Ok(events)
    }

    fn dispatch(&mut self, command: PlayerCommand) -> GameResult<Vec<GameEvent>> {
        match command {
            PlayerCommand::Upgrade { building_id }     => self.upgrade(&building_id),
            PlayerCommand::Train { unit_id }           => self.train(&unit_id),
            PlayerCommand::StartMission { mission_id } => self.start_mission(&mission_id),
            PlayerCommand::ScanForMissions { manual }  => self.scan_for_missions(manual),
            PlayerCommand::RequestAdvice => {
                let text = self.request_advice();
                let events = vec![GameEvent::AdviceIssued {
                    tick: self.clock.current_tick,
                    text,
                }];
                self.record("narrator", &events)?;
                Ok(events)
            }
            PlayerCommand::ResetGame => self.reset(),
        }
    }

    /// Raise a building one level, if the command building allows it
    /// and the ledger covers the cost.
    pub fn upgrade(&mut self, building_id: &str) -> GameResult<Vec<GameEvent>> {
        let tick = self.clock.current_tick;
        let building = self
            .state
            .building(building_id)
            .ok_or_else(|| GameError::UnknownBuilding { id: building_id.to_string() })?;
        let (name, level, is_command) = (building.name.clone(), building.level, building.is_command());
        let cost = building.upgrade_cost();

        let command = self
            .state
            .command_building()
            .map(|c| (c.name.clone(), c.level));
        if let (false, Some((command_name, command_level))) = (is_command, command) {
            if level >= command_level {
                let required_level = command_level + 1;
                self.state.note(
                    &format!(
                        "Restriction: {command_name} Level {required_level} required for further base expansion."
                    ),
                    Severity::Warning,
                );
                log::warn!("tick={tick} upgrade {building_id} refused: command level {command_level}");
                return self.reject(GameEvent::UpgradeRejected {
                    tick,
                    building_id: building_id.to_string(),
                    reason: Rejection::CommandLevelTooLow { required_level },
                });
            }
        }

        if !self.state.resources.spend(&cost) {
            self.state.note(
                &format!("Insufficient logistics for {name} upgrade. Priority resource acquisition needed."),
                Severity::Error,
            );
            log::warn!("tick={tick} upgrade {building_id} refused: cannot afford {}", describe_bundle(&cost));
            return self.reject(GameEvent::UpgradeRejected {
                tick,
                building_id: building_id.to_string(),
                reason: Rejection::InsufficientResources { needed: cost },
            });
        }

        let new_level = level + 1;
        if let Some(building) = self.state.building_mut(building_id) {
            building.level = new_level;
        }
        self.state.note(
            &format!("Infrastructure Upgrade: {name} reached Level {new_level}"),
            Severity::Success,
        );
        self.commit("player", vec![GameEvent::BuildingUpgraded {
            tick,
            building_id: building_id.to_string(),
            new_level,
            cost,
        }])
    }

    /// Add one unit to the roster, if the barracks is high enough and
    /// the ledger covers the training cost.
    pub fn train(&mut self, unit_id: &str) -> GameResult<Vec<GameEvent>> {
        let tick = self.clock.current_tick;
        let (index, unit) = self
            .state
            .unit(unit_id)
            .ok_or_else(|| GameError::UnknownUnit { id: unit_id.to_string() })?;
        let (name, cost) = (unit.name.clone(), unit.cost.clone());
        let required_level = unit::required_barracks_level(index);

        let barracks_level = self.state.barracks().map_or(0, |b| b.level);
        if barracks_level < required_level {
            self.state.note(
                &format!("War Room Level {required_level} required for {name} blueprints."),
                Severity::Warning,
            );
            log::warn!("tick={tick} train {unit_id} refused: barracks level {barracks_level}");
            return self.reject(GameEvent::TrainingRejected {
                tick,
                unit_id: unit_id.to_string(),
                reason: Rejection::BarracksLevelTooLow { required_level },
            });
        }

        if !self.state.resources.spend(&cost) {
            self.state.note(
                "Recruitment halted: Food or Steel shortage. Resolve logistics first.",
                Severity::Error,
            );
            log::warn!("tick={tick} train {unit_id} refused: cannot afford {}", describe_bundle(&cost));
            return self.reject(GameEvent::TrainingRejected {
                tick,
                unit_id: unit_id.to_string(),
                reason: Rejection::InsufficientResources { needed: cost },
            });
        }

        let mut count = 0;
        if let Some(unit) = self.state.unit_mut(unit_id) {
            unit.count += 1;
            count = unit.count;
        }
        self.state.note(
            &format!("Deployment: 1x {name} unit added to roster."),
            Severity::Info,
        );
        self.commit("player", vec![GameEvent::UnitTrained {
            tick,
            unit_id: unit_id.to_string(),
            count,
            cost,
        }])
    }

    /// Launch a mission, drawing the battle roll from the combat stream.
    pub fn start_mission(&mut self, mission_id: &str) -> GameResult<Vec<GameEvent>> {
        let roll = self.combat_rng.next_f64();
        let survival_draw = self.combat_rng.next_f64();
        self.start_mission_with_draws(mission_id, roll, survival_draw)
    }

    /// Launch a mission with explicit uniform draws in [0, 1):
    /// `roll` decides the battle, `survival_draw` the casualty rate.
    pub fn start_mission_with_draws(
        &mut self,
        mission_id: &str,
        roll: f64,
        survival_draw: f64,
    ) -> GameResult<Vec<GameEvent>> {
        let tick = self.clock.current_tick;
        if self.missions.get(mission_id).is_none() {
            return Err(GameError::UnknownMission { id: mission_id.to_string() });
        }

        let player_power = self.state.total_power();
        if player_power == 0 {
            self.state.note(
                "Cannot launch expedition without military personnel.",
                Severity::Error,
            );
            return self.reject(GameEvent::MissionRejected {
                tick,
                mission_id: mission_id.to_string(),
                reason: Rejection::NoForces,
            });
        }

        let mission = self
            .missions
            .take(mission_id)
            .ok_or_else(|| GameError::UnknownMission { id: mission_id.to_string() })?;

        let event = match mission::resolve_battle(player_power, &mission, roll, survival_draw) {
            BattleOutcome::Victory { win_chance, rewards } => {
                self.state.resources.credit_bundle(&rewards);
                self.state.note(
                    &format!(
                        "BATTLE REPORT: Operation {} was a resounding success. Loot salvaged.",
                        mission.title
                    ),
                    Severity::Success,
                );
                log::info!("tick={tick} mission {mission_id} won (p={win_chance:.3})");
                GameEvent::MissionWon {
                    tick,
                    mission_id: mission.id,
                    win_chance,
                    rewards,
                }
            }
            BattleOutcome::Defeat { win_chance, survival_rate } => {
                unit::apply_casualties(&mut self.state.units, survival_rate);
                self.state.note(
                    &format!(
                        "BATTLE REPORT: Disaster in {}. Severe casualties. Squad decimated.",
                        mission.title
                    ),
                    Severity::Error,
                );
                log::info!(
                    "tick={tick} mission {mission_id} lost (p={win_chance:.3}, survivors={survival_rate:.2})"
                );
                GameEvent::MissionLost {
                    tick,
                    mission_id: mission.id,
                    win_chance,
                    survival_rate,
                }
            }
        };
        self.commit("player", vec![event])
    }

    /// Top the mission board back up to capacity.
    ///
    /// Single-flight: a scan requested while another is in flight is
    /// suppressed. A manual scan of a full board only leaves an
    /// informational journal entry. Otherwise the missing offers are
    /// drafted now and posted by `poll_scan` once their briefings
    /// arrive.
    pub fn scan_for_missions(&mut self, manual: bool) -> GameResult<Vec<GameEvent>> {
        let mut events = self.poll_scan()?;
        let tick = self.clock.current_tick;
        let Some(token) = self.missions.try_begin_scan() else {
            log::debug!("tick={tick} mission scan suppressed: already in flight");
            let suppressed = vec![GameEvent::ScanSuppressed { tick, manual }];
            self.record("missions", &suppressed)?;
            events.extend(suppressed);
            return Ok(events);
        };

        let deficit = self.missions.deficit();
        if deficit == 0 {
            if manual {
                self.state.note("Scanners report no new unique targets in range.", Severity::Info);
                events.extend(self.commit("missions", vec![GameEvent::ScanIdle { tick, manual }])?);
            }
            return Ok(events);
        }

        let day = self.state.day;
        let issued_at = chrono::Utc::now().timestamp_millis();
        let drafts: Vec<MissionDraft> = (0..deficit)
            .map(|_| {
                let difficulty = mission::roll_difficulty(day, &mut self.mission_rng);
                MissionDraft {
                    id: self.missions.next_id(issued_at),
                    title: OperationNames::generate(&mut self.mission_rng),
                    difficulty,
                    day,
                }
            })
            .collect();
        let difficulties = drafts.iter().map(|d| d.difficulty).collect();
        let briefings = BriefingJob::spawn(Arc::clone(&self.narrator), difficulties);
        log::debug!("tick={tick} drafted {deficit} mission(s) for day {day}, awaiting briefings");

        self.pending_scan = Some(PendingScan { token, manual, drafts, briefings });
        let started = vec![GameEvent::ScanStarted { tick, manual, requested: deficit }];
        self.record("missions", &started)?;
        events.extend(started);
        Ok(events)
    }

    /// Whether a scan is waiting on its briefings.
    pub fn scan_in_flight(&self) -> bool {
        self.pending_scan.is_some()
    }

    /// Post the in-flight scan if its briefings have arrived.
    pub fn poll_scan(&mut self) -> GameResult<Vec<GameEvent>> {
        let replies = self.pending_scan.as_ref().and_then(|scan| scan.briefings.poll());
        match replies {
            Some(texts) => self.complete_scan(texts),
            None => Ok(vec![]),
        }
    }

    /// Block until the in-flight scan (if any) can be posted.
    pub fn await_scan(&mut self) -> GameResult<Vec<GameEvent>> {
        let replies = self.pending_scan.as_ref().map(|scan| scan.briefings.wait());
        match replies {
            Some(texts) => self.complete_scan(texts),
            None => Ok(vec![]),
        }
    }

    fn complete_scan(&mut self, texts: Vec<String>) -> GameResult<Vec<GameEvent>> {
        let Some(PendingScan { token, manual, drafts, .. }) = self.pending_scan.take() else {
            return Ok(vec![]);
        };
        let tick = self.clock.current_tick;
        let descriptions = texts
            .into_iter()
            .chain(iter::repeat_with(|| BRIEFING_FALLBACK.to_string()));
        let offers = drafts
            .into_iter()
            .zip(descriptions)
            .map(|(draft, description)| draft.brief(description))
            .collect();

        let mission_ids = self.missions.post(offers);
        drop(token);
        log::debug!("tick={tick} posted {} mission(s)", mission_ids.len());
        if manual {
            self.state.note(
                "Target acquisition successful. Tactical options updated.",
                Severity::Success,
            );
        }
        self.commit("missions", vec![GameEvent::MissionsPosted { tick, mission_ids, manual }])
    }

    /// Ask the narrator for a briefing on the current situation.
    /// Never fails; an unreachable narrator yields the fallback text.
    pub fn request_advice(&self) -> String {
        let report = SituationReport::from_state(&self.state);
        narrative::advice_or_fallback(self.narrator.as_ref(), &report)
    }

    /// Wipe the save slot and start over from the initial state.
    pub fn reset(&mut self) -> GameResult<Vec<GameEvent>> {
        let tick = self.clock.current_tick;
        self.slot.clear(&self.store)?;
        self.state = GameState::initial(&self.config);
        self.pending_scan = None;
        self.missions.clear();
        self.clock.reset();
        log::info!("session {} reset to day 1", self.session_id);

        let mut events = vec![GameEvent::GameReset { tick }];
        self.record("engine", &events)?;
        self.persist()?;
        events.extend(self.scan_for_missions(false)?);
        Ok(events)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The whole audit trail of this session, oldest first.
    pub fn events(&self) -> GameResult<Vec<EventLogEntry>> {
        self.store.events_for_session(&self.session_id)
    }

    pub fn event_count(&self, event_type: &str) -> GameResult<i64> {
        self.store.event_count(&self.session_id, event_type)
    }

    /// Write the current state to the save slot.
    pub fn persist(&self) -> GameResult<()> {
        self.slot.save(&self.store, &self.state)
    }

    // ── Internals ─────────────────────────────────────────────

    fn record(&self, source: &str, events: &[GameEvent]) -> GameResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                session_id: self.session_id.clone(),
                tick:       self.clock.current_tick,
                source:     source.to_string(),
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
        }
        Ok(())
    }

    /// Record and save after a state change.
    fn commit(&mut self, source: &str, events: Vec<GameEvent>) -> GameResult<Vec<GameEvent>> {
        self.record(source, &events)?;
        self.persist()?;
        Ok(events)
    }

    /// A refusal still changed the journal, so it is saved too.
    fn reject(&mut self, event: GameEvent) -> GameResult<Vec<GameEvent>> {
        self.commit("player", vec![event])
    }
}
