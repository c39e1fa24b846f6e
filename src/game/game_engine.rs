use log::{debug, info, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::leaderboard::LeaderboardStore;
use super::settings::Settings;
use super::timers::{TimerId, Timers};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    compute_score, CardFace, Deck, Difficulty, GameEngineCommand, GameEngineEvent, RoundPhase,
    RoundSnapshot, RoundStats, TimerState,
};

/// How long a mismatched pair stays face-up before flipping back.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(800);

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns one round of play: the dealt deck, the two-card pair-slot, move
/// and match counting, the clock, and the win transition. Driven entirely
/// by `GameEngineCommand`s; talks to the presentation layer only through
/// `GameEngineEvent`s.
pub struct GameEngine {
    pub deck: Deck,
    flipped: Vec<usize>,
    matched_pairs: usize,
    moves: u32,
    timer_state: TimerState,
    phase: RoundPhase,
    settings: Settings,
    leaderboard: LeaderboardStore,
    current_playthrough_id: Uuid,
    timers: Rc<dyn Timers>,
    tick_timer: Option<TimerId>,
    mismatch_timer: Option<TimerId>,
    debug_mode: bool,
    self_ref: Weak<RefCell<GameEngine>>,
    subscription_id: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription_id) = self.subscription_id.take() {
            subscription_id.unsubscribe();
        }
        self.cancel_round_timers();
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        leaderboard: LeaderboardStore,
        timers: Rc<dyn Timers>,
    ) -> Rc<RefCell<Self>> {
        let game_engine = Self {
            deck: Deck::default(),
            flipped: Vec::with_capacity(2),
            matched_pairs: 0,
            moves: 0,
            timer_state: TimerState::default(),
            phase: RoundPhase::Active,
            settings,
            leaderboard,
            current_playthrough_id: Uuid::new_v4(),
            timers,
            tick_timer: None,
            mismatch_timer: None,
            debug_mode: Settings::is_debug_mode(),
            self_ref: Weak::new(),
            subscription_id: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(game_engine));
        refcell.borrow_mut().self_ref = Rc::downgrade(&refcell);
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        game_engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let game_engine_handler = game_engine.clone();
        let subscription_id = game_engine_command_observer.subscribe(move |command| {
            let mut game_engine = game_engine_handler.borrow_mut();
            game_engine.handle_command(command.clone());
        });
        game_engine.borrow_mut().subscription_id = Some(subscription_id);
    }

    fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::NewGame(difficulty, seed) => self.new_game(difficulty, seed),
            GameEngineCommand::Restart => {
                self.new_game(Some(self.deck.difficulty()), Some(self.deck.seed()))
            }
            GameEngineCommand::Reveal(position) => self.reveal(position),
            GameEngineCommand::Tick => self.tick(),
            GameEngineCommand::ResolveMismatch => self.resolve_mismatch(),
            GameEngineCommand::InitDisplay => self.sync_display(),
        }
    }

    fn new_game(&mut self, difficulty: Option<Difficulty>, seed: Option<u64>) {
        // a round only ends through here or through the win transition;
        // pending callbacks from the previous round must not outlive it
        self.cancel_round_timers();

        let difficulty = difficulty.unwrap_or(self.settings.difficulty);
        self.settings.difficulty = difficulty;
        let seed = seed.or_else(Settings::seed_from_env);

        self.deck = Deck::deal(difficulty, seed);
        self.flipped.clear();
        self.matched_pairs = 0;
        self.moves = 0;
        self.timer_state = TimerState::default();
        self.phase = RoundPhase::Active;
        self.current_playthrough_id = Uuid::new_v4();

        info!(
            target: "game_engine",
            "New game; difficulty: {:?}; seed: {}",
            difficulty,
            self.deck.seed()
        );
        if self.debug_mode {
            debug!(target: "game_engine", "Deck layout: {:?}", self.deck);
        }

        self.schedule_tick_timer();
        self.sync_display();
    }

    fn reveal(&mut self, position: usize) {
        if self.phase == RoundPhase::Won || self.flipped.len() == 2 {
            return;
        }
        // unknown positions and repeat clicks on a face-up card are
        // expected input, not errors
        match self.deck.get(position) {
            Some(card) if card.is_hidden() => (),
            _ => return,
        }

        self.deck.set_face(position, CardFace::Revealed);
        self.emit_card(position, CardFace::Revealed);
        self.flipped.push(position);

        if self.flipped.len() < 2 {
            return;
        }

        self.moves += 1;
        let first = self.flipped[0];
        let second = self.flipped[1];
        if self.card_icon(first) == self.card_icon(second) {
            self.deck.set_face(first, CardFace::Matched);
            self.deck.set_face(second, CardFace::Matched);
            self.emit_card(first, CardFace::Matched);
            self.emit_card(second, CardFace::Matched);
            self.flipped.clear();
            self.matched_pairs += 1;

            if self.matched_pairs == self.deck.total_pairs() {
                self.complete_round();
                return;
            }
        } else {
            self.schedule_mismatch_timer();
        }
        self.emit_snapshot();
    }

    fn tick(&mut self) {
        if self.phase == RoundPhase::Won || self.deck.is_empty() {
            return;
        }
        self.timer_state = self.timer_state.advanced();
        self.emit_snapshot();
    }

    fn resolve_mismatch(&mut self) {
        self.mismatch_timer = None;
        // anything other than a full pair-slot means the round moved on
        if self.flipped.len() != 2 {
            return;
        }
        for position in std::mem::take(&mut self.flipped) {
            self.deck.set_face(position, CardFace::Hidden);
            self.emit_card(position, CardFace::Hidden);
        }
    }

    fn complete_round(&mut self) {
        self.phase = RoundPhase::Won;
        self.timer_state = self.timer_state.stopped();
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }

        let stats = self.round_stats();
        info!(target: "game_engine", "Round won: {}", stats);

        let top_entries = self.leaderboard.record(stats.clone()).to_vec();
        self.emit_snapshot();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::RoundCompleted(stats));
        self.game_engine_event_emitter
            .emit(GameEngineEvent::LeaderboardUpdated(top_entries));
    }

    fn sync_display(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::BoardDealt {
                difficulty: self.deck.difficulty(),
                card_count: self.deck.len(),
                columns: self.deck.difficulty().n_columns(),
            });
        for (position, card) in self.deck.cards().iter().enumerate() {
            self.emit_card(position, card.face);
        }
        self.emit_snapshot();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::LeaderboardUpdated(
                self.leaderboard.top_entries().to_vec(),
            ));
    }

    fn schedule_tick_timer(&mut self) {
        let game_engine_weak = self.self_ref.clone();
        let id = self.timers.schedule_repeating(
            TICK_PERIOD,
            Box::new(move || {
                if let Some(game_engine) = game_engine_weak.upgrade() {
                    game_engine
                        .borrow_mut()
                        .handle_command(GameEngineCommand::Tick);
                    true
                } else {
                    false
                }
            }),
        );
        self.tick_timer = Some(id);
    }

    fn schedule_mismatch_timer(&mut self) {
        let game_engine_weak = self.self_ref.clone();
        let id = self.timers.schedule_once(
            MISMATCH_DELAY,
            Box::new(move || {
                if let Some(game_engine) = game_engine_weak.upgrade() {
                    game_engine
                        .borrow_mut()
                        .handle_command(GameEngineCommand::ResolveMismatch);
                }
            }),
        );
        self.mismatch_timer = Some(id);
    }

    fn cancel_round_timers(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.mismatch_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn card_icon(&self, position: usize) -> Option<&'static str> {
        self.deck.get(position).map(|card| card.icon)
    }

    fn emit_card(&self, position: usize, face: CardFace) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::CardChanged { position, face });
    }

    fn emit_snapshot(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::RoundStateChanged(self.snapshot()));
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            difficulty: self.deck.difficulty(),
            phase: self.phase,
            moves: self.moves,
            elapsed_seconds: self.timer_state.elapsed_seconds(),
            matched_pairs: self.matched_pairs,
            total_pairs: self.deck.total_pairs(),
            score: self.current_score(),
        }
    }

    pub fn current_score(&self) -> u32 {
        compute_score(self.moves, self.timer_state.elapsed_seconds())
    }

    pub fn round_stats(&self) -> RoundStats {
        RoundStats {
            score: self.current_score(),
            completion_time: self.timer_state.elapsed,
            moves: self.moves,
            difficulty: self.deck.difficulty(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as i64,
            playthrough_id: self.current_playthrough_id,
        }
    }

    pub fn get_difficulty(&self) -> Difficulty {
        self.deck.difficulty()
    }
}
