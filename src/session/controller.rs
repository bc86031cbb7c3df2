//! Game session controller.
//!
//! ## Phases
//!
//! ```text
//! Idle --submit_choice--> CountdownRunning --countdown done--> Resolving
//!  ^                                                              |
//!  +----------------- round scored, match continues --------------+
//!  +----------------- post-match delay elapsed, scores reset -----+
//! ```
//!
//! Input is accepted only in `Idle`. Choices submitted in any other phase
//! are dropped, never queued.
//!
//! ## Driving the clock
//!
//! All timing runs on the session's own `TimerQueue`. Call `advance_by` to
//! move virtual time forward; due tasks are dispatched in order and their
//! notifications collected for `drain_events`.

use im::Vector;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    Choice, ConfigError, GameConfig, GameRng, HighScorePolicy, MatchState, RuleSet, Scores, Side,
};
use crate::directory::{DirectoryError, UserDirectory, UserId};
use crate::rules::{resolve, OpponentPolicy, UniformOpponent};
use crate::scoring::ScoreLedger;
use crate::timing::{
    CancellationHandle, FlipEvent, RoundTimer, RoundTimerEvent, RuleFlipScheduler, Scheduler,
    TimerId, TimerQueue,
};

use super::event::{RoundRecord, SessionEvent, SessionTask};

type EventBatch = SmallVec<[SessionEvent; 4]>;

/// Where the session is in the round cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player's choice.
    #[default]
    Idle,
    /// Choice locked in, countdown ticking.
    CountdownRunning,
    /// Round being scored, or a finished match waiting for its reset.
    Resolving,
}

/// One player's game against the computer.
pub struct GameSession<D: UserDirectory> {
    config: GameConfig,
    clock: TimerQueue<SessionTask>,
    round_timer: RoundTimer,
    round_handle: Option<CancellationHandle>,
    flips: Option<RuleFlipScheduler>,
    ledger: ScoreLedger,
    phase: SessionPhase,
    started: bool,
    selection: Option<Choice>,
    rng: GameRng,
    opponent: Box<dyn OpponentPolicy>,
    directory: D,
    user: Option<UserId>,
    events: Vec<SessionEvent>,
    history: Vector<RoundRecord>,
    rounds_played: u32,
    reset_generation: u64,
    pending_reset: Option<TimerId>,
}

impl<D: UserDirectory> GameSession<D> {
    /// Create a session. It accepts no input until `start`.
    pub fn new(config: GameConfig, directory: D) -> Result<Self, ConfigError> {
        config.validate()?;
        let flips = config
            .flips_rules()
            .then(|| RuleFlipScheduler::new(config.flip));
        Ok(Self {
            clock: TimerQueue::new(),
            round_timer: RoundTimer::new(config.countdown.interval_ms),
            round_handle: None,
            flips,
            ledger: ScoreLedger::new(config.score_limit, config.scoring),
            phase: SessionPhase::Idle,
            started: false,
            selection: None,
            rng: GameRng::new(config.seed),
            opponent: Box::new(UniformOpponent),
            directory,
            user: None,
            events: Vec::new(),
            history: Vector::new(),
            rounds_played: 0,
            reset_generation: 0,
            pending_reset: None,
            config,
        })
    }

    /// Record high scores for this user (builder pattern).
    #[must_use]
    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Replace the opponent policy (builder pattern).
    #[must_use]
    pub fn with_opponent(mut self, opponent: impl OpponentPolicy + 'static) -> Self {
        self.opponent = Box::new(opponent);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn scores(&self) -> Scores {
        self.ledger.scores()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// The rule a round resolving right now would use.
    #[must_use]
    pub fn current_rule(&self) -> RuleSet {
        self.flips
            .as_ref()
            .map_or(RuleSet::Normal, RuleFlipScheduler::active_rule)
    }

    #[must_use]
    pub fn match_state(&self) -> MatchState {
        let scores = self.ledger.scores();
        MatchState {
            player_score: scores.player,
            opponent_score: scores.opponent,
            active: !self.ledger.is_match_over(),
            current_rule_set: self.current_rule(),
        }
    }

    /// The choice locked in for the current round.
    #[must_use]
    pub fn selection(&self) -> Option<Choice> {
        self.selection
    }

    /// Rounds resolved this session.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Every resolved round, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    /// Timers still pending on the session clock.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.clock.pending_count()
    }

    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Take all notifications produced since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle ===

    /// Open the session for play.
    ///
    /// Starts the rule-flip scheduler in the flipping variant and logs the
    /// user's stored high score. Calling it again restarts the flip cycle.
    pub fn start(&mut self) {
        self.started = true;
        // A finished match still waiting for (or stopped before) its reset
        if self.ledger.is_match_over() {
            self.cancel_pending_reset();
            self.ledger.reset();
            self.events.push(SessionEvent::MatchReset);
            self.phase = SessionPhase::Idle;
        }
        if let Some(flips) = self.flips.as_mut() {
            let event = flips.start(&mut self.clock);
            self.events.push(map_flip_event(event));
        }

        if let Some(user) = &self.user {
            match self.directory.user_record(user) {
                Ok(record) => info!("Your high score is: {}", record.score),
                Err(DirectoryError::NotFound(_)) => debug!("no stored record for {user}"),
                Err(e) => warn!("Error loading high score: {e}"),
            }
        }
    }

    /// Cancel every timer and stop accepting input.
    pub fn stop(&mut self) {
        self.cancel_round();
        self.cancel_pending_reset();
        if let Some(flips) = self.flips.as_mut() {
            flips.stop(&mut self.clock);
        }
        self.selection = None;
        self.phase = SessionPhase::Idle;
        self.started = false;
        debug!("session stopped at {}ms", self.clock.now());
    }

    // === Input ===

    /// Lock in the player's choice and start the countdown.
    ///
    /// Returns false (and does nothing) unless the session is started and
    /// `Idle`.
    pub fn submit_choice(&mut self, choice: Choice) -> bool {
        if !self.started || self.phase != SessionPhase::Idle {
            debug!("ignoring {choice}: session is {:?}", self.phase);
            return false;
        }
        self.selection = Some(choice);
        self.phase = SessionPhase::CountdownRunning;
        let ticks = self.config.countdown.ticks;
        self.round_handle = Some(self.round_timer.start(ticks, &mut self.clock));
        true
    }

    /// Withdraw the locked-in choice.
    ///
    /// If the countdown then completes, the round is aborted unscored.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Abandon the current match and start a fresh one at 0-0.
    pub fn new_match(&mut self) {
        self.cancel_round();
        self.cancel_pending_reset();
        self.selection = None;
        let mut batch = EventBatch::new();
        self.reset_match(&mut batch);
        self.events.extend(batch);
        self.phase = SessionPhase::Idle;
    }

    // === Clock ===

    /// Move virtual time forward by `ms`, dispatching every task that falls
    /// due on the way.
    pub fn advance_by(&mut self, ms: u64) {
        let target = self.clock.now().saturating_add(ms);
        while let Some(fired) = self.clock.pop_due(target) {
            let batch = self.dispatch(fired.task);
            self.events.extend(batch);
        }
        self.clock.advance_to(target);
    }

    fn dispatch(&mut self, task: SessionTask) -> EventBatch {
        let mut batch = EventBatch::new();
        match task {
            SessionTask::Round(task) => match self.round_timer.fire(task, &mut self.clock) {
                Some(RoundTimerEvent::Tick(n)) => batch.push(SessionEvent::CountdownTick(n)),
                Some(RoundTimerEvent::Complete) => {
                    self.round_handle = None;
                    self.complete_round(&mut batch);
                }
                None => {}
            },
            SessionTask::Flip(task) => {
                if let Some(event) = self
                    .flips
                    .as_mut()
                    .and_then(|flips| flips.fire(task, &mut self.clock))
                {
                    if let FlipEvent::RuleChanged(rule) = event {
                        info!("rules changed: {}", rule.banner());
                    }
                    batch.push(map_flip_event(event));
                }
            }
            SessionTask::MatchReset { generation } => {
                if generation == self.reset_generation && self.pending_reset.take().is_some() {
                    self.reset_match(&mut batch);
                    self.phase = SessionPhase::Idle;
                }
            }
        }
        batch
    }

    fn complete_round(&mut self, batch: &mut EventBatch) {
        self.phase = SessionPhase::Resolving;

        let Some(player) = self.selection.take() else {
            debug!("countdown finished with no selection, round aborted");
            batch.push(SessionEvent::RoundAborted);
            self.phase = SessionPhase::Idle;
            return;
        };

        let opponent = self.opponent.choose(&mut self.rng);
        let rule = self.current_rule();
        let outcome = resolve(player, opponent, rule);
        let report = self.ledger.apply_outcome(outcome);
        self.rounds_played += 1;

        let record = RoundRecord {
            round: self.rounds_played,
            player,
            opponent,
            rule,
            outcome,
            scores: report.scores,
            at_ms: self.clock.now(),
        };
        debug!(
            "round {}: {player} vs {opponent} under {rule} -> {outcome:?}, score {}",
            record.round, report.scores
        );
        self.history.push_back(record.clone());
        batch.push(SessionEvent::RoundResolved(record));

        let persist = match self.config.high_score {
            HighScorePolicy::EveryPlayerWin => outcome.is_winner(Side::Player),
            HighScorePolicy::MatchEnd => report.match_over,
        };
        if persist {
            if let Some(event) = self.persist_high_score(report.scores.player) {
                batch.push(event);
            }
        }

        match report.limit_reached_by {
            Some(winner) => {
                info!("match over: {winner} reached {}", self.config.score_limit);
                batch.push(SessionEvent::MatchOver {
                    winner,
                    scores: report.scores,
                });
                if let Some(flips) = self.flips.as_mut() {
                    flips.stop(&mut self.clock);
                }
                self.reset_generation += 1;
                let task = SessionTask::MatchReset {
                    generation: self.reset_generation,
                };
                let delay = self.config.post_match_delay_ms;
                self.pending_reset = Some(self.clock.schedule(delay, task));
            }
            None => self.phase = SessionPhase::Idle,
        }
    }

    /// Store `score` as the user's high score if it beats the stored one.
    ///
    /// Backend failures are logged and swallowed.
    fn persist_high_score(&mut self, score: u32) -> Option<SessionEvent> {
        let user = self.user.as_ref()?;
        let stored = match self.directory.stored_score(user) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Error updating score: {e}");
                return None;
            }
        };
        if score <= stored {
            return None;
        }
        match self.directory.write_high_score(user, score) {
            Ok(true) => {
                info!("New high score saved! {user}: {score}");
                Some(SessionEvent::HighScoreSaved(score))
            }
            Ok(false) => None,
            Err(e) => {
                error!("Error updating score: {e}");
                None
            }
        }
    }

    fn reset_match(&mut self, batch: &mut EventBatch) {
        self.ledger.reset();
        batch.push(SessionEvent::MatchReset);
        if self.started {
            if let Some(flips) = self.flips.as_mut() {
                batch.push(map_flip_event(flips.start(&mut self.clock)));
            }
        }
    }

    fn cancel_round(&mut self) {
        if let Some(handle) = self.round_handle.take() {
            self.round_timer.cancel(handle, &mut self.clock);
        }
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(id) = self.pending_reset.take() {
            self.clock.cancel(id);
        }
    }

    pub(super) fn restore_parts(
        &mut self,
        scores: Scores,
        rounds_played: u32,
        rng: GameRng,
        history: Vector<RoundRecord>,
    ) {
        let (limit, policy) = (self.config.score_limit, self.config.scoring);
        self.ledger = ScoreLedger::with_scores(limit, policy, scores);
        self.rounds_played = rounds_played;
        self.rng = rng;
        self.history = history;
    }

    pub(super) fn rng(&self) -> &GameRng {
        &self.rng
    }
}

fn map_flip_event(event: FlipEvent) -> SessionEvent {
    match event {
        FlipEvent::RuleChanged(rule) => SessionEvent::RuleChanged(rule),
        FlipEvent::NoticeExpired(rule) => SessionEvent::RuleNoticeExpired(rule),
        FlipEvent::CountdownTick(n) => SessionEvent::FlipCountdown(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::rules::ScriptedOpponent;

    fn classic() -> GameSession<MemoryDirectory> {
        let mut session = GameSession::new(GameConfig::classic(), MemoryDirectory::new()).unwrap();
        session.start();
        session
    }

    #[test]
    fn test_submit_requires_start() {
        let mut session = GameSession::new(GameConfig::classic(), MemoryDirectory::new()).unwrap();
        assert!(!session.submit_choice(Choice::Rock));
        session.start();
        assert!(session.submit_choice(Choice::Rock));
    }

    #[test]
    fn test_phase_cycle() {
        let mut session = classic().with_opponent(ScriptedOpponent::new([Choice::Rock]));
        assert!(session.submit_choice(Choice::Rock));
        assert_eq!(session.phase(), SessionPhase::CountdownRunning);

        session.advance_by(1_799);
        assert_eq!(session.phase(), SessionPhase::CountdownRunning);

        session.advance_by(1);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.rounds_played(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::classic().with_score_limit(0);
        assert!(GameSession::new(config, MemoryDirectory::new()).is_err());
    }

    #[test]
    fn test_map_flip_event() {
        assert_eq!(
            map_flip_event(FlipEvent::CountdownTick(4)),
            SessionEvent::FlipCountdown(4)
        );
        assert_eq!(
            map_flip_event(FlipEvent::NoticeExpired(RuleSet::Reversed)),
            SessionEvent::RuleNoticeExpired(RuleSet::Reversed)
        );
    }
}
