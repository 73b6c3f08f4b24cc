//! One playback session: the single owner of active notes, score and hit
//! feedback.
//!
//! All three event sources (frame ticks, fired spawn timers, lane triggers)
//! go through `&mut GameSession`, so ordering is whatever order the caller
//! delivers them in. Time is passed in as a monotonic `now`.

use crate::chart::Chart;
use crate::constants::{
    FALL_STEP_PER_FRAME, HIT_FEEDBACK_DURATION, MISS_LINE_Y, SPAWN_LINE_Y, TARGET_LINE_Y,
};
use crate::feedback::FeedbackBoard;
use crate::input::LaneTrigger;
use crate::judge::{JudgeWindows, Judgment};
use crate::note::{ActiveNote, NoteId, NoteSet};
use crate::scheduler::{ManualTimer, NoteScheduler, PendingSpawn, SessionId, SpawnTimer};
use crate::score::{GameResult, ScoreAccumulator};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayfieldParams {
    pub spawn_line_y: f32,
    pub target_line_y: f32,
    pub miss_line_y: f32,
    pub fall_step: f32,
    pub windows: JudgeWindows,
    pub feedback_duration: Duration,
}

impl Default for PlayfieldParams {
    fn default() -> Self {
        Self {
            spawn_line_y: SPAWN_LINE_Y,
            target_line_y: TARGET_LINE_Y,
            miss_line_y: MISS_LINE_Y,
            fall_step: FALL_STEP_PER_FRAME,
            windows: JudgeWindows::default(),
            feedback_duration: HIT_FEEDBACK_DURATION,
        }
    }
}

impl PlayfieldParams {
    /// Frames a note needs to fall from the spawn line to the target line.
    pub fn frames_to_target(&self) -> u64 {
        ((self.target_line_y - self.spawn_line_y) / self.fall_step).ceil() as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Ended,
}

pub struct GameSession<T: SpawnTimer> {
    pub params: PlayfieldParams,
    state: SessionState,
    id: SessionId,
    scheduler: NoteScheduler<T>,
    notes: NoteSet,
    score: ScoreAccumulator,
    feedback: FeedbackBoard,
    frame: u64,
    result: Option<GameResult>,
}

impl<T: SpawnTimer> GameSession<T> {
    pub fn new(timer: T, params: PlayfieldParams) -> Self {
        let feedback = FeedbackBoard::new(params.feedback_duration);
        Self {
            params,
            state: SessionState::Idle,
            id: SessionId::default(),
            scheduler: NoteScheduler::new(timer),
            notes: NoteSet::new(),
            score: ScoreAccumulator::default(),
            feedback,
            frame: 0,
            result: None,
        }
    }

    /// Begin a fresh session. Pending spawns of any earlier session are
    /// cancelled and all state is cleared before the new chart is armed.
    pub fn start(&mut self, chart: &Chart, now: Duration) -> SessionId {
        self.clear();
        self.id = SessionId(self.id.0 + 1);
        let armed = self.scheduler.arm(chart, self.id, now);
        self.state = SessionState::Running;
        log::info!(
            "[session] #{} started: '{}' with {} notes armed",
            self.id.0,
            chart.title,
            armed
        );
        self.id
    }

    /// Deliver a fired spawn timer. Spawns from another session or arriving
    /// outside `Running` are dropped.
    pub fn spawn(&mut self, pending: PendingSpawn, now: Duration) -> Option<NoteId> {
        if self.state != SessionState::Running || pending.session != self.id {
            log::debug!(
                "[session] dropping stale spawn (session #{}, current #{}, {:?})",
                pending.session.0,
                self.id.0,
                self.state
            );
            return None;
        }
        let id = self
            .notes
            .spawn(pending.lane, self.params.spawn_line_y, self.frame);
        log::trace!(
            "[session] spawn {:?} lane={} chart#{} at {:?}",
            id,
            pending.lane,
            pending.chart_index,
            now
        );
        Some(id)
    }

    /// One display refresh: move notes, turn the ones past the miss line into
    /// misses and expire old feedback. Returns the number of misses.
    pub fn frame(&mut self, now: Duration) -> usize {
        self.feedback.expire(now);
        if self.state != SessionState::Running {
            return 0;
        }
        self.frame += 1;
        let missed = self
            .notes
            .advance(self.params.fall_step, self.params.miss_line_y);
        for note in &missed {
            self.score.record(Judgment::Bad);
            self.feedback.show(note.lane, Judgment::Bad, now);
            log::debug!("[session] miss {:?} lane={}", note.id, note.lane);
        }
        missed.len()
    }

    /// Judge the earliest-spawned active note in the triggered lane.
    ///
    /// Returns `None` when the lane is empty or its earliest note is outside
    /// every window; neither case counts as a miss.
    pub fn trigger(&mut self, trigger: LaneTrigger, now: Duration) -> Option<Judgment> {
        if self.state != SessionState::Running {
            return None;
        }
        let note = self.notes.earliest_in_lane(trigger.lane)?;
        let distance = (note.position_y - self.params.target_line_y).abs();
        let judgment = self.params.windows.judge(distance)?;
        let id = note.id;
        self.notes.hit(id, judgment)?;
        self.score.record(judgment);
        self.feedback.show(trigger.lane, judgment, now);
        log::debug!(
            "[session] {} on {} ({:?}, distance {:.1})",
            judgment,
            trigger.lane,
            trigger.source,
            distance
        );
        Some(judgment)
    }

    /// Running → Ended. Stops spawning and motion and returns the final result;
    /// only the first call after a start yields `Some`.
    pub fn end(&mut self) -> Option<GameResult> {
        if self.state != SessionState::Running {
            return None;
        }
        let cancelled = self.scheduler.cancel_all();
        self.state = SessionState::Ended;
        let result = self.score.result();
        self.result = Some(result);
        log::info!(
            "[session] #{} ended: score={} accuracy={:.2}% judged={} ({} spawns cancelled)",
            self.id.0,
            result.score,
            result.accuracy,
            result.total_notes,
            cancelled
        );
        Some(result)
    }

    /// Drop everything and return to `Idle` (view unmount).
    pub fn reset(&mut self) {
        self.clear();
        self.state = SessionState::Idle;
    }

    fn clear(&mut self) {
        self.scheduler.cancel_all();
        self.notes.clear();
        self.score = ScoreAccumulator::default();
        self.feedback.clear();
        self.frame = 0;
        self.result = None;
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn notes(&self) -> &[ActiveNote] {
        self.notes.as_slice()
    }

    #[inline]
    pub fn note_set(&self) -> &NoteSet {
        &self.notes
    }

    #[inline]
    pub fn score(&self) -> &ScoreAccumulator {
        &self.score
    }

    #[inline]
    pub fn feedback(&self) -> &FeedbackBoard {
        &self.feedback
    }

    /// Frames advanced in the current session.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Result of the last finished session, if it has not been restarted.
    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[inline]
    pub fn scheduler(&self) -> &NoteScheduler<T> {
        &self.scheduler
    }

    #[inline]
    pub fn timer_mut(&mut self) -> &mut T {
        self.scheduler.timer_mut()
    }
}

impl GameSession<ManualTimer> {
    pub fn headless(params: PlayfieldParams) -> Self {
        Self::new(ManualTimer::new(), params)
    }

    /// Fire every spawn timer due at `now` into the session. Returns how many
    /// notes were spawned.
    pub fn pump_timers(&mut self, now: Duration) -> usize {
        let fired = self.scheduler.timer_mut().advance_to(now);
        fired
            .into_iter()
            .filter_map(|p| self.spawn(p, now))
            .count()
    }
}
