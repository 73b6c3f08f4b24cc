//! Live notes and the per-session set that owns them.
//!
//! Each note carries an explicit state. A note leaves `Active` exactly once,
//! either by being hit or by falling past the miss line, and is removed from
//! the set in the same step.

use crate::judge::Judgment;
use crate::lane::Lane;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteState {
    Active,
    Hit(Judgment),
    Missed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveNote {
    pub id: NoteId,
    pub lane: Lane,
    pub position_y: f32,
    pub spawned_at_frame: u64,
    state: NoteState,
}

impl ActiveNote {
    #[inline]
    pub fn state(&self) -> NoteState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == NoteState::Active
    }

    /// Move out of `Active`. Returns false if the note was already resolved.
    fn resolve(&mut self, outcome: NoteState) -> bool {
        if self.state != NoteState::Active || outcome == NoteState::Active {
            return false;
        }
        self.state = outcome;
        true
    }
}

/// Notes resolved in one step; usually zero or one per lane.
pub type ResolvedNotes = SmallVec<[ActiveNote; 4]>;

/// Active notes in spawn order.
#[derive(Clone, Debug, Default)]
pub struct NoteSet {
    notes: Vec<ActiveNote>,
    next_id: u64,
    spawned: u64,
    resolved: u64,
}

impl NoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, lane: Lane, position_y: f32, frame: u64) -> NoteId {
        let id = NoteId(self.next_id);
        self.next_id += 1;
        self.spawned += 1;
        self.notes.push(ActiveNote {
            id,
            lane,
            position_y,
            spawned_at_frame: frame,
            state: NoteState::Active,
        });
        id
    }

    /// Advance every note by `step`, then pull out the ones below `miss_line_y`.
    pub fn advance(&mut self, step: f32, miss_line_y: f32) -> ResolvedNotes {
        for n in &mut self.notes {
            n.position_y += step;
        }
        let mut missed = ResolvedNotes::new();
        let mut i = 0;
        while i < self.notes.len() {
            if self.notes[i].position_y > miss_line_y {
                let mut note = self.notes.remove(i);
                if note.resolve(NoteState::Missed) {
                    self.resolved += 1;
                    missed.push(note);
                }
            } else {
                i += 1;
            }
        }
        missed
    }

    /// Earliest-spawned active note in `lane`.
    pub fn earliest_in_lane(&self, lane: Lane) -> Option<&ActiveNote> {
        self.notes.iter().find(|n| n.lane == lane && n.is_active())
    }

    /// Resolve `id` as hit and remove it from the set.
    pub fn hit(&mut self, id: NoteId, judgment: Judgment) -> Option<ActiveNote> {
        let idx = self.notes.iter().position(|n| n.id == id)?;
        let mut note = self.notes.remove(idx);
        if note.resolve(NoteState::Hit(judgment)) {
            self.resolved += 1;
            Some(note)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.spawned = 0;
        self.resolved = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[ActiveNote] {
        &self.notes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes spawned since the last clear.
    pub fn spawned_count(&self) -> u64 {
        self.spawned
    }

    /// Notes that left the set (hit or missed) since the last clear.
    pub fn resolved_count(&self) -> u64 {
        self.resolved
    }
}
