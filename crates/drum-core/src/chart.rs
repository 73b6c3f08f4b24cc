//! Chart model and chart sources.
//!
//! A chart is the fixed list of `(lane, time)` pairs for one track. Chart
//! documents use the shape the game pages were authored in:
//!
//! ```json
//! { "title": "Warmup", "notes": [{ "position": "a", "time": 1.5 }] }
//! ```
//!
//! `position` is the lane letter (`a`, `s`, `d`); lane names and sensor tokens
//! are accepted too. Entries are validated and sorted by time on load.

use crate::error::ChartError;
use crate::lane::Lane;
use fnv::FnvHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartEntry {
    pub lane: Lane,
    pub time_sec: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chart {
    pub title: String,
    entries: Vec<ChartEntry>,
}

#[derive(Deserialize)]
struct ChartDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    notes: Vec<NoteDoc>,
}

#[derive(Deserialize)]
struct NoteDoc {
    position: String,
    time: f64,
}

impl Chart {
    pub fn new(title: impl Into<String>, mut entries: Vec<ChartEntry>) -> Result<Self, ChartError> {
        for (index, e) in entries.iter().enumerate() {
            if !e.time_sec.is_finite() || e.time_sec < 0.0 {
                return Err(ChartError::InvalidTime {
                    index,
                    time: e.time_sec,
                });
            }
        }
        // stable: simultaneous notes keep authoring order
        entries.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
        Ok(Self {
            title: title.into(),
            entries,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let doc: ChartDoc = serde_json::from_str(json)?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: ChartDoc) -> Result<Self, ChartError> {
        let entries = doc
            .notes
            .into_iter()
            .enumerate()
            .map(|(index, n)| {
                let lane = n
                    .position
                    .parse::<Lane>()
                    .map_err(|e| ChartError::UnknownLane { index, lane: e.0 })?;
                Ok(ChartEntry {
                    lane,
                    time_sec: n.time,
                })
            })
            .collect::<Result<Vec<_>, ChartError>>()?;
        Self::new(doc.title, entries)
    }

    #[inline]
    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time of the last note, 0 for an empty chart.
    pub fn last_note_sec(&self) -> f64 {
        self.entries.last().map(|e| e.time_sec).unwrap_or(0.0)
    }

    pub fn notes_in_lane(&self, lane: Lane) -> usize {
        self.entries.iter().filter(|e| e.lane == lane).count()
    }
}

/// Supplies the chart for a selected track.
pub trait ChartSource {
    fn chart(&self, track_id: &str) -> Option<&Chart>;
}

/// In-memory chart source keyed by track id.
#[derive(Clone, Debug, Default)]
pub struct ChartLibrary {
    charts: FnvHashMap<String, Chart>,
}

impl ChartLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "<track id>": <chart document>, ... }` map.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let docs: BTreeMap<String, ChartDoc> = serde_json::from_str(json)?;
        let mut library = Self::new();
        for (track_id, doc) in docs {
            let chart = Chart::from_doc(doc)?;
            log::debug!("[chart] loaded '{}' ({} notes)", track_id, chart.len());
            library.insert(track_id, chart);
        }
        Ok(library)
    }

    pub fn insert(&mut self, track_id: impl Into<String>, chart: Chart) -> Option<Chart> {
        self.charts.insert(track_id.into(), chart)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Track ids in sorted order.
    pub fn track_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.charts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ChartSource for ChartLibrary {
    fn chart(&self, track_id: &str) -> Option<&Chart> {
        self.charts.get(track_id)
    }
}
