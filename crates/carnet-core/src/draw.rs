//! Draw engine: random running order plus cumulative position statistics.
//!
//! The roster and its statistics live in one [`DrawData`] document. Every
//! roster change goes through [`DrawData::change_roster`], which clears the
//! statistics: position counts collected for one roster size say nothing
//! about another.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::de::null_as_default;
use crate::error::{DrawError, RosterError, ValidationError};

/// Minimum roster size for a draw.
pub const MIN_PARTICIPANTS: usize = 2;

/// How often one participant landed at each position.
///
/// Invariant: `positions.iter().sum() == total`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantStats {
    /// `positions[i]` counts draws that put the participant at position `i`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<u64>,
    /// Number of draws the participant took part in.
    #[serde(default)]
    pub total: u64,
}

impl ParticipantStats {
    /// Stats with `len` zeroed position counters.
    pub fn zeroed(len: usize) -> Self {
        Self {
            positions: vec![0; len],
            total: 0,
        }
    }

    /// Count one draw that put the participant at `position` in an order of
    /// `len` names. The counters grow (zero-filled) but never shrink, and
    /// stop counting once `total` reaches `u64::MAX`.
    pub fn record(&mut self, position: usize, len: usize) {
        let needed = len.max(position + 1);
        if self.positions.len() < needed {
            self.positions.resize(needed, 0);
        }
        // While consistent, every counter is at most `total`.
        if self.total == u64::MAX {
            return;
        }
        self.positions[position] += 1;
        self.total += 1;
    }

    /// Share of draws landing at `position`, in whole percent (rounded half up).
    pub fn percent(&self, position: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let hits = u128::from(self.positions.get(position).copied().unwrap_or(0));
        let total = u128::from(self.total);
        let percent = (200 * hits + total) / (2 * total);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }

    /// Whether the counters add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.positions
            .iter()
            .try_fold(0u64, |sum, &p| sum.checked_add(p))
            == Some(self.total)
    }
}

/// A change to the participant roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    /// Add a participant (trimmed; must be non-empty and unique ignoring case).
    Add(String),
    /// Remove a participant by exact name.
    Remove(String),
    /// Empty the roster.
    Clear,
}

/// The draw singleton: roster plus cumulative statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawData {
    #[serde(deserialize_with = "null_as_default")]
    participants: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    stats: BTreeMap<String, ParticipantStats>,
}

impl DrawData {
    /// Empty roster, no statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster by adding each name in turn.
    pub fn with_participants<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data = Self::new();
        for name in names {
            data.change_roster(RosterChange::Add(name.into()))?;
        }
        Ok(data)
    }

    /// The roster, in the order participants were added.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Statistics keyed by participant name.
    pub fn stats(&self) -> &BTreeMap<String, ParticipantStats> {
        &self.stats
    }

    /// Statistics of one participant.
    pub fn participant_stats(&self, name: &str) -> Option<&ParticipantStats> {
        self.stats.get(name)
    }

    /// Apply a roster change and clear the statistics.
    ///
    /// Returns whether the roster itself changed. Statistics are cleared on
    /// every accepted change, including a removal of an unknown name.
    pub fn change_roster(&mut self, change: RosterChange) -> Result<bool, RosterError> {
        let changed = match change {
            RosterChange::Add(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(RosterError::EmptyName);
                }
                let lower = name.to_lowercase();
                if self.participants.iter().any(|p| p.to_lowercase() == lower) {
                    return Err(RosterError::Duplicate(name.to_string()));
                }
                self.participants.push(name.to_string());
                true
            }
            RosterChange::Remove(name) => {
                let before = self.participants.len();
                self.participants.retain(|p| *p != name);
                self.participants.len() != before
            }
            RosterChange::Clear => {
                let changed = !self.participants.is_empty();
                self.participants.clear();
                changed
            }
        };
        self.stats.clear();
        Ok(changed)
    }

    /// Clear the statistics, keeping the roster.
    pub fn reset_stats(&mut self) {
        self.stats.clear();
    }

    /// Fold one draw result into the statistics.
    ///
    /// `order[i]` is the participant drawn at position `i`. Names unknown to
    /// the statistics get zeroed counters sized to the order.
    pub fn record_result(&mut self, order: &[String]) -> &BTreeMap<String, ParticipantStats> {
        let len = order.len();
        for (position, name) in order.iter().enumerate() {
            self.stats
                .entry(name.clone())
                .or_insert_with(|| ParticipantStats::zeroed(len))
                .record(position, len);
        }
        &self.stats
    }

    /// Shuffle the roster and record the result.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<String>, DrawError> {
        let order = shuffle(&self.participants, rng)?;
        self.record_result(&order);
        Ok(order)
    }

    /// Share of draws that put `name` at `position`, in whole percent.
    pub fn position_percent(&self, name: &str, position: usize) -> u32 {
        self.stats
            .get(name)
            .map(|s| s.percent(position))
            .unwrap_or(0)
    }

    /// Check the roster and statistics invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = Vec::with_capacity(self.participants.len());
        for name in &self.participants {
            if name.trim().is_empty() {
                return Err(ValidationError::InvalidDrawData(
                    "empty participant name".to_string(),
                ));
            }
            let lower = name.to_lowercase();
            if seen.contains(&lower) {
                return Err(ValidationError::InvalidDrawData(format!(
                    "participant listed twice: {name}"
                )));
            }
            seen.push(lower);
        }
        for (name, stats) in &self.stats {
            if !stats.is_consistent() {
                return Err(ValidationError::InvalidDrawData(format!(
                    "positions of {name} do not add up to its total"
                )));
            }
        }
        Ok(())
    }
}

/// Result of one draw: the running order and the statistics after folding it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawOutcome {
    pub order: Vec<String>,
    pub stats: BTreeMap<String, ParticipantStats>,
}

impl DrawOutcome {
    /// The order as numbered lines: `1. Alice\n2. Bob`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.order.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}. {}", i + 1, name);
        }
        out
    }
}

/// Uniformly random permutation (Fisher–Yates).
///
/// For `i` from `len - 1` down to `1`, swap element `i` with a uniformly
/// drawn `j` in `[0, i]`. Fewer than [`MIN_PARTICIPANTS`] items are rejected
/// before any randomness is consumed.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Result<Vec<T>, DrawError> {
    if items.len() < MIN_PARTICIPANTS {
        return Err(DrawError::NotEnoughParticipants {
            required: MIN_PARTICIPANTS,
            found: items.len(),
        });
    }

    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    Ok(shuffled)
}
