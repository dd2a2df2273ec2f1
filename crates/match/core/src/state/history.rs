//! Ledger of finalized sets.
//!
//! Records are appended once per finalized set. The most recent entries may
//! be corrected afterwards; aggregate bookkeeping (`setsWon`, completion) is
//! the engine's job and happens alongside every [`SetHistory::edit`].

use super::Side;

/// Outcome of one set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Winner {
    Home,
    Away,
    Tie,
}

impl Winner {
    /// Strict score comparison; equal scores are a tie.
    pub fn from_scores(home_score: u32, away_score: u32) -> Self {
        match home_score.cmp(&away_score) {
            core::cmp::Ordering::Greater => Winner::Home,
            core::cmp::Ordering::Less => Winner::Away,
            core::cmp::Ordering::Equal => Winner::Tie,
        }
    }

    pub const fn side(self) -> Option<Side> {
        match self {
            Winner::Home => Some(Side::Home),
            Winner::Away => Some(Side::Away),
            Winner::Tie => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SetRecord {
    pub set_number: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: Winner,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SetHistory {
    records: Vec<SetRecord>,
}

impl SetHistory {
    pub fn append(&mut self, record: SetRecord) {
        self.records.push(record);
    }

    /// Replaces scores and winner of the record at `index`, keeping its set
    /// number. Returns the record as it was before the edit, or `None` when
    /// `index` is out of range (nothing changes).
    pub fn edit(
        &mut self,
        index: usize,
        home_score: u32,
        away_score: u32,
        winner: Winner,
    ) -> Option<SetRecord> {
        let record = self.records.get_mut(index)?;
        let previous = *record;
        *record = SetRecord {
            set_number: previous.set_number,
            home_score,
            away_score,
            winner,
        };
        Some(previous)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SetRecord> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&SetRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SetRecord> {
        self.records.iter()
    }

    /// Number of records with the given winner.
    pub fn count(&self, winner: Winner) -> u32 {
        self.records.iter().filter(|r| r.winner == winner).count() as u32
    }
}

impl<'a> IntoIterator for &'a SetHistory {
    type Item = &'a SetRecord;
    type IntoIter = core::slice::Iter<'a, SetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
