//! Ordered sponsor roster shown on the displays.
//!
//! `order` is always the dense 0-based position of each sponsor, so every
//! mutation ends by renumbering.

use crate::config::MatchConfig;

/// Opaque sponsor identifier.
///
/// Allocated sequentially by the roster and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SponsorId(pub u32);

impl core::fmt::Display for SponsorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sponsor#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Sponsor {
    pub id: SponsorId,
    pub name: String,
    /// Reference to the logo file, relative to the logo store root.
    pub logo_path: String,
    pub order: u32,
    pub white_background: bool,
}

/// Fields to change on a sponsor; `None` leaves the field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SponsorPatch {
    pub name: Option<String>,
    pub logo_path: Option<String>,
    pub white_background: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Roster {
    sponsors: Vec<Sponsor>,
    label: String,
    next_id: u32,
}

impl Roster {
    pub fn sponsors(&self) -> &[Sponsor] {
        &self.sponsors
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get(&self, id: SponsorId) -> Option<&Sponsor> {
        self.sponsors.iter().find(|s| s.id == id)
    }

    /// Appends a sponsor at the end of the roster.
    pub fn add(&mut self, name: impl Into<String>, logo_path: impl Into<String>) -> SponsorId {
        let id = SponsorId(self.next_id);
        self.next_id += 1;

        self.sponsors.push(Sponsor {
            id,
            name: name.into(),
            logo_path: logo_path.into(),
            order: self.sponsors.len() as u32,
            white_background: false,
        });
        id
    }

    /// Removes a sponsor and closes the gap it leaves in `order`.
    pub fn remove(&mut self, id: SponsorId) -> Option<Sponsor> {
        let index = self.sponsors.iter().position(|s| s.id == id)?;
        let removed = self.sponsors.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Applies the provided fields. Returns false for an unknown id.
    pub fn update(&mut self, id: SponsorId, patch: SponsorPatch) -> bool {
        let Some(sponsor) = self.sponsors.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            sponsor.name = name;
        }
        if let Some(logo_path) = patch.logo_path {
            sponsor.logo_path = logo_path;
        }
        if let Some(white_background) = patch.white_background {
            sponsor.white_background = white_background;
        }
        true
    }

    /// Rebuilds the roster in the order of `ids`.
    ///
    /// Unknown ids are dropped, repeated ids are taken once, and sponsors not
    /// listed are removed.
    pub fn reorder(&mut self, ids: &[SponsorId]) {
        let mut remaining = std::mem::take(&mut self.sponsors);
        for id in ids {
            if let Some(index) = remaining.iter().position(|s| s.id == *id) {
                self.sponsors.push(remaining.swap_remove(index));
            }
        }
        self.renumber();
    }

    /// Sets the roster heading; blank labels fall back to the default.
    pub fn set_label(&mut self, label: Option<&str>) {
        self.label = match label.map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => MatchConfig::DEFAULT_SPONSOR_LABEL.to_string(),
        };
    }

    fn renumber(&mut self) {
        for (order, sponsor) in self.sponsors.iter_mut().enumerate() {
            sponsor.order = order as u32;
        }
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            sponsors: Vec::new(),
            label: MatchConfig::DEFAULT_SPONSOR_LABEL.to_string(),
            next_id: 1,
        }
    }
}
