//! Player roster: CRUD, per-player classification, CSV import/export.
//!
//! The roster is the collaborator that supplies `Player` values and the
//! classification map to the bracket builders; it knows nothing about
//! tournaments themselves.

use crate::models::{Classification, Player, PlayerId, TournamentError};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

/// The player roster and per-player bracket classification.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    pub players: Vec<Player>,
    /// Absent entries read as `Classification::Normal`.
    pub classification: HashMap<PlayerId, Classification>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. Names are trimmed and must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        if self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let player = Player::new(trimmed);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player and its classification entry.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.players.remove(idx);
        self.classification.remove(&id);
        Ok(())
    }

    /// Set a player's classification. `Normal` clears the map entry, so
    /// "unset" and "normal" stay indistinguishable.
    pub fn set_classification(
        &mut self,
        id: PlayerId,
        class: Classification,
    ) -> Result<(), TournamentError> {
        if !self.players.iter().any(|p| p.id == id) {
            return Err(TournamentError::PlayerNotFound(id));
        }
        if class == Classification::Normal {
            self.classification.remove(&id);
        } else {
            self.classification.insert(id, class);
        }
        Ok(())
    }

    /// A player's classification; defaults to `Normal`.
    pub fn classification_of(&self, id: PlayerId) -> Classification {
        self.classification.get(&id).copied().unwrap_or_default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Resolve a list of ids to players, failing on the first unknown id.
    pub fn players_by_ids(&self, ids: &[PlayerId]) -> Result<Vec<Player>, TournamentError> {
        ids.iter()
            .map(|&id| {
                self.player(id)
                    .cloned()
                    .ok_or(TournamentError::PlayerNotFound(id))
            })
            .collect()
    }

    /// Import player names from CSV: first column of every row, trimmed
    /// (including a leading BOM), skipping empty cells and names already on
    /// the roster. Returns the number of players added.
    pub fn import_names_csv<R: Read>(&mut self, reader: R) -> Result<usize, TournamentError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut added = 0;
        for record in rdr.records() {
            let record = record.map_err(|e| TournamentError::CsvImport(e.to_string()))?;
            let Some(cell) = record.get(0) else { continue };
            let name = cell.trim_start_matches('\u{feff}').trim();
            if name.is_empty() {
                continue;
            }
            match self.add_player(name) {
                Ok(_) => added += 1,
                Err(TournamentError::DuplicatePlayerName) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }

    /// Export the roster as CSV rows of `name,classification`.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), TournamentError> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        for p in &self.players {
            let class = match self.classification_of(p.id) {
                Classification::Seed => "seed",
                Classification::Separated => "separated",
                Classification::Normal => "normal",
            };
            wtr.write_record([p.name.as_str(), class])
                .map_err(|e| TournamentError::CsvImport(e.to_string()))?;
        }
        wtr.flush()
            .map_err(|e| TournamentError::CsvImport(e.to_string()))?;
        Ok(())
    }
}
