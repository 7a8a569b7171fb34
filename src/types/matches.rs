use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr, NoneAsEmptyString, PickFirst};

use crate::error::ValidationError;
use crate::params::{BashoId, Division, FIRST_DAY, LAST_DAY};
use crate::types::{check_page, FromJson};

/// A single bout, as returned by torikumi, kimarite and rikishi match
/// listings.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Option<String>,
    pub basho_id: BashoId,
    pub division: Option<Division>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub day: u8,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub match_no: Option<u32>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub east_id: u32,
    pub east_shikona: String,
    pub east_rank: Option<String>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub west_id: u32,
    pub west_shikona: String,
    pub west_rank: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub kimarite: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub winner_id: Option<u32>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub winner_en: Option<String>,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub winner_jp: Option<String>,
}

/// Outcome of a bout. Unfought or unrecorded bouts are `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Winner {
    East(u32),
    West(u32),
    Pending,
}

impl Match {
    /// The API reports an undecided bout either by omitting `winnerId` or
    /// by sending `0`.
    pub fn winner(&self) -> Winner {
        match self.winner_id {
            Some(id) if id != 0 && id == self.east_id => Winner::East(id),
            Some(id) if id != 0 && id == self.west_id => Winner::West(id),
            _ => Winner::Pending,
        }
    }

    pub fn involves(&self, rikishi_id: u32) -> bool {
        self.east_id == rikishi_id || self.west_id == rikishi_id
    }
}

impl FromJson for Match {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(FIRST_DAY..=LAST_DAY).contains(&self.day) {
            return Err(ValidationError::new(
                "Match",
                "day",
                format!("{} is outside {FIRST_DAY}..={LAST_DAY}", self.day),
            ));
        }
        match self.winner_id {
            Some(id) if id != 0 && !self.involves(id) => Err(ValidationError::new(
                "Match",
                "winnerId",
                format!(
                    "{id} is neither east ({}) nor west ({})",
                    self.east_id, self.west_id
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// `rikishi/{id}/matches`.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RikishiMatches {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub total: u32,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub records: Vec<Match>,
}

impl FromJson for RikishiMatches {
    fn validate(&self) -> Result<(), ValidationError> {
        check_page("RikishiMatches", self.limit, self.records.len())?;
        self.records.iter().try_for_each(|m| m.validate())
    }
}

/// Head-to-head record from `rikishi/{id}/matches/{opponent}`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentMatches {
    pub total: u32,
    pub rikishi_wins: u32,
    pub opponent_wins: u32,
    #[serde(default)]
    pub kimarite_wins: BTreeMap<String, u32>,
    #[serde(default)]
    pub kimarite_losses: BTreeMap<String, u32>,
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub matches: Vec<Match>,
}

impl FromJson for OpponentMatches {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.matches.len() > self.total as usize {
            return Err(ValidationError::new(
                "OpponentMatches",
                "matches",
                format!("{} matches exceed total {}", self.matches.len(), self.total),
            ));
        }
        self.matches.iter().try_for_each(|m| m.validate())
    }
}
