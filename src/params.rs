//! Identifiers and query parameters accepted by the client.
//!
//! Everything here is checked locally so that a malformed argument fails with
//! [`InvalidArgument`] before a request is sent.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;

pub const MAX_LIMIT: u32 = 1000;
pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 15;

/// A tournament id in `YYYYMM` form, e.g. `202305`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BashoId(String);

impl BashoId {
    pub fn parse(raw: &str) -> Result<Self, InvalidArgument> {
        let invalid = || InvalidArgument::new("basho_id", format!("{raw:?} must be in YYYYMM format"));

        if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = raw[4..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn month(&self) -> u32 {
        self.0[4..].parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rejects tournaments that start after the month containing `today`.
    pub fn ensure_not_future(&self, today: NaiveDate) -> Result<(), InvalidArgument> {
        if (self.year(), self.month()) > (today.year(), today.month()) {
            return Err(InvalidArgument::new(
                "basho_id",
                format!("{} is in the future", self.0),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for BashoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BashoId {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BashoId {
    type Error = InvalidArgument;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BashoId> for String {
    fn from(id: BashoId) -> Self {
        id.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    Makuuchi,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
}

impl Division {
    pub const ALL: [Division; 6] = [
        Division::Makuuchi,
        Division::Juryo,
        Division::Makushita,
        Division::Sandanme,
        Division::Jonidan,
        Division::Jonokuchi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Division::Makuuchi => "Makuuchi",
            Division::Juryo => "Juryo",
            Division::Makushita => "Makushita",
            Division::Sandanme => "Sandanme",
            Division::Jonidan => "Jonidan",
            Division::Jonokuchi => "Jonokuchi",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidArgument::new("division", format!("unknown division {s:?}")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(InvalidArgument::new(
                "sort_order",
                format!("{s:?} must be either 'asc' or 'desc'"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KimariteSortField {
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "kimarite")]
    Kimarite,
    #[serde(rename = "lastUsage")]
    LastUsage,
}

impl KimariteSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            KimariteSortField::Count => "count",
            KimariteSortField::Kimarite => "kimarite",
            KimariteSortField::LastUsage => "lastUsage",
        }
    }
}

impl FromStr for KimariteSortField {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "count" => Ok(KimariteSortField::Count),
            "kimarite" => Ok(KimariteSortField::Kimarite),
            "lastUsage" | "last-usage" | "last_usage" => Ok(KimariteSortField::LastUsage),
            _ => Err(InvalidArgument::new(
                "sort_field",
                format!("{s:?} must be one of: count, kimarite, lastUsage"),
            )),
        }
    }
}

/// Filters for the `rikishis` listing. `None` fields are left out of the
/// request so the API applies its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RikishiQuery {
    pub shikona_en: Option<String>,
    pub heya: Option<String>,
    pub sumodb_id: Option<u32>,
    pub nsk_id: Option<u32>,
    /// `true` includes retired rikishi.
    pub intai: Option<bool>,
    pub measurements: Option<bool>,
    pub ranks: Option<bool>,
    pub shikonas: Option<bool>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KimariteQuery {
    pub sort_field: Option<KimariteSortField>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KimariteMatchesQuery {
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

/// Filters shared by the measurements, ranks and shikonas endpoints.
/// At least one of `basho_id` and `rikishi_id` is required. Results are
/// sorted by basho id in `sort_order`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryQuery {
    pub basho_id: Option<String>,
    pub rikishi_id: Option<u32>,
    pub sort_order: SortOrder,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            basho_id: None,
            rikishi_id: None,
            sort_order: SortOrder::Desc,
        }
    }
}

impl HistoryQuery {
    pub fn for_rikishi(rikishi_id: u32) -> Self {
        Self {
            rikishi_id: Some(rikishi_id),
            ..Self::default()
        }
    }

    pub fn for_basho(basho_id: impl Into<String>) -> Self {
        Self {
            basho_id: Some(basho_id.into()),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }
}

pub(crate) fn rikishi_id(param: &'static str, id: u32) -> Result<u32, InvalidArgument> {
    if id == 0 {
        return Err(InvalidArgument::new(param, "must be a positive integer"));
    }
    Ok(id)
}

pub(crate) fn day(day: u8) -> Result<u8, InvalidArgument> {
    if !(FIRST_DAY..=LAST_DAY).contains(&day) {
        return Err(InvalidArgument::new(
            "day",
            format!("{day} must be between {FIRST_DAY} and {LAST_DAY}"),
        ));
    }
    Ok(day)
}

/// `limit` must be positive and, when `max` is given, no larger than it.
pub(crate) fn limit(limit: Option<u32>, max: Option<u32>) -> Result<Option<u32>, InvalidArgument> {
    match (limit, max) {
        (Some(0), _) => Err(InvalidArgument::new("limit", "must be a positive integer")),
        (Some(l), Some(max)) if l > max => {
            Err(InvalidArgument::new("limit", format!("{l} exceeds {max}")))
        }
        _ => Ok(limit),
    }
}
