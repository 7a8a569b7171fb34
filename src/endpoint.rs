//! Transport-independent description of every API call.
//!
//! An [`Endpoint`] pairs the request to send with the code that turns the raw
//! response into a model. The async and blocking clients share these
//! builders, so argument checks and response handling are identical in both.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, InvalidArgument, ValidationError};
use crate::params::{
    self, BashoId, Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, RikishiQuery,
    SortOrder, MAX_LIMIT,
};
use crate::types::{
    model_name, Banzuke, Basho, FromJson, HistoryRecord, KimariteMatches, KimariteStats,
    MeasurementsResponse, OpponentMatches, RanksResponse, Rikishi, RikishiList, RikishiMatches,
    RikishiStats, ShikonasResponse, Torikumi,
};

/// A GET request relative to the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Request {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Adds `key=value` unless `value` is `None`.
    fn param(mut self, key: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((key, value.to_string()));
        }
        self
    }

    /// Appends the path segments to `base`, percent-encoding each one, and
    /// then the query.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(self.path.split('/'));
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

type Decode<M> = Box<dyn FnOnce(Value) -> Result<M, ValidationError> + Send>;

pub struct Endpoint<M> {
    request: Request,
    model: Cow<'static, str>,
    decode: Decode<M>,
}

impl<M: FromJson + 'static> Endpoint<M> {
    fn new(request: Request) -> Self {
        Self {
            request,
            model: model_name::<M>(),
            decode: Box::new(M::from_json),
        }
    }

    /// Rewrites the raw JSON before it is decoded.
    fn prepare(self, hook: impl FnOnce(&mut Value) + Send + 'static) -> Self {
        let decode = self.decode;
        Self {
            decode: Box::new(move |mut value| {
                hook(&mut value);
                decode(value)
            }),
            ..self
        }
    }

    /// Transforms the decoded model.
    fn then(self, f: impl FnOnce(M) -> M + Send + 'static) -> Self {
        let decode = self.decode;
        Self {
            decode: Box::new(move |value| decode(value).map(f)),
            ..self
        }
    }
}

impl<M> Endpoint<M> {
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Maps the response status and decodes the body.
    pub fn finish(self, response: RawResponse) -> Result<M, Error> {
        let Self {
            request,
            model,
            decode,
        } = self;

        match response.status {
            200..=299 => {}
            404 => {
                tracing::warn!(path = %request.path, "resource not found");
                return Err(Error::NotFound {
                    path: request.path,
                    body: response.body,
                });
            }
            status => {
                tracing::warn!(path = %request.path, status, "request failed");
                return Err(Error::Http {
                    status,
                    path: request.path,
                    body: response.body,
                });
            }
        }

        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| ValidationError::malformed(model, &e))?;
        decode(value).map_err(|e| {
            tracing::warn!(path = %request.path, error = %e, "response failed validation");
            Error::from(e)
        })
    }
}

fn basho_id(raw: &str) -> Result<BashoId, InvalidArgument> {
    BashoId::parse(raw.trim())
}

fn current_basho_id(raw: &str, today: NaiveDate) -> Result<BashoId, InvalidArgument> {
    let id = basho_id(raw)?;
    id.ensure_not_future(today)?;
    Ok(id)
}

pub fn rikishi(id: u32) -> Result<Endpoint<Rikishi>, InvalidArgument> {
    let id = params::rikishi_id("rikishi_id", id)?;
    Ok(Endpoint::new(Request::new(format!("rikishi/{id}"))))
}

pub fn rikishi_stats(id: u32) -> Result<Endpoint<RikishiStats>, InvalidArgument> {
    let id = params::rikishi_id("rikishi_id", id)?;
    Ok(Endpoint::new(Request::new(format!("rikishi/{id}/stats"))))
}

pub fn rikishis(query: &RikishiQuery) -> Result<Endpoint<RikishiList>, InvalidArgument> {
    let limit = params::limit(query.limit, Some(MAX_LIMIT))?;
    let request = Request::new("rikishis")
        .param("shikonaEn", query.shikona_en.as_deref().map(str::trim))
        .param("heya", query.heya.as_deref().map(str::trim))
        .param("sumodbId", query.sumodb_id)
        .param("nskId", query.nsk_id)
        .param("intai", query.intai)
        .param("measurements", query.measurements)
        .param("ranks", query.ranks)
        .param("shikonas", query.shikonas)
        .param("limit", limit)
        .param("skip", query.skip);
    Ok(Endpoint::new(request))
}

pub fn rikishi_matches(
    id: u32,
    basho: Option<&str>,
) -> Result<Endpoint<RikishiMatches>, InvalidArgument> {
    let id = params::rikishi_id("rikishi_id", id)?;
    let basho = basho.map(basho_id).transpose()?;
    let request = Request::new(format!("rikishi/{id}/matches")).param("bashoId", basho);
    Ok(Endpoint::new(request))
}

pub fn rikishi_opponent_matches(
    id: u32,
    opponent_id: u32,
    basho: Option<&str>,
) -> Result<Endpoint<OpponentMatches>, InvalidArgument> {
    let id = params::rikishi_id("rikishi_id", id)?;
    let opponent_id = params::rikishi_id("opponent_id", opponent_id)?;
    let basho = basho.map(basho_id).transpose()?;
    let request =
        Request::new(format!("rikishi/{id}/matches/{opponent_id}")).param("bashoId", basho);
    Ok(Endpoint::new(request))
}

pub fn basho(basho: &str, today: NaiveDate) -> Result<Endpoint<Basho>, InvalidArgument> {
    let basho = current_basho_id(basho, today)?;
    Ok(Endpoint::new(Request::new(format!("basho/{basho}"))))
}

pub fn banzuke(
    basho: &str,
    division: Division,
    today: NaiveDate,
) -> Result<Endpoint<Banzuke>, InvalidArgument> {
    let basho = current_basho_id(basho, today)?;
    let request = Request::new(format!("basho/{basho}/banzuke/{division}"));
    Ok(Endpoint::new(request).prepare(move |value| {
        if let Some(obj) = value.as_object_mut() {
            fill_banzuke(obj, &basho, division);
        }
    }))
}

/// Banzuke entries only say which side they are on by the list they appear
/// in, and some responses leave out the basho and division.
fn fill_banzuke(obj: &mut Map<String, Value>, basho: &BashoId, division: Division) {
    obj.entry("bashoId")
        .or_insert_with(|| Value::from(basho.as_str()));
    obj.entry("division")
        .or_insert_with(|| Value::from(division.as_str()));

    for (key, side) in [("east", "East"), ("west", "West")] {
        let Some(Value::Array(entries)) = obj.get_mut(key) else {
            continue;
        };
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            entry
                .entry("side")
                .or_insert_with(|| Value::from(side));
        }
    }
}

pub fn torikumi(
    basho: &str,
    division: Division,
    day: u8,
    today: NaiveDate,
) -> Result<Endpoint<Torikumi>, InvalidArgument> {
    let basho = current_basho_id(basho, today)?;
    let day = params::day(day)?;
    let request = Request::new(format!("basho/{basho}/torikumi/{division}/{day}"));
    Ok(Endpoint::new(request).prepare(move |value| {
        if let Some(obj) = value.as_object_mut() {
            fill_torikumi(obj, &basho, division, day);
        }
    }))
}

/// The torikumi payload is keyed by `date` and does not repeat the division
/// or day that were requested.
fn fill_torikumi(obj: &mut Map<String, Value>, basho: &BashoId, division: Division, day: u8) {
    obj.insert("division".into(), Value::from(division.as_str()));
    obj.insert("day".into(), Value::from(day));
    if !obj.contains_key("bashoId") {
        let id = obj
            .remove("date")
            .unwrap_or_else(|| Value::from(basho.as_str()));
        obj.insert("bashoId".into(), id);
    }
}

pub fn kimarite(query: &KimariteQuery) -> Result<Endpoint<KimariteStats>, InvalidArgument> {
    let limit = params::limit(query.limit, None)?;
    let request = Request::new("kimarite")
        .param("sortField", query.sort_field.map(|f| f.as_str()))
        .param("sortOrder", query.sort_order.map(|o| o.as_str()))
        .param("limit", limit)
        .param("skip", query.skip);
    Ok(Endpoint::new(request))
}

pub fn kimarite_matches(
    name: &str,
    query: &KimariteMatchesQuery,
) -> Result<Endpoint<KimariteMatches>, InvalidArgument> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InvalidArgument::new("kimarite", "must not be empty"));
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(InvalidArgument::new(
            "kimarite",
            format!("{name:?} is not a single path segment"),
        ));
    }
    let limit = params::limit(query.limit, Some(MAX_LIMIT))?;
    let request = Request::new(format!("kimarite/{name}"))
        .param("sortOrder", query.sort_order.map(|o| o.as_str()))
        .param("limit", limit)
        .param("skip", query.skip);
    Ok(Endpoint::new(request))
}

pub fn measurements(query: &HistoryQuery) -> Result<Endpoint<MeasurementsResponse>, InvalidArgument> {
    history("measurements", query)
}

pub fn ranks(query: &HistoryQuery) -> Result<Endpoint<RanksResponse>, InvalidArgument> {
    history("ranks", query)
}

pub fn shikonas(query: &HistoryQuery) -> Result<Endpoint<ShikonasResponse>, InvalidArgument> {
    history("shikonas", query)
}

fn history<T>(path: &str, query: &HistoryQuery) -> Result<Endpoint<Vec<T>>, InvalidArgument>
where
    T: FromJson + HistoryRecord + Send + 'static,
{
    if query.basho_id.is_none() && query.rikishi_id.is_none() {
        return Err(InvalidArgument::new(
            "query",
            "either basho_id or rikishi_id must be provided",
        ));
    }
    let basho = query.basho_id.as_deref().map(basho_id).transpose()?;
    let rikishi = query
        .rikishi_id
        .map(|id| params::rikishi_id("rikishi_id", id))
        .transpose()?;

    let request = Request::new(path)
        .param("bashoId", basho)
        .param("rikishiId", rikishi);
    let order = query.sort_order;
    Ok(Endpoint::<Vec<T>>::new(request).then(move |mut records| {
        sort_by_basho(records.as_mut_slice(), order);
        records
    }))
}

fn sort_by_basho<T: HistoryRecord>(records: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Asc => records.sort_by(|a, b| a.basho_id().cmp(b.basho_id())),
        SortOrder::Desc => records.sort_by(|a, b| b.basho_id().cmp(a.basho_id())),
    }
}
