//! Blocking client with the same surface as [`SumoClient`](crate::SumoClient).

use chrono::Utc;

use crate::config::ClientConfig;
use crate::endpoint::{self, Endpoint};
use crate::error::Result;
use crate::params::{Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, RikishiQuery};
use crate::transport::{BlockingHttpTransport, BlockingTransport};
use crate::types::{
    Banzuke, Basho, KimariteMatches, KimariteStats, MeasurementsResponse, OpponentMatches,
    RanksResponse, Rikishi, RikishiList, RikishiMatches, RikishiStats, ShikonasResponse, Torikumi,
};

#[derive(Clone, Debug)]
pub struct BlockingSumoClient<T = BlockingHttpTransport> {
    transport: T,
}

impl BlockingSumoClient {
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(BlockingHttpTransport::new(config)?))
    }
}

impl<T: BlockingTransport> BlockingSumoClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn close(self) {
        tracing::debug!("closing blocking client");
    }

    fn send<M>(&self, endpoint: Endpoint<M>) -> Result<M> {
        tracing::debug!(path = %endpoint.request().path, "sending request");
        let response = self.transport.get(endpoint.request())?;
        endpoint.finish(response)
    }

    pub fn get_rikishi(&self, rikishi_id: u32) -> Result<Rikishi> {
        self.send(endpoint::rikishi(rikishi_id)?)
    }

    pub fn get_rikishi_stats(&self, rikishi_id: u32) -> Result<RikishiStats> {
        self.send(endpoint::rikishi_stats(rikishi_id)?)
    }

    pub fn get_rikishis(&self, query: &RikishiQuery) -> Result<RikishiList> {
        self.send(endpoint::rikishis(query)?)
    }

    pub fn get_rikishi_matches(
        &self,
        rikishi_id: u32,
        basho_id: Option<&str>,
    ) -> Result<RikishiMatches> {
        self.send(endpoint::rikishi_matches(rikishi_id, basho_id)?)
    }

    pub fn get_rikishi_opponent_matches(
        &self,
        rikishi_id: u32,
        opponent_id: u32,
        basho_id: Option<&str>,
    ) -> Result<OpponentMatches> {
        self.send(endpoint::rikishi_opponent_matches(
            rikishi_id,
            opponent_id,
            basho_id,
        )?)
    }

    pub fn get_basho(&self, basho_id: &str) -> Result<Basho> {
        self.send(endpoint::basho(basho_id, Utc::now().date_naive())?)
    }

    pub fn get_banzuke(&self, basho_id: &str, division: Division) -> Result<Banzuke> {
        self.send(endpoint::banzuke(basho_id, division, Utc::now().date_naive())?)
    }

    pub fn get_torikumi(&self, basho_id: &str, division: Division, day: u8) -> Result<Torikumi> {
        self.send(endpoint::torikumi(
            basho_id,
            division,
            day,
            Utc::now().date_naive(),
        )?)
    }

    pub fn get_kimarite(&self, query: &KimariteQuery) -> Result<KimariteStats> {
        self.send(endpoint::kimarite(query)?)
    }

    pub fn get_kimarite_matches(
        &self,
        kimarite: &str,
        query: &KimariteMatchesQuery,
    ) -> Result<KimariteMatches> {
        self.send(endpoint::kimarite_matches(kimarite, query)?)
    }

    pub fn get_measurements(&self, query: &HistoryQuery) -> Result<MeasurementsResponse> {
        self.send(endpoint::measurements(query)?)
    }

    pub fn get_ranks(&self, query: &HistoryQuery) -> Result<RanksResponse> {
        self.send(endpoint::ranks(query)?)
    }

    pub fn get_shikonas(&self, query: &HistoryQuery) -> Result<ShikonasResponse> {
        self.send(endpoint::shikonas(query)?)
    }
}
