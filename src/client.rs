//! Async client.

use chrono::Utc;

use crate::config::ClientConfig;
use crate::endpoint::{self, Endpoint};
use crate::error::Result;
use crate::params::{Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, RikishiQuery};
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    Banzuke, Basho, KimariteMatches, KimariteStats, MeasurementsResponse, OpponentMatches,
    RanksResponse, Rikishi, RikishiList, RikishiMatches, RikishiStats, ShikonasResponse, Torikumi,
};

/// Async client for the Sumo API.
///
/// Calls take `&self` and may run concurrently. The underlying connection
/// pool is released when the client is dropped or [`close`](Self::close)d.
///
/// ```no_run
/// # async fn run() -> sumo_api::Result<()> {
/// let client = sumo_api::SumoClient::new()?;
/// let rikishi = client.get_rikishi(1511).await?;
/// println!("{}", rikishi.shikona_en);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SumoClient<T = HttpTransport> {
    transport: T,
}

impl SumoClient {
    /// Client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> SumoClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Releases the connection pool. Dropping the client does the same.
    pub fn close(self) {
        tracing::debug!("closing client");
    }

    async fn send<M>(&self, endpoint: Endpoint<M>) -> Result<M> {
        tracing::debug!(path = %endpoint.request().path, "sending request");
        let response = self.transport.get(endpoint.request()).await?;
        endpoint.finish(response)
    }

    pub async fn get_rikishi(&self, rikishi_id: u32) -> Result<Rikishi> {
        self.send(endpoint::rikishi(rikishi_id)?).await
    }

    pub async fn get_rikishi_stats(&self, rikishi_id: u32) -> Result<RikishiStats> {
        self.send(endpoint::rikishi_stats(rikishi_id)?).await
    }

    pub async fn get_rikishis(&self, query: &RikishiQuery) -> Result<RikishiList> {
        self.send(endpoint::rikishis(query)?).await
    }

    /// All bouts of a rikishi, optionally limited to one basho.
    pub async fn get_rikishi_matches(
        &self,
        rikishi_id: u32,
        basho_id: Option<&str>,
    ) -> Result<RikishiMatches> {
        self.send(endpoint::rikishi_matches(rikishi_id, basho_id)?)
            .await
    }

    pub async fn get_rikishi_opponent_matches(
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
        .await
    }

    pub async fn get_basho(&self, basho_id: &str) -> Result<Basho> {
        self.send(endpoint::basho(basho_id, Utc::now().date_naive())?)
            .await
    }

    pub async fn get_banzuke(&self, basho_id: &str, division: Division) -> Result<Banzuke> {
        self.send(endpoint::banzuke(basho_id, division, Utc::now().date_naive())?)
            .await
    }

    pub async fn get_torikumi(
        &self,
        basho_id: &str,
        division: Division,
        day: u8,
    ) -> Result<Torikumi> {
        self.send(endpoint::torikumi(
            basho_id,
            division,
            day,
            Utc::now().date_naive(),
        )?)
        .await
    }

    pub async fn get_kimarite(&self, query: &KimariteQuery) -> Result<KimariteStats> {
        self.send(endpoint::kimarite(query)?).await
    }

    pub async fn get_kimarite_matches(
        &self,
        kimarite: &str,
        query: &KimariteMatchesQuery,
    ) -> Result<KimariteMatches> {
        self.send(endpoint::kimarite_matches(kimarite, query)?)
            .await
    }

    pub async fn get_measurements(&self, query: &HistoryQuery) -> Result<MeasurementsResponse> {
        self.send(endpoint::measurements(query)?).await
    }

    pub async fn get_ranks(&self, query: &HistoryQuery) -> Result<RanksResponse> {
        self.send(endpoint::ranks(query)?).await
    }

    pub async fn get_shikonas(&self, query: &HistoryQuery) -> Result<ShikonasResponse> {
        self.send(endpoint::shikonas(query)?).await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::error::{Error, TransportErrorKind};
    use crate::testing::StubTransport;
    use crate::types::Winner;

    use super::*;

    fn client(stub: &StubTransport) -> SumoClient<StubTransport> {
        SumoClient::with_transport(stub.clone())
    }

    fn bout(winner_id: u32) -> serde_json::Value {
        json!({
            "bashoId": "202401",
            "day": 1,
            "eastId": 1,
            "eastShikona": "Test Rikishi",
            "eastRank": "M1e",
            "westId": 2,
            "westShikona": "Test Opponent",
            "westRank": "M1w",
            "kimarite": "",
            "winnerId": winner_id,
            "winnerEn": "",
            "winnerJp": ""
        })
    }

    #[tokio::test]
    async fn test_get_rikishi() {
        let stub = StubTransport::json(200, json!({ "rikishiId": 1511, "shikonaEn": "Terunofuji" }));
        let rikishi = client(&stub).get_rikishi(1511).await.unwrap();

        assert_eq!(rikishi.id, 1511);
        assert_eq!(rikishi.shikona_en, "Terunofuji");
        assert_eq!(stub.requests()[0].path, "rikishi/1511");
    }

    #[tokio::test]
    async fn test_invalid_arguments_send_nothing() {
        let stub = StubTransport::json(200, json!({}));
        let client = client(&stub);

        let results = [
            client.get_rikishi(0).await.map(drop),
            client.get_basho("2023-05").await.map(drop),
            client.get_basho("299901").await.map(drop),
            client.get_torikumi("202301", Division::Makuuchi, 0).await.map(drop),
            client
                .get_rikishis(&RikishiQuery {
                    limit: Some(0),
                    ..Default::default()
                })
                .await
                .map(drop),
            client
                .get_kimarite_matches("", &KimariteMatchesQuery::default())
                .await
                .map(drop),
            client
                .get_measurements(&HistoryQuery::default())
                .await
                .map(drop),
        ];

        for result in results {
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "{result:?}");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_status_errors() {
        let stub = StubTransport::text(404, "Not Found");
        let err = client(&stub).get_rikishi(999999).await.unwrap_err();
        assert!(err.is_not_found());

        let stub = StubTransport::text(500, "Internal Server Error");
        let err = client(&stub).get_rikishi_stats(1).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_transport_errors() {
        let stub = StubTransport::failing(TransportErrorKind::Connect);
        let err = client(&stub).get_rikishi(1).await.unwrap_err();
        match err {
            Error::Transport(e) => assert_eq!(e.kind(), TransportErrorKind::Connect),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let stub = StubTransport::json(200, json!({ "shikonaEn": "Terunofuji" }));
        let err = client(&stub).get_rikishi(1511).await.unwrap_err();
        match err {
            Error::Validation(e) => assert_eq!(e.field.as_deref(), Some("id")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pending_bout_in_match_list() {
        let mut undecided = bout(0);
        undecided.as_object_mut().unwrap().remove("winnerId");
        let stub = StubTransport::json(
            200,
            json!({ "limit": 10, "skip": 0, "total": 3, "records": [bout(1), bout(0), undecided] }),
        );
        let matches = client(&stub)
            .get_rikishi_matches(1, Some("202401"))
            .await
            .unwrap();

        assert_eq!(matches.records[0].winner(), Winner::East(1));
        assert_eq!(matches.records[1].winner(), Winner::Pending);
        assert_eq!(matches.records[1].kimarite, None);
        assert_eq!(matches.records[2].winner(), Winner::Pending);
        assert_eq!(matches.records[2].winner_id, None);
        assert_eq!(
            stub.requests()[0].query,
            vec![("bashoId", "202401".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let stub = StubTransport::json(200, json!([]));
        let client = client(&stub);

        let by_rikishi = HistoryQuery::for_rikishi(1);
        let by_basho = HistoryQuery::for_basho("202401");
        let (measurements, ranks, shikonas) = tokio::join!(
            client.get_measurements(&by_rikishi),
            client.get_ranks(&by_rikishi),
            client.get_shikonas(&by_basho),
        );

        assert!(measurements.unwrap().is_empty());
        assert!(ranks.unwrap().is_empty());
        assert!(shikonas.unwrap().is_empty());
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn test_matches_blocking_client() {
        let body = json!({ "id": 1511, "shikonaEn": "Terunofuji", "heya": "Isegahama" });
        let asynchronous = client(&StubTransport::json(200, body.clone()))
            .get_rikishi(1511)
            .await
            .unwrap();
        let blocking = crate::BlockingSumoClient::with_transport(StubTransport::json(200, body))
            .get_rikishi(1511)
            .unwrap();
        assert_eq!(asynchronous, blocking);
    }
}
