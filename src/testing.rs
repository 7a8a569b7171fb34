use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::endpoint::{RawResponse, Request};
use crate::error::{TransportError, TransportErrorKind};
use crate::transport::{BlockingTransport, Transport};

#[derive(Clone, Debug)]
enum Reply {
    Response(RawResponse),
    Fail(TransportErrorKind),
}

/// In-memory transport that records every request and answers each with
/// the same canned reply.
#[derive(Clone, Debug)]
pub(crate) struct StubTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl StubTransport {
    pub(crate) fn json(status: u16, body: Value) -> Self {
        Self::text(status, body.to_string())
    }

    pub(crate) fn text(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Response(RawResponse {
            status,
            body: body.into(),
        }))
    }

    pub(crate) fn failing(kind: TransportErrorKind) -> Self {
        Self::with_reply(Reply::Fail(kind))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::default(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn answer(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Fail(kind) => Err(TransportError::new(
                *kind,
                request.path.clone(),
                "stubbed failure",
            )),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.answer(request)
    }
}

impl BlockingTransport for StubTransport {
    fn get(&self, request: &Request) -> Result<RawResponse, TransportError> {
        self.answer(request)
    }
}
