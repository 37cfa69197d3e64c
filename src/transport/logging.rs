// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for Alloy RPC providers.
//!
//! Each JSON-RPC request runs inside an `rpc_call` span that records the
//! method and how long the node took to answer. Contract reads show up as
//! `eth_call`, writes as `eth_sendRawTransaction` followed by receipt polling.

use std::{
    borrow::Cow,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

/// A Tower layer that adds logging/tracing to RPC requests.
///
/// # Example
///
/// ```rust,ignore
/// use assetledger::transport::LoggingLayer;
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(LoggingLayer::new().with_payloads())
///     .http(rpc_url);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoggingLayer {
    payloads: bool,
}

impl LoggingLayer {
    /// Creates a layer that logs methods, timing and errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log request and response payloads at TRACE level.
    ///
    /// Payloads include signed transactions and can be large.
    pub fn with_payloads(mut self) -> Self {
        self.payloads = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            payloads: self.payloads,
        }
    }
}

/// A Tower service that logs RPC requests and responses.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    payloads: bool,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let payloads = self.payloads;
        let method = describe(&request).into_owned();
        let span = tracing::debug_span!(
            "rpc_call",
            method = %method,
            duration_ms = tracing::field::Empty,
        );

        if payloads {
            trace!(parent: &span, request = ?request, "RPC request");
        }

        // Call the inner service now so its readiness is consumed by this request
        let response = self.service.call(request);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = response.await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                tracing::Span::current().record("duration_ms", elapsed_ms);

                match &result {
                    Ok(response) if payloads => {
                        trace!(response = ?response, "RPC response: {method}");
                    }
                    Ok(_) => debug!("RPC response: {method}"),
                    Err(e) => warn!(error = %e, "RPC error: {method}"),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Human-readable name of a request packet.
fn describe(request: &RequestPacket) -> Cow<'_, str> {
    match request {
        RequestPacket::Single(req) => Cow::Borrowed(req.method()),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => Cow::Borrowed("batch(empty)"),
            [only] => Cow::Borrowed(only.method()),
            many => Cow::Owned(format!("batch({} calls)", many.len())),
        },
    }
}
