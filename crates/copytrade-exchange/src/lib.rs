//! Signed REST client for the exchange's copy-trading API.
//!
//! # Key Components
//!
//! - [`RequestSigner`]: HMAC-SHA256/base64 request signing
//! - [`ExchangeClient`]: the six signed operations used by the orchestrator
//! - [`ExchangeApi`]: dyn-compatible seam over those operations
//! - [`MockExchange`]: recording implementation for tests
//!
//! # Endpoints
//!
//! | Operation | Request |
//! |---|---|
//! | balance | `GET /api/mix/v1/account/accounts?productType=..` |
//! | place order | `POST /api/mix/v1/order/placeOrder` |
//! | tracking lookups | `GET /api/mix/v1/trace/currentTrack?symbol=..&productType=..&pageSize=..&pageNo=..` |
//! | modify TP/SL | `POST /api/mix/v1/trace/modifyTPSL` |
//! | close tracked order | `POST /api/mix/v1/trace/closeTrackOrder` |

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod response;
pub mod signer;

pub use api::{BoxFuture, DynExchange, ExchangeApi, Lookup};
pub use client::ExchangeClient;
pub use config::{Credentials, ExchangeConfig, TrackingQueryConfig};
pub use error::{ExchangeError, ExchangeResult};
pub use mock::{ExchangeCall, MockExchange};
pub use response::RawResponse;
pub use signer::{pre_hash, sign, Clock, RequestSigner, SignedRequest, SignerError, SystemClock};
