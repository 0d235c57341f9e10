//! # wavelink-webhook
//!
//! Inbound webhook gate protecting the AI response pipeline:
//!
//! - Shared-secret `X-Api-Key` check and HMAC-SHA256 `X-Signature`
//!   verification over the exact raw body
//! - At-most-once admission per `X-Webhook-Id` using a bounded, expiring
//!   delivery ledger
//! - Pure dispatch filters deciding which events reach the pipeline
//! - The [`ResponsePipeline`] seam plus per-identity pending
//!   recommendation slots used by the bundled pipeline

pub mod filter;
pub mod gate;
pub mod ledger;
pub mod payload;
pub mod pipeline;
pub mod recommendation;
pub mod signature;

pub use filter::{DispatchFilter, InboundChatMessage, SkipReason};
pub use gate::{GateOutcome, WebhookGate, WebhookHeaders};
pub use ledger::{Admission, DeliveryLedger};
pub use payload::WebhookEvent;
pub use pipeline::{DeferredPipeline, ResponsePipeline};
pub use recommendation::{Recommendation, RecommendationSlots};
pub use signature::SignatureVerifier;
