//! Wallet Sentry Library
//!
//! Client-side orchestration for remote wallet risk analysis:
//! - Typed result contract (trust score, risk metrics, transactions, timeline)
//! - State machine owning the single in-flight analysis request, with
//!   last-request-wins stale-response suppression
//! - Normalized three-way error taxonomy (validation / API / transport)
//! - Append-only assistant conversation channel
//! - Ephemeral notifications with cancellable auto-expiry

pub mod assistant;
pub mod client;
pub mod models;
pub mod notify;
pub mod orchestrator;

pub use assistant::{AssistantSession, ASSISTANT_ERROR_REPLY};
pub use client::{AnalysisApi, AnalysisClient, GENERIC_ANALYSIS_ERROR, NO_ASSISTANT_RESPONSE};
pub use models::{
    AnalysisError, ApiResult, AssistantTurn, ClientConfig, Network, RiskLevel, TurnRole,
    WalletAnalysisResult,
};
pub use notify::{NotificationCenter, Toast, ToastKind};
pub use orchestrator::{AnalysisOrchestrator, AnalysisSnapshot, AnalysisState};
