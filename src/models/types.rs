//! Type definitions for Wallet Sentry
//! All core data structures shared between the orchestrator and its consumers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported blockchain networks (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Bitcoin,
    Solana,
    Polygon,
    Binance,
}

impl Network {
    /// Every supported network, in selector display order
    pub const ALL: [Network; 5] = [
        Network::Ethereum,
        Network::Bitcoin,
        Network::Solana,
        Network::Polygon,
        Network::Binance,
    ];

    /// Wire/query-string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Bitcoin => "bitcoin",
            Network::Solana => "solana",
            Network::Polygon => "polygon",
            Network::Binance => "binance",
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Bitcoin => "Bitcoin",
            Network::Solana => "Solana",
            Network::Polygon => "Polygon",
            Network::Binance => "BNB Smart Chain",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Ethereum
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Network::Ethereum),
            "bitcoin" | "btc" => Ok(Network::Bitcoin),
            "solana" | "sol" => Ok(Network::Solana),
            "polygon" | "matic" => Ok(Network::Polygon),
            "binance" | "bnb" | "bsc" => Ok(Network::Binance),
            other => Err(format!("Unsupported network: {}", other)),
        }
    }
}

/// Risk classification derived from the trust score
///
/// Higher scores mean lower risk. The thresholds here are the single source
/// of truth: any score-colored display must go through `for_score` and
/// `color_code` instead of re-deriving its own cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Trust score 80-100
    Low,
    /// Trust score 50-79
    Medium,
    /// Trust score 0-49
    High,
}

impl RiskLevel {
    /// Classify a trust score (0-100) into a risk level.
    /// Half-open intervals: 80 is low, 50 is medium, 49 is high.
    pub fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => RiskLevel::Low,
            50..=79 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Color code for UI consumers, keyed off the level itself
    pub fn color_code(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#22c55e",    // Green
            RiskLevel::Medium => "#eab308", // Yellow
            RiskLevel::High => "#ef4444",   // Red
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored risk category inside an analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletMetric {
    /// Unique within one result
    pub id: String,
    pub name: String,
    /// Category score (0-100)
    pub score: u8,
    pub description: String,
}

/// Direction of a transaction relative to the analyzed wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxDirection {
    Incoming,
    Outgoing,
}

/// One recent transaction of the analyzed wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique within one result
    pub id: String,
    pub hash: String,
    /// Wire field is `type`
    #[serde(rename = "type")]
    pub direction: TxDirection,
    pub amount: String,
    pub value: String,
    pub from: String,
    pub to: String,
    /// ISO-8601
    pub timestamp: String,
    pub gas: String,
}

/// Kind of a timeline activity event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Transaction,
    Contract,
}

/// One event inside a day bucket of the activity timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub time: String,
    pub description: String,
    pub highlight: bool,
}

/// Activity timeline day bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDay {
    /// Display label, e.g. "2025-03-14"
    pub date: String,
    pub events: Vec<ActivityEvent>,
}

/// Full structured output of one wallet risk analysis
///
/// Produced by the remote scoring service and wholesale-replaced on every
/// successful analysis. `total_value`, `avg_transaction` and `active_since`
/// are display-formatted upstream and opaque here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAnalysisResult {
    pub address: String,
    pub network: Network,
    /// Trust score (0-100), higher is safer
    pub score: u8,
    pub risk_level: RiskLevel,
    pub total_value: String,
    pub transaction_count: u64,
    pub avg_transaction: String,
    pub active_since: String,
    #[serde(default)]
    pub metrics: Vec<WalletMetric>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
    #[serde(default)]
    pub activities: Vec<ActivityDay>,
    /// ISO-8601 timestamp of when the result was produced
    pub last_updated: String,
}

impl WalletAnalysisResult {
    /// Parsed `last_updated` timestamp, if it is valid RFC 3339.
    /// Consumers use this for freshness display; the raw string is the
    /// contract value.
    pub fn last_updated_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_updated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Who authored a turn in the assistant conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in the append-only assistant conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantTurn {
    pub role: TurnRole,
    pub content: String,
}
