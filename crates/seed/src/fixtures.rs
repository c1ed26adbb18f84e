//! Static demo data: the workflow catalogue, Amazon tracking IDs, and the
//! vocabularies the random generators draw from.

use revdash_core::transaction::{TYPE_COMMISSION, TYPE_EXPENSE, TYPE_REFUND, TYPE_REVENUE};
use serde_json::{json, Value};

/// Name of the workflow that coordinates all the others.
pub const ORCHESTRATOR_NAME: &str = "Master Orchestrator";

pub const TRANSACTION_COUNT: usize = 50;
pub const METRIC_DAYS: i64 = 30;
pub const CALLS_PER_SERVICE: usize = 24;
pub const MEMBERSHIP_COUNT: usize = 18;

pub struct WorkflowFixture {
    pub name: &'static str,
    pub description: &'static str,
    pub success_rate: f64,
    pub total_runs: i32,
    pub config: fn() -> Value,
}

pub fn workflows() -> [WorkflowFixture; 8] {
    [
        WorkflowFixture {
            name: "Amazon Influencer Shorts",
            description: "Automated product review shorts for YouTube with affiliate links",
            success_rate: 94.5,
            total_runs: 127,
            config: || {
                json!({
                    "platforms": ["youtube", "amazon"],
                    "regions": ["US", "UK", "DE"],
                    "affiliateCommission": 8.5,
                    "contentTypes": ["shorts", "reviews"],
                    "aiModel": "gpt-4"
                })
            },
        },
        WorkflowFixture {
            name: "AI Stock Photos",
            description: "Generate and sell AI-created stock photography",
            success_rate: 89.2,
            total_runs: 95,
            config: || {
                json!({
                    "platforms": ["shutterstock", "adobe", "getty"],
                    "imageTypes": ["abstract", "business", "nature"],
                    "resolutions": ["4k", "8k"],
                    "aiModel": "dall-e-3"
                })
            },
        },
        WorkflowFixture {
            name: "Redbubble Bulk Products",
            description: "Design and upload products in bulk to Redbubble",
            success_rate: 94.0,
            total_runs: 43,
            config: || {
                json!({
                    "productTypes": ["t-shirts", "mugs", "stickers", "posters"],
                    "designStyles": ["minimalist", "vintage", "modern"],
                    "categories": ["tech", "gaming", "fitness"],
                    "commissionRate": 20.0
                })
            },
        },
        WorkflowFixture {
            name: "NFT Base Lazy Mint",
            description: "Create and mint NFT collections on Base blockchain",
            success_rate: 89.0,
            total_runs: 28,
            config: || {
                json!({
                    "blockchain": "base",
                    "collectionSize": 100,
                    "mintPrice": "0.05",
                    "royaltyRate": 7.5,
                    "ipfsGateway": "pinata"
                })
            },
        },
        WorkflowFixture {
            name: "Audio Loops Bandcamp",
            description: "Produce and sell royalty-free audio loops",
            success_rate: 91.0,
            total_runs: 78,
            config: || {
                json!({
                    "genres": ["lo-fi", "trap", "ambient", "synthwave"],
                    "formats": ["wav", "mp3", "flac"],
                    "quality": "24-bit",
                    "priceRange": "12.99-22.99"
                })
            },
        },
        WorkflowFixture {
            name: "Newsletter Substack",
            description: "Automated newsletter creation and distribution",
            success_rate: 87.0,
            total_runs: 156,
            config: || {
                json!({
                    "platforms": ["substack"],
                    "contentTypes": ["analysis", "tips", "case_studies"],
                    "frequency": "3x per week",
                    "engagement": { "openRate": 35, "clickRate": 8, "conversionRate": 12 }
                })
            },
        },
        WorkflowFixture {
            name: "DeFi Yield Farming",
            description: "Automated DeFi investment strategies",
            success_rate: 83.0,
            total_runs: 234,
            config: || {
                json!({
                    "protocols": ["compound", "aave", "uniswap", "yearn"],
                    "chains": ["ethereum", "polygon", "arbitrum"],
                    "riskTolerance": "medium",
                    "minApy": 5.0
                })
            },
        },
        WorkflowFixture {
            name: ORCHESTRATOR_NAME,
            description: "Coordinates all workflows for optimal performance",
            success_rate: 96.0,
            total_runs: 345,
            // Filled in with the managed workflow names at seed time.
            config: || json!({ "scheduling": orchestrator_scheduling() }),
        },
    ]
}

pub fn orchestrator_scheduling() -> Value {
    json!({
        "peakHours": ["8-10", "14-16", "18-20"],
        "timezone": "America/New_York"
    })
}

pub struct TrackingFixture {
    pub region: &'static str,
    pub tag: &'static str,
    pub clicks: i32,
    pub conversions: i32,
    pub revenue: f64,
    pub performance_score: i32,
}

pub const TRACKING_IDS: [TrackingFixture; 5] = [
    TrackingFixture {
        region: "US",
        tag: "your-us-tag-20",
        clicks: 12547,
        conversions: 389,
        revenue: 15420.75,
        performance_score: 93,
    },
    TrackingFixture {
        region: "UK",
        tag: "your-uk-tag-21",
        clicks: 8932,
        conversions: 267,
        revenue: 11234.50,
        performance_score: 90,
    },
    TrackingFixture {
        region: "DE",
        tag: "your-de-tag-22",
        clicks: 7654,
        conversions: 234,
        revenue: 9876.25,
        performance_score: 92,
    },
    TrackingFixture {
        region: "CA",
        tag: "your-ca-tag-20",
        clicks: 5432,
        conversions: 156,
        revenue: 6789.00,
        performance_score: 86,
    },
    TrackingFixture {
        region: "FR",
        tag: "your-fr-tag-21",
        clicks: 4321,
        conversions: 123,
        revenue: 5432.75,
        performance_score: 85,
    },
];

/// A kind of money movement the demo workflows produce. Amounts are drawn
/// from `min..min + span`.
pub struct TransactionKind {
    pub label: &'static str,
    pub transaction_type: &'static str,
    pub min: f64,
    pub span: f64,
    pub source: &'static str,
}

pub const TRANSACTION_KINDS: [TransactionKind; 7] = [
    TransactionKind {
        label: "affiliate_commission",
        transaction_type: TYPE_COMMISSION,
        min: 10.0,
        span: 500.0,
        source: "bank_transfer",
    },
    TransactionKind {
        label: "subscription",
        transaction_type: TYPE_REVENUE,
        min: 9.0,
        span: 97.0,
        source: "stripe",
    },
    TransactionKind {
        label: "one_time",
        transaction_type: TYPE_REVENUE,
        min: 25.0,
        span: 200.0,
        source: "stripe",
    },
    TransactionKind {
        label: "royalty",
        transaction_type: TYPE_REVENUE,
        min: 5.0,
        span: 100.0,
        source: "bank_transfer",
    },
    TransactionKind {
        label: "yield",
        transaction_type: TYPE_REVENUE,
        min: 2.0,
        span: 50.0,
        source: "bank_transfer",
    },
    TransactionKind {
        label: "api_costs",
        transaction_type: TYPE_EXPENSE,
        min: 5.0,
        span: 120.0,
        source: "card",
    },
    TransactionKind {
        label: "customer_refund",
        transaction_type: TYPE_REFUND,
        min: 9.0,
        span: 60.0,
        source: "stripe",
    },
];

/// A third-party service the workflows call, with the endpoint and typical
/// latency used for generated usage rows.
pub struct ServiceFixture {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub method: &'static str,
    pub base_latency_ms: i32,
    /// Index into [`workflows`] of the workflow that calls it.
    pub workflow_index: usize,
}

pub const SERVICES: [ServiceFixture; 5] = [
    ServiceFixture {
        name: "openai",
        endpoint: "/v1/chat/completions",
        method: "POST",
        base_latency_ms: 1200,
        workflow_index: 0,
    },
    ServiceFixture {
        name: "stripe",
        endpoint: "/v1/payment_intents",
        method: "POST",
        base_latency_ms: 250,
        workflow_index: 5,
    },
    ServiceFixture {
        name: "amazon_associates",
        endpoint: "/paapi5/searchitems",
        method: "POST",
        base_latency_ms: 400,
        workflow_index: 0,
    },
    ServiceFixture {
        name: "elevenlabs",
        endpoint: "/v1/text-to-speech",
        method: "POST",
        base_latency_ms: 2200,
        workflow_index: 4,
    },
    ServiceFixture {
        name: "n8n",
        endpoint: "/webhook/trigger",
        method: "GET",
        base_latency_ms: 80,
        workflow_index: 7,
    },
];

/// Monthly price per membership tier.
pub const TIER_PRICES: [(&str, f64); 3] = [("basic", 9.0), ("pro", 29.0), ("enterprise", 99.0)];
