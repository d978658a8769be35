//! Known crawler, bot and link-preview signatures.

use serde::{Deserialize, Serialize};

/// Lowercase user-agent fragments of crawlers that should receive
/// prerendered pages in bots-only mode.
///
/// googlebot, bingbot and yahoo are deliberately absent: those crawlers are
/// better served through `_escaped_fragment_` than through user-agent
/// sniffing, which risks cloaking penalties.
pub const CRAWLER_USER_AGENTS: &[&str] = &[
    "baiduspider",
    "facebookexternalhit",
    "twitterbot",
    "rogerbot",
    "linkedinbot",
    "embedly",
    "quora link preview",
    "showyoubot",
    "outbrain",
    "pinterest",
    "pinterest/0.",
    "developers.google.com/+/web/snippet",
    "slackbot",
    "vkshare",
    "w3c_validator",
    "redditbot",
    "applebot",
    "whatsapp",
    "flipboard",
    "tumblr",
    "bitlybot",
    "skypeuripreview",
    "nuzzel",
    "discordbot",
    "google page speed",
];

/// Direction of the substring test between user-agent and signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlerMatch {
    /// The signature appears somewhere inside the user-agent.
    #[default]
    SignatureInUserAgent,
    /// The whole user-agent appears inside a signature. Only exact or
    /// fragment-like user-agents match this way.
    UserAgentInSignature,
}

/// Tests an already-lowercased user-agent against the signature set.
pub fn is_known_crawler(lowercased_user_agent: &str, mode: CrawlerMatch) -> bool {
    if lowercased_user_agent.is_empty() {
        return false;
    }
    CRAWLER_USER_AGENTS.iter().any(|signature| match mode {
        CrawlerMatch::SignatureInUserAgent => lowercased_user_agent.contains(signature),
        CrawlerMatch::UserAgentInSignature => signature.contains(lowercased_user_agent),
    })
}
