//! Request and response bodies for the HTTP API.
//!
//! Field names follow the browser client's JSON contract (`contentHash`,
//! `walletAddress`, `fakeVotes`, ...).

use serde::{Deserialize, Serialize};
use verity_store::{ArticleRecord, UserProfile};

// ── Article ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArticleRequest {
    pub article_title: String,
    pub journalist: String,
    pub content_hash: String,
    pub tags: Vec<String>,
    pub ref_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub article_title: String,
    pub journalist: String,
    pub content_hash: String,
    pub tags: Vec<String>,
    pub ref_images: Vec<String>,
    pub spam: Vec<String>,
    pub real_votes: u64,
    pub fake_votes: u64,
    pub voters: Vec<String>,
    pub verified: bool,
    pub deleted: bool,
    pub updated: bool,
    pub created_at: u64,
}

impl From<ArticleRecord> for ArticleView {
    fn from(a: ArticleRecord) -> Self {
        Self {
            article_title: a.title,
            journalist: a.author.as_str().to_string(),
            content_hash: a.content_ref.as_str().to_string(),
            tags: a.tags,
            ref_images: a.evidence_refs.iter().map(|r| r.as_str().to_string()).collect(),
            spam: a.spam_evidence.iter().map(|r| r.as_str().to_string()).collect(),
            real_votes: a.real_votes,
            fake_votes: a.spam_votes,
            voters: a.voters,
            verified: a.verified,
            deleted: a.deleted,
            updated: a.pending_update,
            created_at: a.created_at.as_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub message: String,
    pub article: ArticleView,
}

impl ArticleResponse {
    pub fn new(message: impl Into<String>, article: ArticleRecord) -> Self {
        Self {
            message: message.into(),
            article: article.into(),
        }
    }
}

// ── Voting ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealVoteRequest {
    pub wallet_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpamVoteRequest {
    pub wallet_address: String,
    pub spam_string: String,
}

// ── Users ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub uname: String,
    pub wallet_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub wallet_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStakeRequest {
    #[serde(default)]
    pub wallet_address: String,
    pub dnt_stake: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub uname: String,
    pub wallet_address: String,
    pub validated_articles: Vec<String>,
    pub spammed_articles: Vec<String>,
    pub dnt_stake: u64,
    pub created_at: u64,
}

impl From<UserProfile> for UserView {
    fn from(u: UserProfile) -> Self {
        Self {
            uname: u.display_name,
            wallet_address: u.identity.as_str().to_string(),
            validated_articles: u
                .validated_articles
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            spammed_articles: u
                .spammed_articles
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            dnt_stake: u.stake_balance,
            created_at: u.created_at.as_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: UserView,
}

impl UserResponse {
    pub fn new(message: impl Into<String>, user: UserProfile) -> Self {
        Self {
            message: message.into(),
            user: user.into(),
        }
    }
}

// ── Misc ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
