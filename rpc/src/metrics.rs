//! Prometheus metrics for the HTTP API.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that the `/metrics` endpoint
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct RpcMetrics {
    pub registry: Registry,

    /// Articles accepted by `POST /article/`.
    pub articles_created: IntCounter,
    /// Votes recorded, labelled by `kind` (`real` / `spam`).
    pub votes_accepted: IntCounterVec,
    /// Votes refused by the eligibility guard, labelled by `reason`.
    pub votes_denied: IntCounterVec,
    /// Verification runs, labelled by `outcome`.
    pub verifications: IntCounterVec,
    /// Deleted articles physically removed on acknowledgement.
    pub articles_removed: IntCounter,
}

impl RpcMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let articles_created = register_int_counter_with_registry!(
            Opts::new("verity_articles_created_total", "Total articles created"),
            registry
        )?;

        let votes_accepted = register_int_counter_vec_with_registry!(
            Opts::new("verity_votes_accepted_total", "Total votes recorded"),
            &["kind"],
            registry
        )?;

        let votes_denied = register_int_counter_vec_with_registry!(
            Opts::new(
                "verity_votes_denied_total",
                "Total votes refused by the eligibility guard"
            ),
            &["reason"],
            registry
        )?;

        let verifications = register_int_counter_vec_with_registry!(
            Opts::new("verity_verifications_total", "Total verification runs"),
            &["outcome"],
            registry
        )?;

        let articles_removed = register_int_counter_with_registry!(
            Opts::new(
                "verity_articles_removed_total",
                "Total deleted articles removed after acknowledgement"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            articles_created,
            votes_accepted,
            votes_denied,
            verifications,
            articles_removed,
        })
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
