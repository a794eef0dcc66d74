//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use proofwork_types::kudos::KudosedProofOrder;

/// Zero-based paging parameters. Missing values fall back to the config.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Query parameters for a sponsor's endorsed-proofs listing.
#[derive(Debug, Deserialize, Default)]
pub struct KudosedProofsQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `newest` (default) or `total_kudos`.
    #[serde(default)]
    pub sort: KudosedProofOrder,
}
