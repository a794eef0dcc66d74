//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.
//! Every operation that acts on behalf of a caller takes the caller's
//! [`Principal`](proofwork_types::principal::Principal) explicitly.

pub mod endorsement;
pub mod kudos;
pub mod profile;
pub mod skill;
pub mod submission;
pub mod vacancy;

use proofwork_types::config::GlobalConfig;
use proofwork_types::page::PageRequest;

/// Build a page request from optional caller input.
///
/// Missing size falls back to `default_page_size`; sizes are clamped to
/// `1..=max_page_size`.
pub fn page_request(config: &GlobalConfig, page: Option<u32>, size: Option<u32>) -> PageRequest {
    let size = size
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size.max(1));
    PageRequest::new(page.unwrap_or(0), size)
}
