//! Format validation, string normalization, and the bundled static lookup
//! tables (disposable domains, free providers, role-based prefixes, and
//! provider detection) that the orchestrator consults before ever touching
//! the network.

pub mod format;
pub mod lookup;
pub mod normalize;
mod tables;

pub use format::is_valid_format;
pub use lookup::{
    detect_provider, is_disposable_domain, is_disposable_email, is_free_domain, is_free_email,
    is_role_based_email, is_role_based_local_part,
};
pub use normalize::{extract_domain, extract_local_part};
