pub(crate) mod logic;
pub mod filter;
pub mod matcher;
pub mod patterns;
pub mod provider;

pub use filter::filter_files_to_unwrap;
pub use logic::{RestorePlan, plan_selective_restore};
pub use matcher::PatternMatcher;
pub use patterns::{RestorePattern, make_restore_patterns, with_system_databases};
pub use provider::RestoreFilterDecorator;
