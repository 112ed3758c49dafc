//! AOI governance: area ceiling and bounded substitute

mod governor;

pub use governor::{enforce_area_limit, GovernanceSummary, GovernedAoi};
