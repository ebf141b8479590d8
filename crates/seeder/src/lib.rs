pub mod error;
pub mod fixtures;
pub mod token;

pub use error::{Result, SeederError};
pub use fixtures::{FixtureSummary, load_fixtures};
pub use token::{issue_token, ttl_from_minutes};
