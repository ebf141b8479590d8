pub mod competition;
pub mod judge;
pub mod team;
pub mod time_record;

pub use competition::{Competition, CompetitionCategory, CompetitionStatus};
pub use judge::Judge;
pub use team::Team;
pub use time_record::{NewTimeRecord, TimeRecord};
