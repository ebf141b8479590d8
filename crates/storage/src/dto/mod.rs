pub mod competition;
pub mod judge;
pub mod team;
pub mod time_record;
