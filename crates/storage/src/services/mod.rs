pub mod competition_lifecycle;
pub mod time_registration;
