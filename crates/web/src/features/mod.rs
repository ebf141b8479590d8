pub mod competitions;
pub mod teams;
pub mod timing;
