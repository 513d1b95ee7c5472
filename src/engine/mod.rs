pub mod keywords;
pub mod pass;
