//! Status board bot - keeps an Ally and an Enemies list on a live Discord message

pub mod application;
pub mod domain;
pub mod infrastructure;
