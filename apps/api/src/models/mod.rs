pub mod place;
pub mod restaurant;
