pub mod course;
pub mod search;
pub mod spelling;
