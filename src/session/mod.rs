pub mod lesson;
pub mod quiz;
pub mod word_buffer;
