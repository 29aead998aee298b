pub mod navigation;
pub mod notification;
pub mod scheduler;
