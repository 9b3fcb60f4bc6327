pub mod catalog;
pub mod condition;
pub mod detector;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod session;
pub mod template;
