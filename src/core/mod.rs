pub mod assembler;
pub mod controller;
pub mod elements;
pub mod engine;

pub use crate::domain::model::{Comment, CommentVisibility, Post, User};
pub use crate::domain::ports::{ConfigProvider, PostSource};
pub use crate::utils::error::Result;
