pub mod catalog;
pub mod common;
pub mod image;
pub mod text;

pub use catalog::*;
pub use common::*;
pub use image::*;
pub use text::*;
