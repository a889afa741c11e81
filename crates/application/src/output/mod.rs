//! Output transformation and rendering.

mod render;
mod transform;

pub use render::OutputRenderer;
pub use transform::{OutputDataTransformer, flatten_plain};
