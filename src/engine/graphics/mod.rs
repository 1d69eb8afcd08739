pub mod batch;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use batch::{DrawBatch, SpriteBatch};
pub use renderer::Renderer;
pub use texture::GpuTexture;
pub use vertex::Vertex;
