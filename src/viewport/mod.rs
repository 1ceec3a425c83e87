//! 三维视图：场景、相机、渲染器及其上下文

pub mod camera;
pub mod scene;
pub mod renderer;
pub mod context;

pub use renderer::{PainterRenderer, RenderedFrame, Renderer};
pub use context::{Container, ViewportContext};
