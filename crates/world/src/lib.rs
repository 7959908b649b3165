#![warn(missing_docs)]
//! World-side surfaces consumed by the navigation engine: chunked
//! block storage, the block trait registry, the read-only
//! [`WorldView`] oracle, and the world-change watchers.

mod chunk;
mod registry;
mod view;
mod watch;
mod world;

pub use chunk::*;
pub use registry::*;
pub use view::*;
pub use watch::*;
pub use world::*;
