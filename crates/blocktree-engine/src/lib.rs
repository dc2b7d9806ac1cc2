pub mod blocks;
pub mod collaborators;
pub mod component;
pub mod convert;
pub mod embed;
pub mod error;
pub mod io;
pub mod registry;

// Re-export key types for easier usage
pub use blocks::RawBlock;
pub use collaborators::*;
pub use component::{ChildInput, Component, ComponentKind, SerializedComponent};
pub use convert::{Accumulator, Converter, ConverterBuilder, ConverterOptions};
pub use error::{Collaborator, ConvertError};
pub use registry::ComponentRegistry;
