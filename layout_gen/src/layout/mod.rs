pub mod checks;
pub mod classify;
pub mod file;
pub mod registry;
pub mod roots;

pub use classify::{Category, Classifier, Primitive, PrimitiveClass};
pub use registry::TypeRegistry;
pub use roots::RootSet;
