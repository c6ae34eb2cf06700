pub mod emitter;
pub mod equals;
pub mod from_json;
pub mod helpers;
pub mod to_json;
pub mod unit;

// Re-export main public functions
pub use emitter::{emit_field, ArrayElement, FieldEmitter, FieldSite};
pub use equals::EqualsEmitter;
pub use from_json::FromJsonEmitter;
pub use to_json::ToJsonEmitter;
pub use unit::{emit_struct_unit, prototypes, struct_diagnostics, Linkage, StructUnit};
