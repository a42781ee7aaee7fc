//! Small `offsetof`/`container_of` style macros used by the narrow unsafe layer
//! that recovers a header pointer from an intrusive list link.

pub mod ptr;
