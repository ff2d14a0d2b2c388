mod annotation;
mod document;

pub use annotation::{Annotation, AnnotationSlot};
pub use document::Document;
