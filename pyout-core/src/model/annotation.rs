use crate::theme::Rgb;

/// An inline output annotation pinned to a buffer line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub line: usize,
    pub text: String,
    pub color: Rgb,
    pub is_error: bool,
}

/// Single-slot owner of the displayed annotation.
///
/// At most one annotation exists at a time; showing a new one destroys the
/// previous one first.
#[derive(Debug, Default)]
pub struct AnnotationSlot {
    current: Option<Annotation>,
}

impl AnnotationSlot {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Replace the displayed annotation
    pub fn show(&mut self, annotation: Annotation) {
        self.current = Some(annotation);
    }

    /// Remove the displayed annotation; safe to call when none exists
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Annotation> {
        self.current.as_ref()
    }
}
