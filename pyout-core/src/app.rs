use std::time::Instant;

use crate::buffer::EditBuffer;
use crate::classify::{classify, Classification};
use crate::debounce::Debouncer;
use crate::exec::{Evaluator, ExecutionResult, Executor};
use crate::explain::ExplainHandle;
use crate::format::annotate;
use crate::model::{Annotation, AnnotationSlot, Document};
use crate::theme::Theme;

/// Where the take-a-break flow points
pub const BREAK_URL: &str = "https://dinosaurgame.app/world";

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    ThemePicker,
    Help,
}

/// Effects the frontend must perform on the core's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    OpenUrl(String),
}

/// Application state: the buffer, the evaluation pipeline, and the single
/// annotation slot.
pub struct App {
    pub buffer: EditBuffer,
    pub document: Option<Document>,
    pub mode: Mode,
    pub running: bool,
    pub theme: Theme,
    pub theme_selected: usize,
    pub dirty: bool,

    // Visual-mode selection anchor (row)
    pub selection_anchor: Option<usize>,

    // Status message and transient notice popup (explain results)
    pub status_message: Option<String>,
    pub notice: Option<String>,

    annotations: AnnotationSlot,
    debouncer: Debouncer,
    evaluator: Evaluator,
    explain: ExplainHandle,
}

impl App {
    pub fn new(executor: Executor, theme: Theme) -> Self {
        Self {
            buffer: EditBuffer::new(),
            document: None,
            mode: Mode::Normal,
            running: true,
            theme,
            theme_selected: theme_index(theme),
            dirty: false,
            selection_anchor: None,
            status_message: None,
            notice: None,
            annotations: AnnotationSlot::new(),
            debouncer: Debouncer::default(),
            evaluator: Evaluator::new(executor),
            explain: ExplainHandle::from_env(),
        }
    }

    pub fn load_document(&mut self, doc: Document) {
        self.buffer = EditBuffer::from_content(&doc.content);
        self.document = Some(doc);
        self.annotations.clear();
        self.debouncer.cancel();
        self.dirty = false;
    }

    /// Write the buffer back into the document snapshot
    pub fn sync_document(&mut self) -> Option<&Document> {
        let content = self.buffer.content();
        let doc = self.document.as_mut()?;
        doc.set_content(content);
        self.dirty = false;
        Some(&*doc)
    }

    pub fn title(&self) -> String {
        self.document
            .as_ref()
            .and_then(|d| d.filename.clone())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotations.current()
    }

    /// Trigger: document text changed
    pub fn note_edit(&mut self, now: Instant) {
        self.dirty = true;
        self.debouncer.schedule(now);
    }

    /// Trigger: cursor or selection moved
    pub fn note_selection(&mut self, now: Instant) {
        self.debouncer.schedule(now);
    }

    // Visual mode

    pub fn enter_visual_mode(&mut self) {
        self.mode = Mode::Visual;
        self.selection_anchor = Some(self.buffer.cursor().0);
    }

    pub fn exit_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_anchor = None;
    }

    /// Selected row range, inclusive, while in visual mode
    pub fn selection_rows(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        let row = self.buffer.cursor().0;
        Some((anchor.min(row), anchor.max(row)))
    }

    fn selection_text(&self) -> Option<String> {
        let (start, end) = self.selection_rows()?;
        Some(self.buffer.lines()[start..=end].join("\n"))
    }

    // Theme picker

    pub fn open_theme_picker(&mut self) {
        self.theme_selected = theme_index(self.theme);
        self.mode = Mode::ThemePicker;
    }

    pub fn picker_next(&mut self) {
        self.theme_selected = (self.theme_selected + 1) % Theme::all().len();
    }

    pub fn picker_prev(&mut self) {
        let len = Theme::all().len();
        self.theme_selected = if self.theme_selected == 0 {
            len - 1
        } else {
            self.theme_selected - 1
        };
    }

    /// Apply the highlighted theme; returns it so the frontend can persist it
    pub fn confirm_theme(&mut self) -> Theme {
        self.theme = Theme::all()[self.theme_selected];
        self.mode = Mode::Normal;
        self.set_status(&format!("Theme set to: {}", self.theme.as_str()));
        self.theme
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Advance the pipeline: deliver finished work, then fire the debouncer.
    ///
    /// Called once per frontend tick.
    pub fn tick(&mut self, now: Instant) -> Option<SideEffect> {
        if let Some(text) = self.explain.poll() {
            self.notice = Some(text);
        }
        if let Some((line, result)) = self.evaluator.poll() {
            self.deliver(line, result);
        }

        if !self.debouncer.fire(now) {
            return None;
        }
        self.evaluate()
    }

    /// Render or clear the annotation for a finished evaluation
    fn deliver(&mut self, line: usize, result: ExecutionResult) {
        match annotate(&result, line, self.theme) {
            Some(annotation) => self.annotations.show(annotation),
            None => self.annotations.clear(),
        }
    }

    /// One debounced evaluation pass over the selection or the current line
    fn evaluate(&mut self) -> Option<SideEffect> {
        // Markers are honored in the selection when one is active
        if let Some(text) = self.selection_text() {
            match classify(&text) {
                Classification::Explain(code) => return self.start_explain(code),
                Classification::TakeABreak => return self.take_break(),
                _ => {}
            }
        }

        // Execution always keys off the cursor line
        let (row, _) = self.buffer.cursor();
        match classify(self.buffer.current_line()) {
            Classification::Explain(code) => self.start_explain(code),
            Classification::TakeABreak => self.take_break(),
            Classification::Runnable => {
                self.evaluator.spawn(self.buffer.lines().to_vec(), row);
                None
            }
            Classification::Skip => {
                self.annotations.clear();
                None
            }
        }
    }

    fn start_explain(&mut self, code: String) -> Option<SideEffect> {
        self.annotations.clear();
        if !code.is_empty() {
            self.set_status("Explaining code...");
            self.explain.spawn(code);
        }
        None
    }

    fn take_break(&mut self) -> Option<SideEffect> {
        self.annotations.clear();
        Some(SideEffect::OpenUrl(BREAK_URL.to_string()))
    }
}

fn theme_index(theme: Theme) -> usize {
    Theme::all().iter().position(|t| *t == theme).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_app(content: &str) -> App {
        let executor = Executor::new("sh", std::env::temp_dir().join("pyout-app-tests"));
        let mut app = App::new(executor, Theme::Stardust);
        app.load_document(Document::new("test".to_string(), content.to_string()));
        app
    }

    fn shown(line: usize, text: &str) -> Annotation {
        Annotation {
            line,
            text: text.to_string(),
            color: Theme::Stardust.color(),
            is_error: false,
        }
    }

    #[test]
    fn test_edits_coalesce_to_one_firing() {
        let mut app = test_app("x = 1");
        let t0 = Instant::now();

        app.note_edit(t0);
        app.note_edit(t0 + Duration::from_millis(100));
        app.note_edit(t0 + Duration::from_millis(200));

        // Not yet quiet for 500ms after the last trigger
        assert!(app.tick(t0 + Duration::from_millis(600)).is_none());
        assert!(app.debouncer.is_pending());

        // Fires exactly once
        app.tick(t0 + Duration::from_millis(700));
        assert!(!app.debouncer.is_pending());
        app.tick(t0 + Duration::from_millis(800));
        assert!(!app.debouncer.is_pending());
    }

    #[test]
    fn test_skip_line_clears_annotation() {
        let mut app = test_app("x = 1");
        app.annotations.show(shown(0, "  # stale (1ms)"));

        let t0 = Instant::now();
        app.note_selection(t0);
        let effect = app.tick(t0 + Duration::from_secs(1));

        assert!(effect.is_none());
        assert!(app.annotation().is_none());
    }

    #[test]
    fn test_break_marker_requests_external_link() {
        let mut app = test_app("foo()  # take-a-break");
        app.annotations.show(shown(0, "  # stale (1ms)"));

        let t0 = Instant::now();
        app.note_selection(t0);
        let effect = app.tick(t0 + Duration::from_secs(1));

        assert_eq!(effect, Some(SideEffect::OpenUrl(BREAK_URL.to_string())));
        assert!(app.annotation().is_none());
    }

    #[test]
    fn test_explain_clears_annotation_and_sets_status() {
        let mut app = test_app("print(x)  # explain");
        app.annotations.show(shown(0, "  # stale (1ms)"));

        let t0 = Instant::now();
        app.note_selection(t0);
        app.tick(t0 + Duration::from_secs(1));

        assert!(app.annotation().is_none());
        assert_eq!(app.status_message.as_deref(), Some("Explaining code..."));
    }

    #[test]
    fn test_empty_output_clears_prior_annotation() {
        let mut app = test_app("x = 1");
        app.annotations.show(shown(0, "  # stale (1ms)"));

        let result = ExecutionResult {
            stdout: String::new(),
            stderr: String::new(),
            exit_error: None,
            timed_out: false,
            elapsed_ms: 2,
        };
        app.deliver(0, result);

        assert!(app.annotation().is_none());
    }

    #[test]
    fn test_delivery_replaces_previous_annotation() {
        let mut app = test_app("print(1)\nprint(2)");
        app.annotations.show(shown(0, "  # 1 (2ms)"));

        let result = ExecutionResult {
            stdout: "2\n".to_string(),
            stderr: String::new(),
            exit_error: None,
            timed_out: false,
            elapsed_ms: 3,
        };
        app.deliver(1, result);

        let annotation = app.annotation().unwrap();
        assert_eq!(annotation.line, 1);
        assert_eq!(annotation.text, "  # 2 (3ms)");
    }

    #[cfg(unix)]
    #[test]
    fn test_runnable_line_flows_to_annotation() {
        // `sh` stands in for the interpreter; `true()` is call-like for the
        // classifier and a shell error at runtime, so an error annotation
        // must come back through the pipeline.
        let mut app = test_app("true(1)");

        let t0 = Instant::now();
        app.note_edit(t0);
        app.tick(t0 + Duration::from_secs(1));

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.annotation().is_none() {
            assert!(Instant::now() < deadline, "no annotation delivered");
            std::thread::sleep(Duration::from_millis(10));
            app.tick(Instant::now());
        }

        let annotation = app.annotation().unwrap();
        assert!(annotation.is_error);
        assert_eq!(annotation.color, Theme::error_color());
        assert_eq!(annotation.line, 0);
    }

    #[test]
    fn test_visual_selection_rows_are_ordered() {
        let mut app = test_app("a\nb\nc");
        app.buffer.move_down();
        app.enter_visual_mode();
        app.buffer.move_down();
        assert_eq!(app.selection_rows(), Some((1, 2)));

        app.buffer.move_up();
        app.buffer.move_up();
        assert_eq!(app.selection_rows(), Some((0, 1)));

        app.exit_visual_mode();
        assert_eq!(app.selection_rows(), None);
    }

    #[test]
    fn test_theme_picker_wraps_and_confirms() {
        let mut app = test_app("");
        app.open_theme_picker();
        assert_eq!(app.mode, Mode::ThemePicker);
        assert_eq!(app.theme_selected, theme_index(Theme::Stardust));

        app.picker_next();
        assert_eq!(app.theme_selected, 0);
        app.picker_prev();
        assert_eq!(app.theme_selected, theme_index(Theme::Stardust));

        app.picker_next();
        let chosen = app.confirm_theme();
        assert_eq!(chosen, Theme::CyberGlow);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_sync_document_tracks_buffer_edits() {
        let mut app = test_app("x = 1");
        app.buffer.move_to_line_end();
        app.buffer.insert_str("0");
        app.note_edit(Instant::now());
        assert!(app.dirty);

        let doc = app.sync_document().unwrap();
        assert_eq!(doc.content, "x = 10");
        assert!(!app.dirty);
    }
}
