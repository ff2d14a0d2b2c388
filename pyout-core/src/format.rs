use crate::exec::ExecutionResult;
use crate::model::Annotation;
use crate::theme::Theme;

/// Last non-blank line of a block of captured output, trimmed
pub fn last_non_blank(text: &str) -> Option<&str> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
}

/// Reduce an execution result to its inline annotation.
///
/// Success with empty stdout yields `None`; the caller must clear any
/// previously displayed annotation.
pub fn annotate(result: &ExecutionResult, line: usize, theme: Theme) -> Option<Annotation> {
    let (message, is_error) = match &result.exit_error {
        Some(error) => (last_non_blank(error), true),
        None => (last_non_blank(&result.stdout), false),
    };
    let message = message?;

    Some(Annotation {
        line,
        text: format!("  # {} ({}ms)", message, result.elapsed_ms),
        color: if is_error {
            Theme::error_color()
        } else {
            theme.color()
        },
        is_error,
    })
}
