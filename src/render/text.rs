//! Plain text rendering.

use super::layout::question_lines;
use super::RenderOptions;
use crate::model::Question;

/// Renders questions as text, one paragraph per line.
pub fn render_text(questions: &[Question], options: &RenderOptions) -> String {
    let mut output = String::new();

    for q in questions {
        for line in question_lines(q, options) {
            output.push_str(&line);
            output.push('\n');
        }
        if options.paragraph_spacing {
            output.push('\n');
        }
    }

    output
}
