//! Explanation formatting.
//!
//! Explanations use a bracket grammar: `[AND: d1; d2; ...]` for And nodes,
//! nested for And-of-And, and bare `<field> <op> <value>` text for leaves.
//! The formatter only inserts whitespace: every `[` and `]` starts a new line
//! indented by the current nesting depth.

use std::fmt::{self, Write};

const INDENT: &str = "  ";

/// Re-indents an explanation into a readable multi-line tree.
pub fn format_explanation(explanation: &str) -> String {
    let mut output = String::with_capacity(explanation.len() * 2);
    write_explanation(&mut output, explanation)
        .map(|()| output)
        .unwrap_or_default()
}

/// Writes the re-indented explanation to a writer.
pub fn write_explanation<W: Write>(writer: &mut W, explanation: &str) -> fmt::Result {
    let mut depth = 0usize;

    for c in explanation.chars() {
        match c {
            '[' => {
                writer.write_char('\n')?;
                write_indent(writer, depth)?;
                writer.write_char('[')?;
                depth += 1;
            }
            ']' => {
                depth = depth.saturating_sub(1);
                writer.write_char('\n')?;
                write_indent(writer, depth)?;
                writer.write_char(']')?;
            }
            c => writer.write_char(c)?,
        }
    }
    Ok(())
}

fn write_indent<W: Write>(writer: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        writer.write_str(INDENT)?;
    }
    Ok(())
}
