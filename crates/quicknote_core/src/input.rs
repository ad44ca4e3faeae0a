//! Note content from standard input.
//!
//! Piped input is read whole. A terminal gets a hint and is read line by
//! line until `EOF`, `.` or end-of-input.

use crate::error::{NotesError, NotesResult};
use std::io::{self, BufRead, IsTerminal, Read, Write};

pub const INPUT_HINT: &str = "Press CTRL-D (^D) or send 'EOF' to terminate input...";

const TERMINATORS: [&str; 2] = ["EOF", "."];

/// Reads note content from `reader`.
///
/// When `interactive`, writes [`INPUT_HINT`] to `prompt` first and stops at
/// the first terminator line, which is not included in the result.
pub fn read_input<R: BufRead, W: Write>(
    mut reader: R,
    interactive: bool,
    prompt: &mut W,
) -> NotesResult<String> {
    let mut content = String::new();
    if !interactive {
        reader
            .read_to_string(&mut content)
            .map_err(NotesError::Input)?;
        return Ok(content);
    }

    writeln!(prompt, "{INPUT_HINT}").map_err(NotesError::Input)?;
    prompt.flush().map_err(NotesError::Input)?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(NotesError::Input)? == 0 {
            break;
        }
        let bare = line.trim_end_matches(['\n', '\r']);
        if TERMINATORS.contains(&bare) {
            break;
        }
        content.push_str(&line);
    }
    Ok(content)
}

/// Reads note content from the process stdin; the hint goes to stderr.
pub fn read_stdin() -> NotesResult<String> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    read_input(stdin.lock(), interactive, &mut io::stderr())
}
