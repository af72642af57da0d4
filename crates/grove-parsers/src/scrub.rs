//! Comment and string-literal scrubbing before usage scanning

/// Blank out comments and string literal contents, preserving line
/// structure so downstream line numbers stay correct. Handles `//` line
/// comments, nested `/* */` block comments, and double-quoted strings with
/// escapes.
pub fn scrub(content: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment(usize),
        Str,
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment(1);
                }
                '"' => {
                    out.push(' ');
                    state = State::Str;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment(depth) => match c {
                '\n' => out.push('\n'),
                '*' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = if depth == 1 { State::Code } else { State::BlockComment(depth - 1) };
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment(depth + 1);
                }
                _ => out.push(' '),
            },
            State::Str => match c {
                '\\' => {
                    out.push(' ');
                    if let Some(&escaped) = chars.peek() {
                        chars.next();
                        out.push(if escaped == '\n' { '\n' } else { ' ' });
                    }
                }
                '"' => {
                    out.push(' ');
                    state = State::Code;
                }
                '\n' => {
                    // Unterminated literal; give up at the line break.
                    out.push('\n');
                    state = State::Code;
                }
                _ => out.push(' '),
            },
        }
    }
    out
}
