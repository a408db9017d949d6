// src/config/args.rs

const QUOTE: char = '\'';
const SPACE: char = ' ';

/// Split a command argument string.
///
/// Arguments are separated by spaces. A single-quoted group is kept as one
/// argument with its quotes preserved, e.g. `foo 'bar baz'` becomes
/// `["foo", "'bar baz'"]`. An unterminated quote runs to the end of input
/// and is closed.
pub fn split_args(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == SPACE {
            continue;
        }

        let mut arg = String::new();
        arg.push(ch);

        if ch == QUOTE {
            for c in chars.by_ref() {
                if c == QUOTE {
                    break;
                }
                arg.push(c);
            }
            arg.push(QUOTE);
        } else {
            while let Some(&c) = chars.peek() {
                if c == SPACE {
                    break;
                }
                arg.push(c);
                chars.next();
            }
        }

        out.push(arg);
    }

    out
}
