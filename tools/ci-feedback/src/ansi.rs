/// Strip ANSI CSI escape sequences (ESC `[` parameters, terminated by a
/// final byte in `@`..=`~`) from a string. Everything else, newlines
/// included, passes through unchanged. Idempotent: a stripped string has no
/// remaining CSI sequences to remove.
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Consume through the final byte. Parameter and intermediate
            // bytes all sort below '@' in ASCII.
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
