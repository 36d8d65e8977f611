//! Printing utilities for header values

use std::fmt;

/// Prints its content as quoted-string, escaping `"` and `\`
pub struct Quoted<'s>(pub &'s str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;

        let mut rest = self.0;

        while let Some(idx) = rest.find(['"', '\\']) {
            f.write_str(&rest[..idx])?;
            f.write_str("\\")?;
            f.write_str(&rest[idx..idx + 1])?;
            rest = &rest[idx + 1..];
        }

        f.write_str(rest)?;
        f.write_str("\"")
    }
}
