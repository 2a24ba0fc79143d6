//! Interactive folder acquisition.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use color_eyre::eyre::{Result, bail};

use treecmp_compare::validate_root;

/// Ask for a folder until the answer validates.
///
/// Fails only when the input is closed before a valid folder is given.
pub fn prompt_for_root(label: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf> {
    loop {
        write!(output, "Enter the path of the {label}: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No {label} given");
        }

        match validate_root(label, clean_input(&line)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                tracing::debug!(%err, "rejected folder");
                writeln!(output, "{err}")?;
            }
        }
    }
}

/// Strip whitespace and the quotes terminals add to dropped paths.
fn clean_input(line: &str) -> &str {
    let trimmed = line.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}
