use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read usernames from a newline-delimited file. Blank lines and
/// surrounding whitespace are ignored.
pub fn read_users_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read users file at {}", path.display()))?;
    Ok(parse_lines(&content))
}

/// Split a comma-separated `--users` argument into usernames.
pub fn parse_users_arg(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_skips_blanks() {
        let users = parse_lines("alice\n\n  bob  \n\ncarol\n");
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_parse_users_arg() {
        let users = parse_users_arg("alice, bob,carol,");
        assert_eq!(users, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_read_missing_file_errors() {
        let path = std::env::temp_dir().join("pr_pulse_no_such_users_file");
        let _ = std::fs::remove_file(&path);
        assert!(read_users_file(&path).is_err());
    }
}
