//! Loading HTML from local files and standard input, and writing results back out.
//!
//! Fetching over the network belongs to the feed layer; the filter only ever
//! sees HTML that is already on hand.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::{Result, UnclutterError};

/// Where a front end reads its HTML from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input, spelled `-` on the command line.
    Stdin,
    /// A local file.
    File(String),
}

impl Source {
    /// Interprets a command-line argument.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" { Source::Stdin } else { Source::File(arg.to_string()) }
    }

    /// Reads the whole source into a string.
    pub fn read(&self) -> Result<String> {
        match self {
            Source::Stdin => read_stdin(),
            Source::File(path) => read_file(path),
        }
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(UnclutterError::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(UnclutterError::ReadError)
}

/// Reads HTML content from standard input until EOF.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(UnclutterError::ReadError)?;

    Ok(buffer)
}

/// Writes output to a local file, replacing any existing content.
pub fn write_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(UnclutterError::WriteError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_arg() {
        assert_eq!(Source::from_arg("-"), Source::Stdin);
        assert_eq!(Source::from_arg("page.html"), Source::File("page.html".to_string()));
    }

    #[test]
    fn test_read_file_not_found() {
        let result = read_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(UnclutterError::FileNotFound(_))));
    }

    #[test]
    fn test_read_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        fs::write(&path, "<p>hi</p>").unwrap();

        let content = Source::File(path.to_string_lossy().into_owned()).read().unwrap();
        assert_eq!(content, "<p>hi</p>");
    }

    #[test]
    fn test_write_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.html");

        write_file(&path, "<article>kept</article>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<article>kept</article>");
    }

    #[test]
    fn test_write_file_into_missing_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.html");

        let result = write_file(&path, "x");
        assert!(matches!(result, Err(UnclutterError::WriteError(_))));
    }
}
