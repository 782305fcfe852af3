use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Where a JSON document comes from: a file path, or `-` for stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    Stdin,
    File(&'a Path),
}

impl<'a> Source<'a> {
    pub fn from_arg(arg: &'a str) -> Self {
        match arg.trim() {
            "-" => Source::Stdin,
            _ => Source::File(Path::new(arg)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Stdin => "stdin".to_string(),
            Source::File(path) => format!("'{}'", path.display()),
        }
    }
}

/// Read the document named by an `--input`/`--prices` argument.
pub fn read_json<T: DeserializeOwned>(arg: &str) -> Result<T, Box<dyn std::error::Error>> {
    let source = Source::from_arg(arg);
    let contents = read_source(source)?;
    parse_document(&contents, source)?
        .ok_or_else(|| format!("No JSON document on {}", source.describe()).into())
}

/// Deserialise a document piped on stdin when no argument named one.
/// `None` when stdin is a TTY or the pipe is empty.
pub fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let contents = read_source(Source::Stdin)?;
    parse_document(&contents, Source::Stdin)
}

fn read_source(source: Source<'_>) -> Result<String, Box<dyn std::error::Error>> {
    match source {
        Source::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Source::File(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            if !path.is_file() {
                return Err(format!("Not a file: {}", path.display()).into());
            }
            fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", source.describe(), e).into())
        }
    }
}

fn parse_document<T: DeserializeOwned>(
    contents: &str,
    source: Source<'_>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse {}: {}", source.describe(), e))?;
    Ok(Some(value))
}
