//! Composer input lines.
//!
//! A line is plain chat text unless it starts with one of the slash commands
//! below. `//` escapes a literal leading slash.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::path::{Path, PathBuf};

use arena_lobby::model::Attachment;
use arena_lobby::surface::classify_attachment;

use crate::CliError;

pub const HELP: &str = "\
/call                 share a fresh call link
/attach PATH [MEDIA]  stage a file for the next message
/detach               drop the staged file
/help                 show this help
/quit                 leave the lobby";

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Call,
    Attach { path: PathBuf, media_type: Option<String> },
    Detach,
    Help,
    Quit,
    Unknown(String),
}

#[must_use]
pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(escaped) = line.strip_prefix("//") {
        return Input::Text(format!("/{escaped}"));
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_owned());
    };

    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "call" => Input::Call,
        "detach" => Input::Detach,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "attach" => match parts.next() {
            Some(path) => Input::Attach { path: PathBuf::from(path), media_type: parts.next().map(str::to_owned) },
            None => Input::Unknown(line.to_owned()),
        },
        _ => Input::Unknown(line.to_owned()),
    }
}

/// Media type guessed from a file extension, `application/octet-stream` when unknown.
#[must_use]
pub fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().essence_str().to_owned()
}

/// Stage a local file as an attachment.
///
/// Images keep a `file://` handle as their preview; other files carry only
/// their name.
///
/// # Errors
///
/// Returns [`CliError::Attachment`] when the path cannot be resolved and
/// [`CliError::NotAFile`] when it names a directory.
pub fn load_attachment(path: &Path, media_type: Option<&str>) -> Result<Attachment, CliError> {
    let resolved = std::fs::canonicalize(path).map_err(|source| CliError::Attachment {
        path: path.display().to_string(),
        source,
    })?;
    if !resolved.is_file() {
        return Err(CliError::NotAFile(path.display().to_string()));
    }

    let name = resolved
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let media_type = media_type.map_or_else(|| guess_media_type(&resolved), str::to_owned);
    let preview = format!("file://{}", resolved.display());
    Ok(classify_attachment(&name, &media_type, Some(preview)))
}
