//! File and directory operations inside the session.
//!
//! Several filesystem tools answer with plain text rather than JSON; the
//! parsers below turn those replies into typed values.

use std::collections::BTreeMap;

use proto::{BoolResult, OperationResult, ToolCall};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::McpSession;
use crate::invoker::{call_bool, call_text, call_tool, check_choice, decode_with};

/// Modes accepted by `write_file`.
pub const WRITE_MODES: &[&str] = &["overwrite", "append"];

/// One text replacement applied by `edit_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEdit {
    #[serde(rename = "oldText")]
    pub old_text: String,
    #[serde(rename = "newText")]
    pub new_text: String,
}

impl FileEdit {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
    pub modified: String,
    /// Remaining `key: value` attributes, e.g. `permissions`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
}

/// Value is the file content.
pub type FileContentResult = OperationResult<String>;
pub type FileInfoResult = OperationResult<FileInfo>;
pub type DirectoryListResult = OperationResult<Vec<DirectoryEntry>>;
/// File contents keyed by the path the tool reported.
pub type MultipleFilesResult = OperationResult<BTreeMap<String, String>>;
/// Matching paths.
pub type FileSearchResult = OperationResult<Vec<String>>;

pub struct FileSystem<'a> {
    session: &'a dyn McpSession,
}

impl<'a> FileSystem<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    pub async fn read_file(&self, path: &str) -> FileContentResult {
        call_text(self.session, ToolCall::new("read_file").arg("path", path)).await
    }

    /// Writes `content` to `path`; `mode` is `overwrite` or `append`.
    pub async fn write_file(&self, path: &str, content: &str, mode: &str) -> BoolResult {
        if let Err(e) = check_choice("mode", mode, WRITE_MODES) {
            return BoolResult::from_error("", &e);
        }
        let call = ToolCall::new("write_file")
            .arg("path", path)
            .arg("content", content)
            .arg("mode", mode);
        call_bool(self.session, call).await
    }

    /// Creates `path` including missing parents.
    pub async fn create_directory(&self, path: &str) -> BoolResult {
        call_bool(
            self.session,
            ToolCall::new("create_directory").arg("path", path),
        )
        .await
    }

    /// Applies `edits` in order; with `dry_run` the tool only reports the diff.
    pub async fn edit_file(&self, path: &str, edits: &[FileEdit], dry_run: bool) -> BoolResult {
        let edits: Vec<serde_json::Value> = edits
            .iter()
            .map(|e| json!({ "oldText": e.old_text, "newText": e.new_text }))
            .collect();
        let call = ToolCall::new("edit_file")
            .arg("path", path)
            .arg("edits", edits)
            .arg("dryRun", dry_run);
        call_bool(self.session, call).await
    }

    pub async fn get_file_info(&self, path: &str) -> FileInfoResult {
        let result = call_tool(
            self.session,
            ToolCall::new("get_file_info").arg("path", path),
        )
        .await;
        decode_with(result, "file info", parse_file_info)
    }

    pub async fn list_directory(&self, path: &str) -> DirectoryListResult {
        let result = call_tool(
            self.session,
            ToolCall::new("list_directory").arg("path", path),
        )
        .await;
        decode_with(result, "directory listing", |data| {
            Ok(parse_directory_listing(data))
        })
    }

    pub async fn move_file(&self, source: &str, destination: &str) -> BoolResult {
        let call = ToolCall::new("move_file")
            .arg("source", source)
            .arg("destination", destination);
        call_bool(self.session, call).await
    }

    /// Searches below `path` for names matching `pattern`.
    pub async fn search_files(
        &self,
        path: &str,
        pattern: &str,
        exclude_patterns: &[&str],
    ) -> FileSearchResult {
        let mut call = ToolCall::new("search_files")
            .arg("path", path)
            .arg("pattern", pattern);
        if !exclude_patterns.is_empty() {
            call = call.arg("excludePatterns", exclude_patterns.join(","));
        }
        let result = call_tool(self.session, call).await;
        decode_with(result, "search results", |data| Ok(parse_search_results(data)))
    }

    pub async fn read_multiple_files(&self, paths: &[&str]) -> MultipleFilesResult {
        let call = ToolCall::new("read_multiple_files").arg("paths", paths.to_vec());
        let result = call_tool(self.session, call).await;
        decode_with(result, "file contents", |data| Ok(parse_multiple_files(data)))
    }
}

/// Parses `key: value` lines. `name` is required; `size` must be numeric.
fn parse_file_info(data: &str) -> Result<FileInfo, String> {
    let mut info = FileInfo::default();
    let mut has_name = false;

    for line in data.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "name" => {
                info.name = value.to_string();
                has_name = true;
            }
            "size" => {
                info.size = value
                    .parse()
                    .map_err(|_| format!("invalid size '{value}'"))?;
            }
            "isDirectory" => info.is_directory = value.eq_ignore_ascii_case("true"),
            "modified" => info.modified = value.to_string(),
            _ => {
                info.attributes.insert(key.to_string(), value.to_string());
            }
        }
    }

    if !has_name {
        return Err("missing name".to_string());
    }
    Ok(info)
}

fn parse_directory_listing(data: &str) -> Vec<DirectoryEntry> {
    data.lines()
        .filter_map(|line| {
            let line = line.trim();
            if let Some(name) = line.strip_prefix("[DIR]") {
                Some(DirectoryEntry {
                    name: name.trim().to_string(),
                    is_directory: true,
                })
            } else {
                line.strip_prefix("[FILE]").map(|name| DirectoryEntry {
                    name: name.trim().to_string(),
                    is_directory: false,
                })
            }
        })
        .collect()
}

fn parse_search_results(data: &str) -> Vec<String> {
    if data.trim() == "No matches found" {
        return Vec::new();
    }
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Blocks of `path:\ncontent` separated by `---` lines.
fn parse_multiple_files(data: &str) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in data.lines() {
        if line.trim() == "---" {
            if let Some(path) = current.take() {
                files.insert(path, body.join("\n").trim().to_string());
            }
            body.clear();
            continue;
        }
        if current.is_none()
            && let Some(path) = line.trim_end().strip_suffix(':')
        {
            current = Some(path.trim().to_string());
            continue;
        }
        body.push(line);
    }
    if let Some(path) = current {
        files.insert(path, body.join("\n").trim().to_string());
    }
    files
}
