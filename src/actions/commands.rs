//! Workflow commands understood by the runner

use super::RunnerEnv;
use crate::error::Result;
use anstream::println;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Escape a message for use in a `::command::` line
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn issue(command: &str, message: &str) {
    println!("::{command}::{}", escape_data(message));
}

/// Emit a warning annotation
pub fn warning(message: &str) {
    issue("warning", message);
}

/// Emit an error annotation
pub fn error(message: &str) {
    issue("error", message);
}

/// Emit a notice annotation
pub fn notice(message: &str) {
    issue("notice", message);
}

fn append_line(file: &Path, content: &str) -> Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(file)?;
    f.write_all(content.as_bytes())?;
    Ok(())
}

/// Make `dir` available on `PATH` for later workflow steps
///
/// Appends to the `GITHUB_PATH` file when the runner provides one; the
/// current process picks the directory up through its command runner.
pub fn add_path(env: &RunnerEnv, dir: &Path) -> Result<()> {
    if let Some(file) = env.path("GITHUB_PATH") {
        debug!(dir = %dir.display(), "appending to GITHUB_PATH");
        append_line(&file, &format!("{}\n", dir.display()))?;
    }
    Ok(())
}

/// Export a variable to later workflow steps via `GITHUB_ENV`
pub fn export_variable(env: &RunnerEnv, name: &str, value: &str) -> Result<()> {
    if let Some(file) = env.path("GITHUB_ENV") {
        debug!(name, "appending to GITHUB_ENV");
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        append_line(&file, &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
    }

    #[test]
    fn test_add_path_appends_to_github_path() {
        let temp = TempDir::new().unwrap();
        let path_file = temp.path().join("path.txt");
        let env = RunnerEnv::from_pairs([("GITHUB_PATH", path_file.to_string_lossy().as_ref())]);

        add_path(&env, Path::new("/opt/flutter/bin")).unwrap();
        add_path(&env, Path::new("/opt/other/bin")).unwrap();

        let content = fs::read_to_string(&path_file).unwrap();
        assert_eq!(content, "/opt/flutter/bin\n/opt/other/bin\n");
    }

    #[test]
    fn test_add_path_without_runner_file_is_noop() {
        let env = RunnerEnv::from_pairs(Vec::<(String, String)>::new());
        add_path(&env, Path::new("/opt/flutter/bin")).unwrap();
    }

    #[test]
    fn test_export_variable_uses_heredoc() {
        let temp = TempDir::new().unwrap();
        let env_file = temp.path().join("env.txt");
        let env = RunnerEnv::from_pairs([("GITHUB_ENV", env_file.to_string_lossy().as_ref())]);

        export_variable(&env, "FLUTTER_ROOT", "/home/runner/flutter").unwrap();

        let content = fs::read_to_string(&env_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("FLUTTER_ROOT<<ghadelimiter_"));
        assert_eq!(lines[1], "/home/runner/flutter");
        assert_eq!(lines[0].trim_start_matches("FLUTTER_ROOT<<"), lines[2]);
    }
}
