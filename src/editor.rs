use std::path::PathBuf;
use std::{io, path::Path};

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

/// Suspend the TUI, open the catalog file defining `case_id`, then restore the TUI.
pub fn open(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    configured: Option<&str>,
    path: PathBuf,
    case_id: &str,
) -> Result<()> {
    let command = configured
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".into());
    let mut words = shell_words::split(&command)
        .with_context(|| format!("invalid editor command '{}'", command))?;
    if words.is_empty() {
        anyhow::bail!("editor command is empty");
    }
    let program = words.remove(0);

    let line = std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| find_case_line(&content, case_id));

    let mut cmd = std::process::Command::new(&program);
    cmd.args(&words);
    build_args(&mut cmd, &program, &path, line);
    info!(editor = %program, path = %path.display(), ?line, "opening editor");

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    let result = cmd.status();

    io::stdout().execute(EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    terminal.clear()?;

    result.map_err(|_| anyhow::anyhow!("editor '{}' not found or failed to launch", program))?;
    Ok(())
}

/// 1-based line of the `id` entry for `case_id` in a TOML or JSON catalog.
pub fn find_case_line(content: &str, case_id: &str) -> Option<u32> {
    let quoted = format!("\"{}\"", case_id);
    content
        .lines()
        .position(|line| {
            let trimmed = line.trim_start().trim_start_matches(['{', '[', ' ']);
            (trimmed.starts_with("id") || trimmed.starts_with("\"id\"")) && line.contains(&quoted)
        })
        .map(|i| i as u32 + 1)
}

fn build_args(cmd: &mut std::process::Command, editor: &str, path: &Path, line: Option<u32>) {
    let path_str = path.to_string_lossy();

    match (editor_kind(editor), line) {
        (EditorKind::Vim, Some(l)) => {
            cmd.arg(format!("+{}", l)).arg(path_str.as_ref());
        }
        (EditorKind::Helix | EditorKind::Zed, Some(l)) => {
            cmd.arg(format!("{}:{}", path_str, l));
        }
        (EditorKind::VSCode, Some(l)) => {
            cmd.arg("--goto").arg(format!("{}:{}", path_str, l));
        }
        (EditorKind::WebStorm, Some(l)) => {
            cmd.arg("--line").arg(l.to_string()).arg(path_str.as_ref());
        }
        (_, None) => {
            cmd.arg(path_str.as_ref());
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum EditorKind {
    Vim,
    Helix,
    VSCode,
    WebStorm,
    Zed,
}

fn editor_kind(editor: &str) -> EditorKind {
    let bin = Path::new(editor)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(editor);

    match bin {
        "hx" | "helix" => EditorKind::Helix,
        "code" | "code-insiders" | "codium" => EditorKind::VSCode,
        "webstorm" | "wstorm" => EditorKind::WebStorm,
        "zed" => EditorKind::Zed,
        _ => EditorKind::Vim,
    }
}
