//! Terminal output for command handlers.
//!
//! Everything user-facing on stdout goes through [`OutputManager`] so that
//! `--quiet` and colour handling live in one place. Warnings are the one
//! kind of line `--quiet` keeps.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::path::{Component, Path, PathBuf};

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
    Header,
    Plain,
}

pub struct OutputManager {
    quiet: bool,
    color: bool,
    interactive: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let interactive = io::stdout().is_terminal();
        Self {
            quiet: args.quiet,
            color: interactive && !args.no_color && !config.output.no_color,
            interactive,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(Tone::Plain, msg)
    }

    /// `✓ msg`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.emit(Tone::Success, msg)
    }

    /// `⚠ msg`, printed even with `--quiet`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.emit(Tone::Warning, msg)
    }

    /// `ℹ msg`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.emit(Tone::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.emit(Tone::Header, text)
    }

    /// Print planned paths as a tree under `root`.
    pub fn tree(&self, root: &Path, paths: &[PathBuf]) -> io::Result<()> {
        self.emit(Tone::Header, &format!("{}/", root.display()))?;
        for line in render_tree(root, paths) {
            self.emit(Tone::Plain, &line)?;
        }
        Ok(())
    }

    /// `true` when stdout is a terminal and prompts or spinners make sense.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn emit(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet && !matches!(tone, Tone::Warning) {
            return Ok(());
        }
        self.term.write_line(&self.style(tone, msg))
    }

    fn style(&self, tone: Tone, msg: &str) -> String {
        let symbol = match tone {
            Tone::Success => "\u{2713} ",
            Tone::Warning => "\u{26a0} ",
            Tone::Info => "\u{2139} ",
            Tone::Header | Tone::Plain => "",
        };
        if !self.color {
            return format!("{symbol}{msg}");
        }
        match tone {
            Tone::Success => format!("{}{}", symbol.green().bold(), msg.green()),
            Tone::Warning => format!("{}{}", symbol.yellow().bold(), msg.yellow()),
            Tone::Info => format!("{}{}", symbol.blue().bold(), msg.blue()),
            Tone::Header => msg.cyan().bold().to_string(),
            Tone::Plain => msg.to_string(),
        }
    }
}

// ── Tree rendering ────────────────────────────────────────────────────────────

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, segments: &[String]) {
        if let Some((first, rest)) = segments.split_first() {
            self.children.entry(first.clone()).or_default().insert(rest);
        }
    }

    fn render(&self, prefix: &str, lines: &mut Vec<String>) {
        let count = self.children.len();
        for (i, (name, child)) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let branch = if last { "└── " } else { "├── " };
            let suffix = if child.children.is_empty() { "" } else { "/" };
            lines.push(format!("{prefix}{branch}{name}{suffix}"));

            let indent = if last { "    " } else { "│   " };
            child.render(&format!("{prefix}{indent}"), lines);
        }
    }
}

/// Lines of an indented tree of `paths`, relative to `root`.
///
/// Paths outside `root` are shown in full.
pub fn render_tree(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let mut tree = TreeNode::default();
    for path in paths {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        tree.insert(&segments);
    }

    let mut lines = Vec::new();
    tree.render("", &mut lines);
    lines
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn warnings_survive_quiet_mode() {
        let out = make_manager(true, true);
        assert!(out.warning("git init skipped").is_ok());
    }

    #[test]
    fn plain_style_keeps_symbols() {
        let out = make_manager(false, true);
        assert_eq!(out.style(Tone::Success, "done"), "\u{2713} done");
        assert_eq!(out.style(Tone::Header, "Plan"), "Plan");
    }

    #[test]
    fn renders_nested_tree() {
        let root = Path::new("/out/shop");
        let paths = [
            root.join("package.json"),
            root.join("apps/web/src/App.tsx"),
            root.join("apps/web/package.json"),
            root.join("apps/api/src/server.ts"),
        ];

        assert_eq!(
            render_tree(root, &paths),
            vec![
                "├── apps/",
                "│   ├── api/",
                "│   │   └── src/",
                "│   │       └── server.ts",
                "│   └── web/",
                "│       ├── package.json",
                "│       └── src/",
                "│           └── App.tsx",
                "└── package.json",
            ]
        );
    }

    #[test]
    fn empty_plan_renders_nothing() {
        assert!(render_tree(Path::new("/out"), &[]).is_empty());
    }
}
