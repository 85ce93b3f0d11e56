use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::puzzle::Puzzle;
use crate::render::render_html;

/// Atomically write text to `path` by writing a temp file, fsyncing, then renaming it over any existing file.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut f = File::create(&tmp)?;
    f.write_all(text.as_bytes())?;
    f.sync_all()?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Files written for one puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPuzzle {
    pub html: PathBuf,
    pub description: PathBuf,
}

/// Writes `index.html` and `puzzle.json` into `dir` (created if missing)
pub fn save_puzzle(puzzle: &Puzzle, dir: &Path, icons_base: &str) -> crate::error::Result<SavedPuzzle> {
    std::fs::create_dir_all(dir)?;
    let html = dir.join("index.html");
    let description = dir.join("puzzle.json");
    write_text_atomic(&html, &render_html(puzzle, icons_base))?;
    let json = serde_json::to_string_pretty(&puzzle.describe())?;
    write_text_atomic(&description, &json)?;
    debug_print(&format!(
        "save_puzzle: wrote {} and {}",
        html.display(),
        description.display()
    ));
    Ok(SavedPuzzle { html, description })
}

fn debug_print(s: &str) {
    crate::utils::debug_print(s);
}
