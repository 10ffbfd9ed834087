// In crates/app-config/src/symbols.rs

use core_types::Symbol;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Reads the symbol list, creating it with `default_symbol` if it does not exist.
///
/// The file is read on every call so edits are picked up by the next poll
/// cycle. Blank lines and `#` comments are ignored, and repeated tickers keep
/// only their first position.
pub fn load_symbols(path: &Path, default_symbol: &str) -> Result<Vec<Symbol>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), default_symbol, "Symbol list not found. Creating it.");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("{default_symbol}\n"))?;
    }

    let content = fs::read_to_string(path)?;
    Ok(parse_symbols(&content))
}

fn parse_symbols(content: &str) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_string()))
        .map(Symbol::from)
        .collect()
}
