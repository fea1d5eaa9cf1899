use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const HOCR_EXTENSION: &str = "hocr";

/// Sort key that compares a trailing digit run numerically, so `page9`
/// sorts before `page10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey {
    prefix: String,
    number: Option<u64>,
    extension: String,
    /// Breaks ties such as `page10` vs `page010`.
    name: String,
}

impl NaturalKey {
    pub fn new(file_name: &str) -> Self {
        let (stem, extension) = match file_name.rfind('.') {
            Some(dot) if dot > 0 => (&file_name[..dot], &file_name[dot..]),
            _ => (file_name, ""),
        };
        let digits_at = stem
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map_or(stem.len(), |(idx, _)| idx);
        let (prefix, digits) = stem.split_at(digits_at);

        Self {
            prefix: prefix.to_string(),
            // An overflowing run sorts like no number at all.
            number: digits.parse().ok(),
            extension: extension.to_string(),
            name: file_name.to_string(),
        }
    }
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// Lists the `.hocr` files directly inside `root`, in book order.
pub fn discover_pages(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("failed to list input directory {}", root.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", root.display()))?;
        let path = entry.path();
        let is_hocr = path
            .extension()
            .map(|ext| ext == HOCR_EXTENSION)
            .unwrap_or(false);
        if is_hocr && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        NaturalKey::new(&path.file_name().unwrap_or_default().to_string_lossy())
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn numeric_suffix_sorts_numerically() {
        let mut names = vec!["page10.hocr", "page9.hocr", "page1.hocr", "page.hocr"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["page.hocr", "page1.hocr", "page9.hocr", "page10.hocr"]
        );
    }

    #[test]
    fn equal_numbers_fall_back_to_file_name() {
        assert_eq!(natural_cmp("page010.hocr", "page10.hocr"), Ordering::Less);
        assert_eq!(natural_cmp("page10.hocr", "page010.hocr"), Ordering::Greater);

        let mut forward = vec!["page10.hocr", "page010.hocr", "page9.hocr"];
        let mut backward = vec!["page9.hocr", "page010.hocr", "page10.hocr"];
        forward.sort_by(|a, b| natural_cmp(a, b));
        backward.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(forward, vec!["page9.hocr", "page010.hocr", "page10.hocr"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn prefix_dominates_number() {
        assert_eq!(natural_cmp("a100.hocr", "b2.hocr"), Ordering::Less);
        assert_eq!(natural_cmp("scan_2.hocr", "scan_2.hocr"), Ordering::Equal);
    }

    #[test]
    fn only_trailing_digits_count() {
        let key = NaturalKey::new("vol2_page17.hocr");
        assert_eq!(key.prefix, "vol2_page");
        assert_eq!(key.number, Some(17));
        assert_eq!(key.extension, ".hocr");
    }

    #[test]
    fn discovers_only_hocr_files() -> Result<()> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        let dir = std::env::temp_dir().join(format!("dictstruct-files-{}-{now}", std::process::id()));
        fs::create_dir_all(&dir)?;
        for name in ["p10.hocr", "p2.hocr", "p2.png", "notes.txt"] {
            fs::write(dir.join(name), "")?;
        }

        let found: Vec<_> = discover_pages(&dir)?
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["p2.hocr", "p10.hocr"]);

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(discover_pages(Path::new("/definitely/not/here")).is_err());
    }
}
