//! Input document discovery.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Extensions of the document formats the service converts.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["pdf", "docx", "pptx", "eml", "msg", "html"];

/// Lists the supported documents directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Extensions match ignoring ASCII case.
pub async fn discover(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read input directory '{}'", dir.display()))?;

    let mut documents = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to list input directory '{}'", dir.display()))?
    {
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("failed to inspect '{}'", entry.path().display()))?;

        let path = entry.path();
        if file_type.is_file() && is_supported(&path) {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// Returns `true` if the extension names a supported document format.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("resume.pdf")));
        assert!(is_supported(Path::new("deck.PPTX")));
        assert!(is_supported(Path::new("dir/mail.eml")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("pdf")));
        assert!(!is_supported(Path::new("archive.pdf.zip")));
    }

    #[tokio::test]
    async fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PDF", "a.docx", "notes.txt", "c.html"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = discover(dir.path()).await.unwrap();
        let names: Vec<_> = found
            .iter()
            .filter_map(|path| path.file_name()?.to_str())
            .collect();

        assert_eq!(names, ["a.docx", "b.PDF", "c.html"]);
    }

    #[tokio::test]
    async fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("missing")).await.is_err());
    }
}
