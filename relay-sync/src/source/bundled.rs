//! Local templates directory.

use std::path::{Path, PathBuf};

use relay_core::{SourceDescriptor, TemplateFile};

use super::{SourceError, TemplateProvider, TemplateResult};

/// Reads every file below a fixed directory. Dotfiles are ignored.
#[derive(Debug, Clone)]
pub struct BundledTemplateProvider {
    root: PathBuf,
}

impl BundledTemplateProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_all(&self) -> Result<Vec<TemplateFile>, SourceError> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files)?;
        let mut templates = Vec::with_capacity(files.len());
        for path in files {
            let rel = path.strip_prefix(&self.root).unwrap_or(path.as_path());
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(&path).map_err(|e| read_err(&path, e))?;
            templates.push(TemplateFile::new(rel, content));
        }
        Ok(templates)
    }
}

impl TemplateProvider for BundledTemplateProvider {
    fn fetch(&self) -> TemplateResult {
        if !self.root.is_dir() {
            tracing::error!("templates directory missing: {}", self.root.display());
            return TemplateResult::failed(
                SourceError::Unavailable {
                    path: self.root.clone(),
                },
                self.describe(),
            );
        }
        match self.read_all() {
            Ok(templates) => {
                tracing::debug!(
                    "read {} bundled template(s) from {}",
                    templates.len(),
                    self.root.display()
                );
                TemplateResult::ok(templates, self.describe())
            }
            Err(err) => TemplateResult::failed(err, self.describe()),
        }
    }

    fn describe(&self) -> SourceDescriptor {
        SourceDescriptor::bundled()
    }
}

fn read_err(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| read_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| read_err(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| read_err(&path, e))?;
        if meta.is_dir() {
            collect_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let provider = BundledTemplateProvider::new(tmp.path().join("absent"));
        let result = provider.fetch();
        assert!(!result.has_templates());
        assert!(matches!(result.error, Some(SourceError::Unavailable { .. })));
    }

    #[test]
    fn lists_recursively_with_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("skills/lint")).unwrap();
        fs::create_dir_all(tmp.path().join("prompts")).unwrap();
        fs::write(tmp.path().join("copilot-instructions.md"), "A").unwrap();
        fs::write(tmp.path().join("prompts/x.md"), "B").unwrap();
        fs::write(tmp.path().join("skills/lint/SKILL.md"), "S").unwrap();
        fs::write(tmp.path().join(".DS_Store"), "junk").unwrap();

        let (templates, source) = BundledTemplateProvider::new(tmp.path())
            .fetch()
            .into_result()
            .unwrap();
        let paths: Vec<&str> = templates.iter().map(|t| t.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["copilot-instructions.md", "prompts/x.md", "skills/lint/SKILL.md"]);
        assert_eq!(source, SourceDescriptor::bundled());
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = BundledTemplateProvider::new(tmp.path()).fetch();
        assert!(!result.has_error());
        assert!(!result.has_templates());
    }
}
