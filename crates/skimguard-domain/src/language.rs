//! Language identification and comment syntax lookup.
//!
//! A [`LanguageTable`] is built once from a [`LanguagesFile`] and shared by
//! reference; it holds no interior mutability.

use std::path::Path;

use skimguard_types::{CommentDefinition, LanguageDefinition, LanguagesFile};

/// Comment markers for one language. Empty strings mean "not available".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax<'a> {
    pub inline: &'a str,
    pub prefix: &'a str,
    pub suffix: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    languages: Vec<LanguageDefinition>,
    comments: Vec<CommentDefinition>,
}

impl LanguageTable {
    pub fn new(file: LanguagesFile) -> Self {
        Self {
            languages: file.language,
            comments: file.comment,
        }
    }

    pub fn built_in() -> Self {
        Self::new(LanguagesFile::built_in())
    }

    /// Language id for a file name or path.
    ///
    /// Exact file names (case-insensitive) are checked first, then extensions.
    pub fn language_for_file_name(&self, name: &str) -> Option<&str> {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(name);

        if let Some(lang) = self.languages.iter().find(|l| {
            l.file_names
                .iter()
                .any(|f| f.eq_ignore_ascii_case(file_name))
        }) {
            return Some(lang.name.as_str());
        }

        let ext = Path::new(file_name).extension().and_then(|e| e.to_str())?;
        self.languages
            .iter()
            .find(|l| {
                l.extensions.iter().any(|e| {
                    e.strip_prefix('.')
                        .unwrap_or(e)
                        .eq_ignore_ascii_case(ext)
                })
            })
            .map(|l| l.name.as_str())
    }

    pub fn comment_syntax(&self, language: &str) -> Option<CommentSyntax<'_>> {
        self.comments
            .iter()
            .find(|c| c.languages.iter().any(|l| l == language))
            .map(|c| CommentSyntax {
                inline: &c.inline,
                prefix: &c.prefix,
                suffix: &c.suffix,
            })
    }

    pub fn comment_inline(&self, language: &str) -> &str {
        self.comment_syntax(language).map_or("", |c| c.inline)
    }

    pub fn comment_prefix(&self, language: &str) -> &str {
        self.comment_syntax(language).map_or("", |c| c.prefix)
    }

    pub fn comment_suffix(&self, language: &str) -> &str {
        self.comment_syntax(language).map_or("", |c| c.suffix)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.name.as_str())
    }
}
