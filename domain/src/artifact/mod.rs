//! Output artifact naming.
//!
//! Every file the pipeline writes (team responses, error files, the final
//! decision) gets its path from [`ArtifactPathResolver`]. Resolution is a
//! small ordered table of rules; the first rule that applies wins:
//!
//! | # | condition | directory | file name |
//! |---|-----------|-----------|-----------|
//! | 1 | `output_path`, single target | - | `output_path` verbatim |
//! | 2 | `output_path`, several targets | `dirname(output_path)` | `{stem(output_path)}_{seed}{ext(output_path)}` |
//! | 3 | otherwise | `output_dir` / source dir / `{source dir}/responses` | `{stem(source)}_{seed}{ext}` |
//!
//! The seed is `{provider}_{model}` (model sanitized) for a dispatch target
//! or a fixed label such as `decision`. Error artifacts use the same
//! location with `_error` spliced in before the extension.
//!
//! Nothing here touches the filesystem; directories are created by the
//! artifact store at write time.

use crate::core::model::{ResolvedTarget, sanitize_model};
use std::path::{Path, PathBuf};

/// Which family of operation is writing; decides the defaults of rule 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFlavor {
    /// Plain multi-model dispatch: `.txt`, next to the source file
    Raw,
    /// Persona and decision flows: `.md`, under `{source dir}/responses`
    Persona,
}

impl ArtifactFlavor {
    pub fn default_extension(&self) -> &'static str {
        match self {
            ArtifactFlavor::Raw => ".txt",
            ArtifactFlavor::Persona => ".md",
        }
    }
}

/// Caller-supplied output options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Exact output file (its extension wins over `output_extension`)
    pub output_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// With or without the leading dot
    pub output_extension: Option<String>,
}

impl OutputOptions {
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_output_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_extension = Some(ext.into());
        self
    }
}

/// What distinguishes one artifact from its siblings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactName {
    Target { provider: String, model: String },
    Label(String),
}

impl ArtifactName {
    pub fn target(target: &ResolvedTarget) -> Self {
        ArtifactName::Target {
            provider: target.provider.clone(),
            model: target.model.clone(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        ArtifactName::Label(label.into())
    }

    fn seed(&self) -> String {
        match self {
            ArtifactName::Target { provider, model } => {
                format!("{}_{}", provider, sanitize_model(model))
            }
            ArtifactName::Label(label) => label.clone(),
        }
    }
}

/// Everything the resolver needs for one artifact
#[derive(Debug, Clone)]
pub struct ArtifactRequest<'a> {
    pub source_file: &'a Path,
    pub name: ArtifactName,
    pub options: &'a OutputOptions,
    /// Whether this artifact is the only one produced by the batch
    pub single_target: bool,
    pub flavor: ArtifactFlavor,
}

/// A resolved location; `path()` for the success file, `error_path()` for
/// the error file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub dir: PathBuf,
    pub stem: String,
    pub extension: String,
    verbatim: Option<PathBuf>,
}

impl ArtifactLocation {
    pub fn path(&self) -> PathBuf {
        match &self.verbatim {
            Some(path) => path.clone(),
            None => self.dir.join(format!("{}{}", self.stem, self.extension)),
        }
    }

    /// `{stem}_error{ext}` in the same directory (`_error{ext}` for an
    /// empty stem)
    pub fn error_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_error{}", self.stem, self.extension))
    }
}

type Rule = fn(&ArtifactRequest<'_>) -> Option<ArtifactLocation>;

/// Rules in precedence order; [`source_file_naming`] applies when none match
const RULES: &[Rule] = &[exact_output_path, output_path_as_template];

/// Resolves artifact paths
pub struct ArtifactPathResolver;

impl ArtifactPathResolver {
    pub fn locate(request: &ArtifactRequest<'_>) -> ArtifactLocation {
        RULES
            .iter()
            .find_map(|rule| rule(request))
            .unwrap_or_else(|| source_file_naming(request))
    }

    pub fn resolve(request: &ArtifactRequest<'_>) -> PathBuf {
        Self::locate(request).path()
    }

    pub fn resolve_error(request: &ArtifactRequest<'_>) -> PathBuf {
        Self::locate(request).error_path()
    }
}

/// Rule 1
fn exact_output_path(request: &ArtifactRequest<'_>) -> Option<ArtifactLocation> {
    let output_path = request.options.output_path.as_ref()?;
    if !request.single_target {
        return None;
    }
    let (stem, extension) = split_file_name(output_path);
    Some(ArtifactLocation {
        dir: parent_dir(output_path),
        stem,
        extension,
        verbatim: Some(output_path.clone()),
    })
}

/// Rule 2
fn output_path_as_template(request: &ArtifactRequest<'_>) -> Option<ArtifactLocation> {
    let output_path = request.options.output_path.as_ref()?;
    let (base, extension) = split_file_name(output_path);
    Some(ArtifactLocation {
        dir: parent_dir(output_path),
        stem: format!("{}_{}", base, request.name.seed()),
        extension,
        verbatim: None,
    })
}

/// Rule 3
fn source_file_naming(request: &ArtifactRequest<'_>) -> ArtifactLocation {
    let dir = match &request.options.output_dir {
        Some(dir) => dir.clone(),
        None => {
            let source_dir = parent_dir(request.source_file);
            match request.flavor {
                ArtifactFlavor::Raw => source_dir,
                ArtifactFlavor::Persona => source_dir.join("responses"),
            }
        }
    };
    let extension = request
        .options
        .output_extension
        .as_deref()
        .map(normalize_extension)
        .unwrap_or_else(|| request.flavor.default_extension().to_string());
    let (source_stem, _) = split_file_name(request.source_file);

    ArtifactLocation {
        dir,
        stem: format!("{}_{}", source_stem, request.name.seed()),
        extension,
        verbatim: None,
    }
}

/// `py` → `.py`, `.py` → `.py`, empty stays empty
pub fn normalize_extension(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Directory of `path`, `.` when it has none
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `(stem, ".ext")`; the extension is empty when the name has none
fn split_file_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, extension)
}
