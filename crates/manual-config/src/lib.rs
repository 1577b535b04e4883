//! Configuration primitives and loader for the doc-manual toolkit.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Each layer only needs to name the keys it changes; the loader merges
//! layers field by field and then validates the result into typed settings.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use manual_render::RenderOptions;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = ".doc-manual.toml";

const DEFAULT_LINK_TARGET: &str = "_blank";
const DEFAULT_IMAGE_CLASS: &str = "md-image";
const DEFAULT_DOCS_FILE: &str = "data/docs.json";
const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub render: RenderSettings,
    pub library: LibrarySettings,
    pub sources: ConfigSources,
}

/// Attributes the renderer writes onto links and images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub link_target: Option<String>,
    pub image_class: Option<String>,
    pub safe_urls: bool,
}

impl RenderSettings {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            link_target: self.link_target.clone(),
            image_class: self.image_class.clone(),
            safe_urls: self.safe_urls,
        }
    }
}

/// Where the document export lives and how its timestamps are displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibrarySettings {
    pub docs_file: PathBuf,
    pub date_format: String,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            render: resolved.render,
            library: resolved.library,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults anchored at `working_dir`, without touching the
    /// filesystem.
    pub fn defaults(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let source = ConfigSource::default(working_dir.clone());
        let library = LibrarySettings {
            docs_file: working_dir.join(DEFAULT_DOCS_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
        };
        Config {
            render: RenderSettings {
                link_target: Some(DEFAULT_LINK_TARGET.to_owned()),
                image_class: Some(DEFAULT_IMAGE_CLASS.to_owned()),
                safe_urls: true,
            },
            library,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: vec![source],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    debug!(layer = %source.kind, path = %path.display(), "applying config layer");
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    PartialConfig {
        render: RenderPartial {
            link_target: Some(Located::new(DEFAULT_LINK_TARGET.into(), source.clone())),
            image_class: Some(Located::new(DEFAULT_IMAGE_CLASS.into(), source.clone())),
            safe_urls: Some(Located::new(true, source.clone())),
        },
        library: LibraryPartial {
            docs_file: Some(Located::new(PathBuf::from(DEFAULT_DOCS_FILE), source.clone())),
            date_format: Some(Located::new(DEFAULT_DATE_FORMAT.into(), source)),
        },
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    render: RenderPartial,
    library: LibraryPartial,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        self.render.merge(other.render);
        self.library.merge(other.library);
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let link_target = self.render.link_target.and_then(|located| {
            if located.value.chars().any(char::is_whitespace) {
                let message = format!("link target '{}' must not contain whitespace", located.value);
                errors.push(
                    ConfigValidationError::new(Some(located.source), message)
                        .with_context("render.link_target"),
                );
                None
            } else {
                non_empty(located.value)
            }
        });

        let image_class = self
            .render
            .image_class
            .and_then(|located| non_empty(located.value));

        let safe_urls = self
            .render
            .safe_urls
            .map(|located| located.value)
            .unwrap_or(true);

        let docs_file = self
            .library
            .docs_file
            .map(|located| resolve_path(&located))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_FILE));

        let date_format = match self.library.date_format {
            Some(located) if located.value.trim().is_empty() => {
                errors.push(
                    ConfigValidationError::new(
                        Some(located.source),
                        "date format must not be empty".to_owned(),
                    )
                    .with_context("library.date_format"),
                );
                DEFAULT_DATE_FORMAT.to_owned()
            }
            Some(located) => located.value,
            None => DEFAULT_DATE_FORMAT.to_owned(),
        };

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            render: RenderSettings {
                link_target,
                image_class,
                safe_urls,
            },
            library: LibrarySettings {
                docs_file,
                date_format,
            },
        })
    }
}

#[derive(Clone, Debug, Default)]
struct RenderPartial {
    link_target: Option<Located<String>>,
    image_class: Option<Located<String>>,
    safe_urls: Option<Located<bool>>,
}

impl RenderPartial {
    fn merge(&mut self, other: RenderPartial) {
        if other.link_target.is_some() {
            self.link_target = other.link_target;
        }
        if other.image_class.is_some() {
            self.image_class = other.image_class;
        }
        if other.safe_urls.is_some() {
            self.safe_urls = other.safe_urls;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct LibraryPartial {
    docs_file: Option<Located<PathBuf>>,
    date_format: Option<Located<String>>,
}

impl LibraryPartial {
    fn merge(&mut self, other: LibraryPartial) {
        if other.docs_file.is_some() {
            self.docs_file = other.docs_file;
        }
        if other.date_format.is_some() {
            self.date_format = other.date_format;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

/// Relative paths resolve against the directory of the file that declared them.
fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    make_absolute(&located.value, &located.source.base_dir)
}

/// An empty string in a config file switches the attribute off.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    render: RenderSettings,
    library: LibrarySettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    render: Option<RawRender>,
    #[serde(default)]
    library: Option<RawLibrary>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            render: self
                .render
                .map(|render| render.into_partial(source.clone()))
                .unwrap_or_default(),
            library: self
                .library
                .map(|library| library.into_partial(source))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRender {
    #[serde(default)]
    link_target: Option<String>,
    #[serde(default)]
    image_class: Option<String>,
    #[serde(default)]
    safe_urls: Option<bool>,
}

impl RawRender {
    fn into_partial(self, source: ConfigSource) -> RenderPartial {
        RenderPartial {
            link_target: self
                .link_target
                .map(|value| Located::new(value, source.clone())),
            image_class: self
                .image_class
                .map(|value| Located::new(value, source.clone())),
            safe_urls: self.safe_urls.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibrary {
    #[serde(default)]
    docs_file: Option<PathBuf>,
    #[serde(default)]
    date_format: Option<String>,
}

impl RawLibrary {
    fn into_partial(self, source: ConfigSource) -> LibraryPartial {
        LibraryPartial {
            docs_file: self
                .docs_file
                .map(|value| Located::new(value, source.clone())),
            date_format: self.date_format.map(|value| Located::new(value, source)),
        }
    }
}
