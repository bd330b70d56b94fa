// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter for file and path-template options.
//!
//! Output files and directories are placed below the output directory, which
//! itself lies below the root directory. Input files are resolved against the
//! directory of the option file that named them, or the root directory if the
//! value was not read from a file. Both directories are options themselves
//! (`output.path`, `rootDirectory`), and `output.disable` suppresses all
//! default output paths.

use super::{invalid_value, unsupported_target};
use crate::domain::{
    ClassSpec, ConfigError, Configurable, FileKind, OptionSource, OptionSpec, OptionType,
    OptionValue, PathTemplate, Result, SecondaryOption,
};
use crate::ports::{ConversionContext, FileReader, FileType, TypeConverter};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// The options controlling the file converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConverterOptions {
    /// Directory for output files, relative to the root directory
    pub output_path: String,
    /// Suppresses all default output files
    pub output_disabled: bool,
    /// Base directory for relative paths not read from a file
    pub root_directory: String,
}

impl Default for FileConverterOptions {
    fn default() -> Self {
        FileConverterOptions {
            output_path: "output/".to_string(),
            output_disabled: false,
            root_directory: ".".to_string(),
        }
    }
}

impl Configurable for FileConverterOptions {
    fn options() -> ClassSpec<Self> {
        ClassSpec::new("")
            .description("File handling")
            .option(
                OptionSpec::field(
                    "output_path",
                    |o: &Self| &o.output_path,
                    |o, v| o.output_path = v,
                )
                .name("output.path")
                .secure()
                .description("directory to put all output files in"),
            )
            .option(
                OptionSpec::field(
                    "output_disabled",
                    |o: &Self| &o.output_disabled,
                    |o, v| o.output_disabled = v,
                )
                .name("output.disable")
                .secure()
                .description("disable all default output files"),
            )
            .option(
                OptionSpec::field(
                    "root_directory",
                    |o: &Self| &o.root_directory,
                    |o, v| o.root_directory = v,
                )
                .name("rootDirectory")
                .secure()
                .description("base directory for all relative paths"),
            )
    }
}

/// Resolves and checks path options annotated with a file annotation.
///
/// In safe mode, values that are absolute paths (outside the system temporary
/// directory) or that leave their start directory through `..` are rejected.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::converters::{FileConverterOptions, FileTypeConverter};
/// use optcfg::adapters::InMemoryFileReader;
/// use optcfg::domain::{FileKind, FileOption, OptionType, OptionValue, SecondaryOption};
/// use optcfg::ports::{ConversionContext, TypeConverter};
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// let converter = FileTypeConverter::new(
///     &FileConverterOptions::default(),
///     false,
///     Arc::new(InMemoryFileReader::new()),
/// )
/// .unwrap();
/// let annotation = SecondaryOption::from(FileOption::new(FileKind::OutputFile));
/// let ctx = ConversionContext::new("report.file").with_secondary(Some(&annotation));
/// let value = converter.convert(&ctx, "report.txt", &OptionType::Path).unwrap();
/// assert_eq!(value, OptionValue::Path(PathBuf::from("./output/report.txt")));
/// ```
#[derive(Debug, Clone)]
pub struct FileTypeConverter {
    root_path: PathBuf,
    output_path: PathBuf,
    output_disabled: bool,
    safe_mode: bool,
    reader: Arc<dyn FileReader>,
}

impl FileTypeConverter {
    /// Creates a converter.
    ///
    /// # Errors
    ///
    /// In safe mode, the configured directories must themselves be safe.
    pub fn new(
        options: &FileConverterOptions,
        safe_mode: bool,
        reader: Arc<dyn FileReader>,
    ) -> Result<Self> {
        let root_path = PathBuf::from(&options.root_directory);
        let output = PathBuf::from(&options.output_path);
        if safe_mode {
            Self::check_safe_path("rootDirectory", &root_path)?;
            Self::check_safe_path("output.path", &output)?;
        }
        let output_path = root_path.join(output);
        Ok(FileTypeConverter {
            root_path,
            output_path,
            output_disabled: options.output_disabled,
            safe_mode,
            reader,
        })
    }

    /// Creates a converter with the default directories, which are safe.
    pub fn from_defaults(safe_mode: bool, reader: Arc<dyn FileReader>) -> Self {
        let options = FileConverterOptions::default();
        let root_path = PathBuf::from(&options.root_directory);
        FileTypeConverter {
            output_path: root_path.join(&options.output_path),
            root_path,
            output_disabled: options.output_disabled,
            safe_mode,
            reader,
        }
    }

    /// The base directory for relative paths.
    pub fn root_directory(&self) -> &Path {
        &self.root_path
    }

    /// The directory output files are placed in.
    pub fn output_directory(&self) -> &Path {
        &self.output_path
    }

    /// True if default output files are suppressed.
    pub fn is_output_disabled(&self) -> bool {
        self.output_disabled
    }

    /// True if unsafe paths are rejected.
    pub fn is_safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn check_safe_path(option: &str, path: &Path) -> Result<()> {
        let forbidden = |reason: &str| {
            ConfigError::invalid(format!(
                "The option {option} specifies the path '{}' that is forbidden in safe mode because {reason}.",
                path.display()
            ))
        };

        let temp_dir = std::env::temp_dir();
        let relative = if path.is_absolute() {
            // absolute paths are only allowed below the temp directory
            path.strip_prefix(&temp_dir)
                .map_err(|_| forbidden("it is absolute"))?
        } else {
            path
        };

        let mut depth: i64 = 0;
        for component in relative.components() {
            match component {
                Component::ParentDir => depth -= 1,
                Component::CurDir => {}
                _ => depth += 1,
            }
            if depth < 0 {
                return Err(forbidden("it is not below the current directory"));
            }
        }
        Ok(())
    }

    fn file_kind(ctx: &ConversionContext<'_>) -> Result<FileKind> {
        match ctx.secondary {
            Some(SecondaryOption::File(annotation)) => Ok(annotation.kind),
            _ => Err(ConfigError::unsupported(
                ctx.option_name,
                "path options need a FileOption annotation",
            )),
        }
    }

    fn resolve(&self, path: &Path, kind: FileKind, source: Option<&OptionSource>) -> PathBuf {
        if kind.is_output() {
            return self.output_path.join(path);
        }
        let base = source
            .and_then(OptionSource::path)
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty());
        match base {
            Some(dir) => dir.join(path),
            None => self.root_path.join(path),
        }
    }

    fn check_applicability(
        &self,
        ctx: &ConversionContext<'_>,
        path: &Path,
        kind: FileKind,
    ) -> Result<()> {
        let shown = path.display().to_string();
        match (kind, self.reader.file_type(path)) {
            (FileKind::OutputDirectory, Some(FileType::File)) => Err(invalid_value(
                ctx,
                &shown,
                "path is a file instead of a directory",
            )),
            (FileKind::OutputDirectory, _) => Ok(()),
            (_, Some(FileType::Directory)) => Err(invalid_value(
                ctx,
                &shown,
                "path is a directory instead of a file",
            )),
            (FileKind::RequiredInputFile, _) => {
                self.reader.check_readable(path).map_err(|e| {
                    invalid_value(ctx, &shown, format!("file does not exist or is not readable: {e}"))
                })
            }
            _ => Ok(()),
        }
    }

    fn handle_path(
        &self,
        ctx: &ConversionContext<'_>,
        path: &Path,
        kind: FileKind,
        source: Option<&OptionSource>,
    ) -> Result<PathBuf> {
        let resolved = self.resolve(path, kind, source);
        self.check_applicability(ctx, &resolved, kind)?;
        Ok(resolved)
    }

    fn template(&self, template: &str, kind: FileKind, source: Option<&OptionSource>) -> PathTemplate {
        let resolved = self.resolve(Path::new(template), kind, source);
        PathTemplate::of_format_string(resolved.to_string_lossy().into_owned())
    }

    fn convert_default_value(
        &self,
        ctx: &ConversionContext<'_>,
        default: OptionValue,
        kind: FileKind,
    ) -> Result<OptionValue> {
        if kind.is_output() && self.output_disabled {
            return Ok(match default {
                OptionValue::Collection(_) => OptionValue::Collection(Vec::new()),
                _ => OptionValue::Absent,
            });
        }
        match default {
            OptionValue::Path(path) => self
                .handle_path(ctx, &path, kind, None)
                .map(OptionValue::Path),
            OptionValue::PathTemplate(template) => Ok(OptionValue::PathTemplate(self.template(
                template.template(),
                kind,
                None,
            ))),
            OptionValue::Collection(items) => items
                .into_iter()
                .map(|item| self.convert_default_value(ctx, item, kind))
                .collect::<Result<Vec<_>>>()
                .map(OptionValue::Collection),
            other => Ok(other),
        }
    }
}

impl TypeConverter for FileTypeConverter {
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue> {
        let kind = Self::file_kind(ctx)?;
        let path = Path::new(value);
        match target {
            OptionType::Path | OptionType::PathTemplate if self.safe_mode => {
                Self::check_safe_path(ctx.option_name, path)?;
            }
            OptionType::Path | OptionType::PathTemplate => {}
            other => return Err(unsupported_target(ctx, "FileTypeConverter", other)),
        }

        if matches!(target, OptionType::PathTemplate) {
            return Ok(OptionValue::PathTemplate(self.template(value, kind, ctx.source)));
        }
        self.handle_path(ctx, path, kind, ctx.source)
            .map(OptionValue::Path)
    }

    fn convert_default(
        &self,
        ctx: &ConversionContext<'_>,
        default: OptionValue,
        _target: &OptionType,
    ) -> Result<OptionValue> {
        if matches!(default, OptionValue::Absent) {
            return Ok(default);
        }
        let kind = Self::file_kind(ctx)?;
        self.convert_default_value(ctx, default, kind)
    }
}
