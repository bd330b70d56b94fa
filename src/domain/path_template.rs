// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path templates for options that name a family of files.
//!
//! A template is a path containing `%s` / `%d` placeholders that are filled in
//! order, e.g. `output/graph-%d.dot`. `%%` stands for a literal percent sign.

use std::fmt;
use std::path::PathBuf;

/// A path with positional placeholders.
///
/// # Examples
///
/// ```
/// use optcfg::domain::path_template::PathTemplate;
/// use std::path::PathBuf;
///
/// let template = PathTemplate::of_format_string("out/report-%s-%d.txt");
/// assert_eq!(template.get_path(&[&"main", &3]), PathBuf::from("out/report-main-3.txt"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    template: String,
}

impl PathTemplate {
    /// Creates a template from a format string.
    pub fn of_format_string(template: impl Into<String>) -> Self {
        PathTemplate {
            template: template.into(),
        }
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fills the placeholders with `args` in order; missing arguments leave the
    /// placeholder as written.
    pub fn get_path(&self, args: &[&dyn fmt::Display]) -> PathBuf {
        let mut result = String::with_capacity(self.template.len());
        let mut args = args.iter();
        let mut chars = self.template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                result.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('%') => {
                    chars.next();
                    result.push('%');
                }
                Some(spec @ ('s' | 'd')) => {
                    chars.next();
                    match args.next() {
                        Some(arg) => result.push_str(&arg.to_string()),
                        None => {
                            result.push('%');
                            result.push(spec);
                        }
                    }
                }
                _ => result.push('%'),
            }
        }
        PathBuf::from(result)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
