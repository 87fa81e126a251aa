//! Page discovery and processing for a rendered site.

use std::fs;
use std::path::{Path, PathBuf};

use langtabs_config::PageFilter;
use langtabs_grouper::Enhancer;
use tracing::{debug, info};

use crate::error::CliError;

/// A page found under the site directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageFile {
    /// Path relative to the site directory, `/`-separated.
    pub relative: String,
    /// Absolute (or source-dir-joined) path on disk.
    pub path: PathBuf,
}

/// Find pages under `source_dir` selected by `filter`, sorted by relative path.
///
/// `skip_dir` (typically an output directory nested in the site) is not
/// descended into. Directories are compared by canonical path, so `.` and
/// `out` skip `./out` however each was spelled.
pub(crate) fn discover_pages(
    source_dir: &Path,
    filter: &PageFilter,
    skip_dir: Option<&Path>,
) -> Result<Vec<PageFile>, CliError> {
    if !source_dir.is_dir() {
        return Err(CliError::Validation(format!(
            "site directory not found: {}",
            source_dir.display()
        )));
    }

    // A skip dir that doesn't exist yet can't be inside the walk.
    let skip_dir = skip_dir.and_then(|dir| dir.canonicalize().ok());
    let mut pages = Vec::new();
    let walker = Walker {
        filter,
        skip_dir: skip_dir.as_deref(),
    };
    walker.walk(source_dir, "", &mut pages)?;
    pages.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!(pages = pages.len(), dir = %source_dir.display(), "discovered pages");
    Ok(pages)
}

struct Walker<'a> {
    filter: &'a PageFilter,
    skip_dir: Option<&'a Path>,
}

impl Walker<'_> {
    fn walk(&self, dir: &Path, prefix: &str, pages: &mut Vec<PageFile>) -> Result<(), CliError> {
        for entry in fs::read_dir(dir).map_err(CliError::page(dir))? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            if entry.file_type()?.is_dir() {
                if let Some(skip) = self.skip_dir
                    && path.canonicalize().is_ok_and(|dir| dir == skip)
                {
                    debug!(dir = %path.display(), "skipping output directory");
                    continue;
                }
                self.walk(&path, &relative, pages)?;
            } else if self.filter.selects(&relative) {
                pages.push(PageFile { relative, path });
            }
        }
        Ok(())
    }
}

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageOutcome {
    pub groups: usize,
    pub tab_controls: usize,
    pub written: bool,
}

/// Applies an [`Enhancer`] to pages and writes the results.
pub(crate) struct SiteProcessor {
    enhancer: Enhancer,
    output_dir: Option<PathBuf>,
    dry_run: bool,
}

impl SiteProcessor {
    /// Create a processor writing to `output_dir`, or in place when `None`.
    pub(crate) fn new(enhancer: Enhancer, output_dir: Option<PathBuf>) -> Self {
        Self {
            enhancer,
            output_dir,
            dry_run: false,
        }
    }

    /// Process pages without writing anything.
    pub(crate) fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enhance one page and write it.
    ///
    /// In place, a page is only rewritten when tab grouping changed it, so
    /// pages without tab controls and pages processed by an earlier run are
    /// left untouched. With an output directory every page is written so the
    /// output mirrors the site.
    pub(crate) fn process(&self, page: &PageFile) -> Result<PageOutcome, CliError> {
        let html = fs::read_to_string(&page.path).map_err(CliError::page(&page.path))?;
        let enhanced = self.enhancer.process(&html)?;

        let target = match &self.output_dir {
            Some(dir) => Some(dir.join(&page.relative)),
            None if enhanced.tab_controls > 0 && enhanced.html != html => {
                Some(page.path.clone())
            }
            None => None,
        };

        let written = match target {
            Some(target) if !self.dry_run => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(CliError::page(parent))?;
                }
                fs::write(&target, enhanced.html).map_err(CliError::page(&target))?;
                true
            }
            _ => false,
        };

        info!(
            page = %page.relative,
            groups = enhanced.groups,
            tab_controls = enhanced.tab_controls,
            written,
            "processed page"
        );
        Ok(PageOutcome {
            groups: enhanced.groups,
            tab_controls: enhanced.tab_controls,
            written,
        })
    }
}
