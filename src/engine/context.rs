//! Isolated execution context
//!
//! An [`ExecutionContext`] holds the resolved classpath of one analysis run
//! and a scratch directory for engine inputs. While a context is entered, the
//! thread's ambient classpath is the context's own; leaving the scope, by any
//! exit path including unwinding, restores whatever was ambient before.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::debug;

use crate::error::{BridgeError, ConfigError, EngineError};

thread_local! {
    static AMBIENT_CLASSPATH: RefCell<Option<Arc<[PathBuf]>>> = const { RefCell::new(None) };
}

/// Classpath ambient on the current thread, if a context is entered
pub fn ambient_classpath() -> Option<Arc<[PathBuf]>> {
    AMBIENT_CLASSPATH.with(|ambient| ambient.borrow().clone())
}

fn swap_ambient(classpath: Option<Arc<[PathBuf]>>) -> Option<Arc<[PathBuf]>> {
    AMBIENT_CLASSPATH.with(|ambient| ambient.replace(classpath))
}

/// Resolved dependencies and scratch space for one analysis run
#[derive(Debug)]
pub struct ExecutionContext {
    classpath: Arc<[PathBuf]>,
    scratch: TempDir,
}

impl ExecutionContext {
    /// Resolve every dependency to an absolute path.
    ///
    /// Relative dependencies are taken relative to `root`. A dependency that
    /// does not resolve is a configuration error.
    pub fn new<P: AsRef<Path>>(root: &Path, dependencies: &[P]) -> Result<Self, BridgeError> {
        let classpath = dependencies
            .iter()
            .map(|dependency| resolve(root, dependency.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let scratch = tempfile::Builder::new()
            .prefix("rulebridge-")
            .tempdir()
            .map_err(|source| EngineError::Input {
                path: std::env::temp_dir().display().to_string(),
                source,
            })?;

        debug!(
            dependencies = classpath.len(),
            scratch = %scratch.path().display(),
            "Created execution context"
        );

        Ok(Self {
            classpath: classpath.into(),
            scratch,
        })
    }

    /// Resolved classpath entries, in configuration order
    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }

    /// Directory for transient engine inputs and outputs
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Write the classpath as a list file, one entry per line.
    ///
    /// Returns `None` when the classpath is empty.
    pub fn write_classpath_file(&self) -> Result<Option<PathBuf>, EngineError> {
        if self.classpath.is_empty() {
            return Ok(None);
        }

        let path = self.scratch_dir().join("aux-classpath.txt");
        let content = self
            .classpath
            .iter()
            .map(|entry| entry.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&path, content).map_err(|source| EngineError::Input {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(path))
    }

    /// Install this context's classpath as the ambient one until the
    /// returned guard is dropped.
    pub fn enter(&self) -> ContextScope<'_> {
        let previous = swap_ambient(Some(Arc::clone(&self.classpath)));
        ContextScope {
            previous,
            _context: PhantomData,
        }
    }

    /// Release the scratch directory
    pub fn close(self) -> io::Result<()> {
        self.scratch.close()
    }
}

fn resolve(root: &Path, dependency: &Path) -> Result<PathBuf, ConfigError> {
    let candidate = if dependency.is_absolute() {
        dependency.to_path_buf()
    } else {
        root.join(dependency)
    };
    fs::canonicalize(&candidate).map_err(|source| ConfigError::UnresolvableDependency {
        path: dependency.display().to_string(),
        source,
    })
}

/// Guard restoring the previous ambient classpath on drop
#[must_use = "the context is left as soon as the scope is dropped"]
pub struct ContextScope<'a> {
    previous: Option<Arc<[PathBuf]>>,
    _context: PhantomData<(&'a ExecutionContext, *const ())>,
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        swap_ambient(self.previous.take());
    }
}
