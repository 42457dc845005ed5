//! Discovery and loading of log files.
//!
//! Inputs are plain `.log` files or gzip archives of them, given directly or
//! as directories. Compressed logs are inflated into a scratch directory and
//! then read like any plain log. Text is decoded by trying an ordered list of
//! candidate encodings, stopping at the first that decodes cleanly.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, GBK, UTF_8};
use flate2::read::MultiGzDecoder;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to list directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decompress {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write scratch file in {}: {source}", path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid text in any of: {tried}", path.display())]
    Undecodable { path: PathBuf, tried: String },
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),
    #[error("at least one text encoding is required")]
    NoEncodings,
}

/// How a log file is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Plain,
    Compressed,
}

/// A single log file to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub path: PathBuf,
    pub kind: SourceKind,
}

/// File-name suffixes that identify log files inside directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    pub plain: Vec<String>,
    pub compressed: Vec<String>,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            plain: vec![".log".to_string()],
            compressed: vec![".gz".to_string()],
        }
    }
}

impl Extensions {
    /// Classifies a path by its file name, or `None` if it is not a log.
    pub fn classify(&self, path: &Path) -> Option<SourceKind> {
        let name = path.file_name()?.to_string_lossy();
        if self.compressed.iter().any(|ext| name.ends_with(ext.as_str())) {
            Some(SourceKind::Compressed)
        } else if self.plain.iter().any(|ext| name.ends_with(ext.as_str())) {
            Some(SourceKind::Plain)
        } else {
            None
        }
    }
}

/// Expands command-line paths into log sources, in input order.
///
/// A directory contributes its direct entries whose names carry a log
/// extension, sorted by file name. Any other path is taken as a log file
/// as-is, compressed only if its name says so.
pub fn expand_inputs(
    paths: &[PathBuf],
    extensions: &Extensions,
) -> Vec<Result<LogSource, SourceError>> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            match list_dir(path, extensions) {
                Ok(found) => sources.extend(found.into_iter().map(Ok)),
                Err(e) => sources.push(Err(e)),
            }
        } else {
            let kind = extensions
                .classify(path)
                .filter(|k| *k == SourceKind::Compressed)
                .unwrap_or(SourceKind::Plain);
            sources.push(Ok(LogSource {
                path: path.clone(),
                kind,
            }));
        }
    }
    sources
}

fn list_dir(dir: &Path, extensions: &Extensions) -> Result<Vec<LogSource>, SourceError> {
    let list_err = |source: io::Error| SourceError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if let Some(kind) = extensions.classify(&path) {
            found.push(LogSource { path, kind });
        }
    }
    found.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    tracing::debug!(dir = %dir.display(), count = found.len(), "expanded directory");
    Ok(found)
}

/// Ordered candidate text encodings.
#[derive(Clone, PartialEq, Eq)]
pub struct Encodings(Vec<&'static Encoding>);

impl Default for Encodings {
    fn default() -> Self {
        Self(vec![UTF_8, GBK])
    }
}

impl fmt::Debug for Encodings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|e| e.name())).finish()
    }
}

impl fmt::Display for Encodings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|e| e.name()).collect();
        f.write_str(&names.join(", "))
    }
}

impl Encodings {
    /// Resolves WHATWG encoding labels such as `utf-8`, `gbk` or `latin1`.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, SourceError> {
        if labels.is_empty() {
            return Err(SourceError::NoEncodings);
        }
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                Encoding::for_label(label.trim().as_bytes())
                    .ok_or_else(|| SourceError::UnknownEncoding(label.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Decodes with the first encoding that accepts every byte.
    pub fn decode(&self, bytes: &[u8]) -> Option<(String, &'static Encoding)> {
        self.0.iter().find_map(|encoding| {
            let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
            let text = text.strip_prefix('\u{feff}').unwrap_or(&text[..]).to_string();
            Some((text, *encoding))
        })
    }
}

/// Inflates gzip data fully into memory.
pub fn decompress_gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    MultiGzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

/// Reads and decodes a plain log file.
pub fn read_log(path: &Path, encodings: &Encodings) -> Result<String, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) = encodings
        .decode(&bytes)
        .ok_or_else(|| SourceError::Undecodable {
            path: path.to_path_buf(),
            tried: encodings.to_string(),
        })?;
    tracing::debug!(path = %path.display(), encoding = encoding.name(), "decoded log");
    Ok(text)
}

/// Inflates a compressed log into a fresh file inside `scratch_dir`.
///
/// The scratch file has a unique name, so existing files in `scratch_dir`
/// are never touched. It is removed when the returned handle is dropped.
pub fn materialize_compressed(
    path: &Path,
    scratch_dir: &Path,
) -> Result<NamedTempFile, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let inflated = decompress_gzip(&bytes).map_err(|source| SourceError::Decompress {
        path: path.to_path_buf(),
        source,
    })?;

    let scratch_err = |source: io::Error| SourceError::Scratch {
        path: scratch_dir.to_path_buf(),
        source,
    };
    let mut scratch = tempfile::Builder::new()
        .prefix("inflated-")
        .suffix(".log")
        .tempfile_in(scratch_dir)
        .map_err(scratch_err)?;
    scratch.write_all(&inflated).map_err(scratch_err)?;
    scratch.flush().map_err(scratch_err)?;
    Ok(scratch)
}

/// Loads the decoded text of a log source.
pub fn load(
    source: &LogSource,
    encodings: &Encodings,
    scratch_dir: &Path,
) -> Result<String, SourceError> {
    match source.kind {
        SourceKind::Plain => read_log(&source.path, encodings),
        SourceKind::Compressed => {
            let scratch = materialize_compressed(&source.path, scratch_dir)?;
            read_log(scratch.path(), encodings)
        }
    }
}
