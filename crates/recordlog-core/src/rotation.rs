//! Daily rotating file sink
//!
//! The active file is always `{dir}{key}.log`. The first write that falls on
//! a later calendar day than the active file's period renames the active file
//! to `{key}-YYYY-MM-DD.log` (the day it covered), reopens a fresh active
//! file and purges the oldest rotated files beyond `max_files`. A `max_files`
//! of 0 never purges.
//!
//! Every line is appended with a single `write_all` on an append-mode handle,
//! so concurrent appenders (other processes included) never split a line.
//!
//! Several sinks may share one active file. Only the first to cross the day
//! boundary renames it; the others find a different file at the active path
//! and simply reopen it. Nothing here deletes an active file.

use crate::errors::{RecordLogError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Date pattern embedded in rotated file names
pub const ROTATED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// One rotating log file
#[derive(Debug)]
pub struct RotatingFile {
    dir: PathBuf,
    key: String,
    path: PathBuf,
    max_files: usize,
    file_permission: u32,
    file: Option<File>,
    period: NaiveDate,
}

impl RotatingFile {
    /// Open (or create) the active file at `path` for `key`
    ///
    /// # Errors
    ///
    /// Returns `CreateDir`, `Open` or `Purge` when the file system refuses.
    pub fn open(
        path: PathBuf,
        key: &str,
        max_files: usize,
        file_permission: u32,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(&dir).map_err(|source| RecordLogError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        // An mtime later than `now` counts as the current day.
        let existing_period = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(|modified| DateTime::<Local>::from(modified).naive_local().date());

        let file = open_append(&path, file_permission)?;

        let sink = Self {
            dir,
            key: key.to_string(),
            path,
            max_files,
            file_permission,
            file: Some(file),
            period: existing_period.map_or(now.date(), |day| day.min(now.date())),
        };
        sink.purge()?;
        Ok(sink)
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Day covered by the active file
    pub fn period(&self) -> NaiveDate {
        self.period
    }

    /// Append one complete line, rotating first if `at` is in a later period
    ///
    /// # Errors
    ///
    /// Returns `Rotate`, `Open`, `Purge` or `Write` on I/O failure. No retry
    /// is attempted.
    pub fn write_line(&mut self, at: NaiveDateTime, line: &str) -> Result<()> {
        if at.date() > self.period {
            self.rotate(at.date())?;
        }

        if self.file.is_none() {
            self.file = Some(open_append(&self.path, self.file_permission)?);
        }
        let write_err = |source| RecordLogError::Write {
            path: self.path.clone(),
            source,
        };
        match self.file.as_mut() {
            Some(file) => {
                file.write_all(line.as_bytes()).map_err(write_err)?;
                file.flush().map_err(write_err)
            }
            None => Err(write_err(io::Error::new(
                io::ErrorKind::NotFound,
                "log file handle missing",
            ))),
        }
    }

    /// Name of the rotated file covering `day`
    pub fn rotated_name(&self, day: NaiveDate) -> String {
        format!("{}-{}.log", self.key, day.format(ROTATED_DATE_FORMAT))
    }

    /// Rotated files for this key, newest first
    ///
    /// # Errors
    ///
    /// Returns `Purge` if the directory cannot be listed.
    pub fn rotated_files(&self) -> Result<Vec<(NaiveDate, PathBuf)>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| RecordLogError::Purge {
            path: self.dir.clone(),
            source,
        })?;

        let mut rotated: Vec<(NaiveDate, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let day = self.parse_rotated_name(&name.to_string_lossy())?;
                Some((day, entry.path()))
            })
            .collect();
        rotated.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rotated)
    }

    fn parse_rotated_name(&self, name: &str) -> Option<NaiveDate> {
        let date = name
            .strip_prefix(self.key.as_str())?
            .strip_prefix('-')?
            .strip_suffix(".log")?;
        NaiveDate::parse_from_str(date, ROTATED_DATE_FORMAT).ok()
    }

    fn rotate(&mut self, today: NaiveDate) -> Result<()> {
        let held = self.file.as_ref().and_then(|file| file.metadata().ok());
        let on_disk = fs::metadata(&self.path).ok();
        let ours = match (&held, &on_disk) {
            (Some(held), Some(on_disk)) => same_file(held, on_disk),
            (None, Some(_)) => true,
            (_, None) => false,
        };

        // Close before renaming; some platforms refuse to move open files.
        self.file = None;

        let has_content = on_disk.as_ref().is_some_and(|meta| meta.len() > 0);
        if ours && has_content {
            let target = self.dir.join(self.rotated_name(self.period));
            if target.exists() {
                tracing::warn!(
                    key = %self.key,
                    path = %target.display(),
                    "rotated file already exists, keeping the active file"
                );
            } else {
                fs::rename(&self.path, &target).map_err(|source| RecordLogError::Rotate {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        self.file = Some(open_append(&self.path, self.file_permission)?);
        self.period = today;
        self.purge()
    }

    fn purge(&self) -> Result<()> {
        if self.max_files == 0 {
            return Ok(());
        }
        for (_, path) in self.rotated_files()?.into_iter().skip(self.max_files) {
            fs::remove_file(&path).map_err(|source| RecordLogError::Purge { path, source })?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn same_file(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    match (a.created(), b.created()) {
        (Ok(a), Ok(b)) => a == b,
        _ => true,
    }
}

fn open_append(path: &Path, file_permission: u32) -> Result<File> {
    let created = !path.exists();
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(file_permission);
    }
    let file = options.open(path).map_err(|source| RecordLogError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // The process umask narrows the mode given to open(2); apply it exactly.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if created {
            fs::set_permissions(path, fs::Permissions::from_mode(file_permission)).map_err(
                |source| RecordLogError::Open {
                    path: path.to_path_buf(),
                    source,
                },
            )?;
        }
    }
    #[cfg(not(unix))]
    let _ = (created, file_permission);

    Ok(file)
}
