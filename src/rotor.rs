//! # Rotating File
//!
//! [`RotatingFile`] owns the pair the whole system revolves around: the open
//! handle of the active log file and the rotation anchor, the calendar date
//! the file belongs to. The handle sits behind an `RwLock` so the writer
//! thread appends under a read lock while rotation takes the write lock for
//! the entire close/rename/reopen sequence; the two are never observed in a
//! mismatched state. The anchor is a plain atomic day number so
//! [`is_rotation_due`](RotatingFile::is_rotation_due) needs no lock at all —
//! a stale read only delays rotation by one check interval.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::error::Error;
use crate::format::{self, DATE_FORMAT};

/// The active log file and its rotation state.
pub struct RotatingFile {
    dir: PathBuf,
    file_name: String,
    prefix: String,
    /// Day number (days since the common era) of the date the active file
    /// was opened or rotated for.
    anchor: AtomicI32,
    /// `None` only before the first open and after a failed rotation; the
    /// logger points at nothing until the next successful reopen and drops
    /// writes in between.
    active: RwLock<Option<File>>,
}

impl RotatingFile {
    /// Opens the active file, creating the directory and file as needed.
    ///
    /// A directory-creation failure is reported to stderr and execution
    /// proceeds optimistically; the subsequent file open decides whether
    /// boot fails. If the active file already exists, its modification date
    /// seeds the anchor, so a process restarted after midnight rotates the
    /// stale file before accepting the first write.
    pub fn open(dir: PathBuf, file_name: String, prefix: String) -> Result<RotatingFile, Error> {
        if let Err(err) = fs::create_dir_all(&dir) {
            eprintln!("Create log dir {} failed: {err}", dir.display());
        }

        let path = dir.join(&file_name);
        let anchor = existing_file_date(&path).unwrap_or_else(today);

        let rotor = RotatingFile {
            dir,
            file_name,
            prefix,
            anchor: AtomicI32::new(anchor.num_days_from_ce()),
            active: RwLock::new(None),
        };

        if rotor.is_rotation_due() {
            rotor.rotate()?;
        } else {
            let file = open_append(&rotor.active_path())?;
            *write_guard(&rotor.active) = Some(file);
        }

        Ok(rotor)
    }

    /// Path of the active file: `{dir}/{file_name}`.
    pub fn active_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Path a backup for `date` would be renamed to:
    /// `{dir}/{file_name}.{YYYY-MM-DD}`.
    pub fn backup_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.file_name, date.format(DATE_FORMAT)))
    }

    /// The calendar date the active file currently belongs to.
    pub fn anchor_date(&self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.anchor.load(Ordering::Relaxed))
            .unwrap_or_else(today)
    }

    /// Rebases the anchor, as if the active file had been opened on `date`.
    ///
    /// Exists for restart recovery and for tests that simulate a crossed day
    /// boundary without touching the system clock.
    pub fn set_anchor(&self, date: NaiveDate) {
        self.anchor.store(date.num_days_from_ce(), Ordering::Relaxed);
    }

    /// True iff today is strictly after the anchor date.
    ///
    /// Pure and lock-free; safe from any thread. A reading racing a rotation
    /// can report a false negative, which merely delays rotation by one
    /// check interval.
    pub fn is_rotation_due(&self) -> bool {
        today().num_days_from_ce() > self.anchor.load(Ordering::Relaxed)
    }

    /// Swaps the active file for a new day.
    ///
    /// Under the exclusive lock: close the current handle, rename the active
    /// file to its dated backup, reopen a fresh active file in append mode.
    /// The anchor advances only once the rename succeeds, so a failing
    /// rename leaves it stale and the next check retries the whole swap. An
    /// open failure after the rename is not retried; the handle stays closed
    /// until the next day boundary and interim writes are dropped.
    pub fn rotate(&self) -> Result<(), Error> {
        let mut active = write_guard(&self.active);

        // Drop the handle first so the rename acts on a closed file.
        active.take();

        let source = self.active_path();
        let target = self.backup_path(self.anchor_date());

        fs::rename(&source, &target)?;
        self.set_anchor(today());

        let file = open_append(&source)?;
        *active = Some(file);
        Ok(())
    }

    /// Appends one rendered line to the active file, prefixed with the
    /// configured line prefix and the write timestamp.
    ///
    /// Fire-and-forget: a write failure (or a closed handle after a failed
    /// rotation) is reported to stderr and otherwise swallowed.
    pub fn write_line(&self, line: &str) {
        let active = read_guard(&self.active);
        let Some(file) = active.as_ref() else {
            eprintln!("Log file is not open, dropping line: {line}");
            return;
        };

        let mut handle: &File = file;
        if let Err(err) = writeln!(handle, "{}{} {line}", self.prefix, format::write_stamp()) {
            eprintln!("Failed to write log: {err}");
        }
    }

    /// Closes the active file handle. Called once the writer has drained.
    pub fn close(&self) {
        write_guard(&self.active).take();
    }
}

fn open_append(path: &Path) -> Result<File, Error> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar date of an existing file's last modification, if any.
fn existing_file_date(path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let stamp: DateTime<Local> = modified.into();
    Some(stamp.date_naive())
}

// A poisoned lock still holds usable state; writes are line-atomic.
fn read_guard(lock: &RwLock<Option<File>>) -> std::sync::RwLockReadGuard<'_, Option<File>> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_guard(lock: &RwLock<Option<File>>) -> std::sync::RwLockWriteGuard<'_, Option<File>> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
