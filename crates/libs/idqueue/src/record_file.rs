//! Flat record file: raw 16-byte identifiers, oldest first, no header.
//!
//! A tail shorter than one record is end-of-data. Readers keep everything
//! decoded before a failure, so a damaged file restores partially instead of
//! not at all.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::QueueError;
use crate::identifier::{Identifier, IDENTIFIER_SIZE};

pub const RECORD_SIZE: usize = IDENTIFIER_SIZE;

/// Outcome of reading a record file.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Every complete record read before the stream ended or failed, in file order.
    pub identifiers: Vec<Identifier>,
    /// Bytes of an incomplete final record that were discarded.
    pub trailing_bytes: usize,
    /// The failure that stopped reading, if any.
    pub error: Option<io::Error>,
}

impl LoadReport {
    /// `true` when the whole stream decoded into records with nothing left over.
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.trailing_bytes == 0
    }
}

pub fn read_records<R: Read>(mut reader: R) -> LoadReport {
    let mut report = LoadReport::default();
    let mut record = [0u8; RECORD_SIZE];
    loop {
        match fill_record(&mut reader, &mut record) {
            Ok(RECORD_SIZE) => report.identifiers.push(Identifier::new(record)),
            Ok(filled) => {
                report.trailing_bytes = filled;
                break;
            }
            Err(err) => {
                report.error = Some(err);
                break;
            }
        }
    }
    report
}

pub fn read_file(path: &Path) -> LoadReport {
    match File::open(path) {
        Ok(file) => read_records(BufReader::new(file)),
        Err(err) => LoadReport { error: Some(err), ..LoadReport::default() },
    }
}

/// Writes raw records and returns how many were written.
pub fn write_records<'a, W, I>(mut writer: W, ids: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Identifier>,
{
    let mut written = 0;
    for id in ids {
        writer.write_all(id.as_bytes())?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Replaces `path` with the given records.
///
/// Records go to a temporary sibling that is renamed over `path` once synced,
/// so a failed write leaves the previous file intact. A symlinked `path` is
/// resolved first; the link stays in place and its target is replaced.
pub fn write_file<'a, I>(path: &Path, ids: I) -> Result<usize, QueueError>
where
    I: IntoIterator<Item = &'a Identifier>,
{
    let path = resolve_link(path);
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| QueueError::io(parent, err))?;
        }
    }

    let unique = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = path.with_extension(format!("tmp-{}-{unique}", std::process::id()));
    let written = match write_tmp(&tmp_path, ids) {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(QueueError::io(tmp_path, err));
        }
    };

    #[cfg(windows)]
    if path.is_file() {
        let _ = fs::remove_file(path);
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(QueueError::io(path, err));
    }
    Ok(written)
}

fn resolve_link(path: &Path) -> Cow<'_, Path> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            // canonicalize fails on a dangling link; follow one hop by hand
            let resolved = fs::canonicalize(path).or_else(|_| {
                fs::read_link(path).map(|target| match path.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                })
            });
            match resolved {
                Ok(target) => Cow::Owned(target),
                Err(err) => {
                    log::debug!("idqueue: cannot resolve link {}: {err}", path.display());
                    Cow::Borrowed(path)
                }
            }
        }
        _ => Cow::Borrowed(path),
    }
}

fn write_tmp<'a, I>(path: &Path, ids: I) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a Identifier>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);
    let written = write_records(&mut writer, ids)?;
    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(written)
}

fn fill_record<R: Read>(reader: &mut R, record: &mut [u8; RECORD_SIZE]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        match reader.read(&mut record[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
