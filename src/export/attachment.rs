//! Save downloaded attachments to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MailError, Result};
use crate::model::thread::Thread;
use crate::provider::MailProvider;

/// Longest filename (in bytes) written to disk.
const MAX_FILENAME_LEN: usize = 200;

/// Characters replaced with `_` in attachment filenames.
const UNSAFE_CHARS: [char; 10] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

/// Make an attachment filename safe to write.
///
/// Unsafe characters become `_`, surrounding spaces and dots are trimmed and
/// the name is capped at 200 bytes (keeping the extension). Returns
/// `"attachment"` if nothing usable is left.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');

    let capped = if trimmed.len() > MAX_FILENAME_LEN {
        let ext = Path::new(trimmed)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let budget = MAX_FILENAME_LEN.saturating_sub(ext.len());
        let mut cut = budget;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}{ext}", &trimmed[..cut])
    } else {
        trimmed.to_string()
    };

    if capped.is_empty() {
        "attachment".to_string()
    } else {
        capped
    }
}

/// Write `data` into `output_dir` under a sanitized, non-clashing filename.
///
/// Returns the path actually written.
pub fn save_attachment(data: &[u8], output_dir: &Path, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| MailError::io(output_dir, e))?;

    let path = unique_path(&output_dir.join(sanitize_filename(filename)))?;
    std::fs::write(&path, data).map_err(|e| MailError::io(&path, e))?;
    Ok(path)
}

/// Where the attachments of `thread` should be saved, if anywhere.
///
/// `None` when the thread has no attachments or `skip` is set. Fails when
/// attachments exist but no directory was given.
pub fn attachment_destination<'a>(
    thread: &Thread,
    output_dir: Option<&'a Path>,
    skip: bool,
) -> Result<Option<&'a Path>> {
    if skip || !thread.has_attachments() {
        return Ok(None);
    }
    match output_dir {
        Some(dir) => Ok(Some(dir)),
        None => Err(MailError::InvalidInput(
            "thread has attachments; specify --output-dir or use --no-attachments".into(),
        )),
    }
}

/// Download and save every attachment of `thread`.
///
/// Individual failures are logged and skipped. Returns a map from
/// attachment id to saved path. The progress callback receives
/// `(current, total)`.
pub fn download_attachments(
    provider: &dyn MailProvider,
    thread: &Thread,
    output_dir: &Path,
    progress: &dyn Fn(usize, usize),
) -> HashMap<String, PathBuf> {
    let total = thread.attachments().count();
    let mut saved = HashMap::with_capacity(total);

    for (i, att) in thread.attachments().enumerate() {
        progress(i, total);

        let data = match provider.download_attachment(&att.message_id, &att.id) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(
                    filename = %att.filename,
                    error = %e,
                    "Failed to download attachment"
                );
                continue;
            }
        };

        match save_attachment(&data, output_dir, &att.filename) {
            Ok(path) => {
                tracing::info!(
                    filename = %att.filename,
                    path = %path.display(),
                    size = %humansize::format_size(data.len(), humansize::BINARY),
                    "Saved attachment"
                );
                saved.insert(att.id.clone(), path);
            }
            Err(e) => {
                tracing::warn!(
                    filename = %att.filename,
                    error = %e,
                    "Failed to save attachment"
                );
            }
        }
    }
    progress(total, total);

    saved
}

/// If `path` already exists, append `_1`, `_2`, ... before the extension.
fn unique_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1..10_000 {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(MailError::ExportError(format!(
        "no free filename for '{}'",
        path.display()
    )))
}
