use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// File stem of the parameter file, used to name everything written for it.
pub fn extract_base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem() // Get the base name component of the path
        .and_then(|name| name.to_str())
        .unwrap_or("params")
}

/// `<root>/<project>/<params base name>[/<datetime>]`, created if missing.
pub fn build_output_path_with_date_time(
    root: &Path,
    params_path: &str,
    project: &str,
    datetime: &Option<String>,
) -> std::io::Result<PathBuf> {
    let mut directory_path = root.join(project).join(extract_base_name(params_path));
    if let Some(inner_datetime_str) = datetime {
        directory_path.push(inner_datetime_str);
    }
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    use chrono::{Datelike, Local, Timelike};
    let local_time = Local::now();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        local_time.year(),
        local_time.month(),
        local_time.day(),
        local_time.hour(),
        local_time.minute(),
        local_time.second()
    )
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/**
 * Store a path and prefix together, making it easily to quickly generate
 * a collection of files with the same prefix, but separate suffixes.
 */
#[derive(Clone, Debug)]
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path.join(self.file_base.clone() + suffix)
    }

    pub fn create_file_with_suffix(&self, suffix: &str) -> std::io::Result<BufWriter<File>> {
        let file = File::create(self.with_suffix(suffix))?;
        Ok(BufWriter::new(file))
    }
}

/// Pretty-printed JSON, so that a written parameter file can be fed back in.
pub fn serialize_to_json<T: Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    log::info!("wrote parameters to {}", path.display());
    Ok(())
}
