use crate::adb::RemoteFileRecord;
use crate::output::{PlainFormat, TableFormat};

/// Format size in human-readable format
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "K", "M", "G", "T"];

    if size == 0 {
        return "0B".to_string();
    }

    let mut scaled = size as f64;
    let mut unit_index = 0;

    while scaled >= 1024.0 && unit_index < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{}{}", size, UNITS[unit_index])
    } else {
        format!("{:.1}{}", scaled, UNITS[unit_index])
    }
}

fn modified(record: &RemoteFileRecord) -> String {
    record
        .modified_at()
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl TableFormat for RemoteFileRecord {
    fn headers() -> Vec<&'static str> {
        vec!["NAME", "SIZE", "TYPE", "PERMISSIONS", "MODIFIED"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.path().to_string(),
            format_size(u64::from(self.size())),
            self.file_type().to_string(),
            self.permissions_string(),
            modified(self),
        ]
    }
}

impl PlainFormat for RemoteFileRecord {
    fn plain(&self) -> String {
        format!(
            "{} {} {} {}",
            self.permissions_string(),
            format_size(u64::from(self.size())),
            modified(self),
            self.path()
        )
    }
}
