use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// =============================================================================
// File type constants (from stat.h)
// =============================================================================

const S_IFMT: u32 = 0o170000; // bit mask for the file type bit field
const S_IFSOCK: u32 = 0o140000; // socket
const S_IFLNK: u32 = 0o120000; // symbolic link
const S_IFREG: u32 = 0o100000; // regular file
const S_IFBLK: u32 = 0o060000; // block device
const S_IFDIR: u32 = 0o040000; // directory
const S_IFCHR: u32 = 0o020000; // character device
const S_IFIFO: u32 = 0o010000; // FIFO

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFileRecord {
    path: String,
    mode: u32,
    size: u32,
    last_modified: u32,
}

impl RemoteFileRecord {
    pub fn new(path: impl Into<String>, mode: u32, size: u32, last_modified: u32) -> Self {
        Self {
            path: path.into(),
            mode,
            size,
            last_modified,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Modification time in seconds since the epoch
    pub fn last_modified(&self) -> u32 {
        self.last_modified
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.last_modified), 0)
    }

    pub fn is_directory(&self) -> bool {
        (self.mode & S_IFMT) == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        (self.mode & S_IFMT) == S_IFREG
    }

    pub fn is_symlink(&self) -> bool {
        (self.mode & S_IFMT) == S_IFLNK
    }

    pub fn file_type(&self) -> &'static str {
        match self.mode & S_IFMT {
            S_IFIFO => "fifo",
            S_IFCHR => "char",
            S_IFDIR => "directory",
            S_IFBLK => "block",
            S_IFREG => "file",
            S_IFLNK => "symlink",
            S_IFSOCK => "socket",
            _ => "unknown",
        }
    }

    /// `ls -l` style permissions, e.g. `drwxr-x--x`
    pub fn permissions_string(&self) -> String {
        let mode = self.mode;
        let file_type = match mode & S_IFMT {
            S_IFIFO => 'p',
            S_IFCHR => 'c',
            S_IFDIR => 'd',
            S_IFBLK => 'b',
            S_IFREG => '-',
            S_IFLNK => 'l',
            S_IFSOCK => 's',
            _ => '?',
        };

        let mut out = String::with_capacity(10);
        out.push(file_type);
        out.push_str(&permission_triplet(mode >> 6, mode & 0o4000 != 0, 's'));
        out.push_str(&permission_triplet(mode >> 3, mode & 0o2000 != 0, 's'));
        out.push_str(&permission_triplet(mode, mode & 0o1000 != 0, 't'));
        out
    }
}

fn permission_triplet(bits: u32, special: bool, marker: char) -> String {
    let mut triplet = String::with_capacity(3);
    triplet.push(if bits & 4 != 0 { 'r' } else { '-' });
    triplet.push(if bits & 2 != 0 { 'w' } else { '-' });
    triplet.push(match (bits & 1 != 0, special) {
        (false, false) => '-',
        (true, false) => 'x',
        (false, true) => marker.to_ascii_uppercase(),
        (true, true) => marker,
    });
    triplet
}

impl fmt::Display for RemoteFileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>10} {}",
            self.permissions_string(),
            self.size,
            self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_record() {
        let record = RemoteFileRecord::new("sdcard", 0o040771, 4096, 1_700_000_000);
        assert!(record.is_directory());
        assert!(!record.is_file());
        assert_eq!(record.file_type(), "directory");
        assert_eq!(record.permissions_string(), "drwxrwx--x");
    }

    #[test]
    fn test_regular_file_record() {
        let record = RemoteFileRecord::new("build.prop", 0o100644, 2048, 0);
        assert!(record.is_file());
        assert_eq!(record.permissions_string(), "-rw-r--r--");
        assert_eq!(record.to_string(), "-rw-r--r--       2048 build.prop");
    }

    #[test]
    fn test_special_bits() {
        let setuid = RemoteFileRecord::new("su", 0o104755, 0, 0);
        assert_eq!(setuid.permissions_string(), "-rwsr-xr-x");

        let sticky = RemoteFileRecord::new("tmp", 0o041777, 0, 0);
        assert_eq!(sticky.permissions_string(), "drwxrwxrwt");

        let sticky_no_exec = RemoteFileRecord::new("odd", 0o041776, 0, 0);
        assert_eq!(sticky_no_exec.permissions_string(), "drwxrwxrwT");
    }

    #[test]
    fn test_modified_at() {
        let record = RemoteFileRecord::new("a", 0o100644, 1, 86_400);
        let modified = record.modified_at().unwrap();
        assert_eq!(modified.format("%Y-%m-%d").to_string(), "1970-01-02");
    }
}
