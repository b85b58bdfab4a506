use thiserror::Error;

/// Which allocator ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Inodes,
    Blocks,
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Resource::Inodes => write!(f, "inodes"),
            Resource::Blocks => write!(f, "data blocks"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("no such file or directory")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
    #[error("entry already exists")]
    AlreadyExists,
    #[error("directory not empty")]
    NotEmpty,
    #[error("file name too long")]
    NameTooLong,
    #[error("invalid path")]
    InvalidPath,
    #[error("out of {0}")]
    ResourceExhausted(Resource),
    #[error("directory full")]
    DirectoryFull,
    #[error("write of {len} bytes at offset {offset} exceeds the data block")]
    WriteOutOfBounds { offset: usize, len: usize },
    #[error("{kind} index {index} out of range")]
    InvalidIndex { kind: Resource, index: u32 },
    #[error("backing store holds {found} bytes, layout expects {expected}")]
    FormatMismatch { expected: u64, found: u64 },
    #[error("backing store I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Positive errno for this error, the bridge negates it.
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::NotADirectory => libc::ENOTDIR,
            FsError::IsADirectory => libc::EISDIR,
            FsError::AlreadyExists => libc::EEXIST,
            FsError::NotEmpty => libc::ENOTEMPTY,
            FsError::NameTooLong => libc::ENAMETOOLONG,
            FsError::InvalidPath => libc::EINVAL,
            FsError::ResourceExhausted(_) | FsError::DirectoryFull => libc::ENOSPC,
            FsError::WriteOutOfBounds { .. } => libc::EFBIG,
            FsError::InvalidIndex { .. } | FsError::FormatMismatch { .. } | FsError::Io(_) => {
                libc::EIO
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, FsError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(FsError::NotFound.errno(), libc::ENOENT);
        assert_eq!(FsError::ResourceExhausted(Resource::Blocks).errno(), libc::ENOSPC);
        assert_eq!(FsError::DirectoryFull.errno(), libc::ENOSPC);
        assert_eq!(FsError::WriteOutOfBounds { offset: 4000, len: 200 }.errno(), libc::EFBIG);
    }

    #[test]
    fn test_display() {
        let e = FsError::ResourceExhausted(Resource::Inodes);
        assert_eq!(e.to_string(), "out of inodes");
    }
}
