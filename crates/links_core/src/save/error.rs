use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is {found} bytes which matches no known layout")]
    UnexpectedSize { found: usize },

    #[error("unknown save version {0}")]
    UnknownVersion(u8),

    #[error("corrupted data")]
    Corrupted,
}

impl SaveError {
    /// A missing file is a first run, not a failure.
    pub fn is_first_run(&self) -> bool {
        matches!(self, SaveError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Whether the owning aggregate should recover by resetting itself to a
    /// freshly-rolled state and rewriting.
    pub fn triggers_reset(&self) -> bool {
        match self {
            SaveError::UnexpectedSize { .. } => true,
            SaveError::UnknownVersion(_) => true,
            SaveError::Corrupted => true,
            SaveError::Io(_) => self.is_first_run(),
        }
    }
}
