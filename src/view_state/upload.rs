use thiserror::Error;

use crate::services::FileLike;

pub const MAX_UPLOAD_FILES: usize = 1;
/// 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10_485_760;

/// Result of one attach attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The image is stored; the URL is now the draft's image.
    Success(String),
    Failure(UploadFailure),
    /// Nothing was selected, or the view went away mid-upload.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadFailure {
    #[error("An upload is already in progress")]
    InProgress,

    #[error("Only {max} image can be attached (got {count})")]
    TooManyFiles { count: usize, max: usize },

    #[error("{name} is {size} bytes; the limit is {max} bytes")]
    FileTooLarge { name: String, size: u64, max: u64 },

    #[error("Not signed in")]
    Unauthorized,

    #[error("Could not get an upload URL: {0}")]
    TargetUnavailable(String),

    #[error("Upload failed: {0}")]
    TransferFailed(String),
}

/// Where the single in-flight upload is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    RequestingTarget,
    Transferring { file_name: String },
}

impl UploadPhase {
    pub fn is_busy(&self) -> bool {
        !matches!(self, UploadPhase::Idle)
    }
}

/// Check a selection against the upload limits before anything leaves the browser.
/// `Ok(None)` means the selection was empty.
pub fn check_selection<F: FileLike>(files: &[F]) -> Result<Option<&F>, UploadFailure> {
    if files.len() > MAX_UPLOAD_FILES {
        return Err(UploadFailure::TooManyFiles {
            count: files.len(),
            max: MAX_UPLOAD_FILES,
        });
    }

    let Some(file) = files.first() else {
        return Ok(None);
    };

    if file.size() > MAX_UPLOAD_BYTES {
        return Err(UploadFailure::FileTooLarge {
            name: file.name(),
            size: file.size(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    Ok(Some(file))
}
