// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing roster data.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing a data file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A data file held something that is not the expected JSON shape.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The file involved.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Serializing roster data to JSON failed.
    #[error("failed to encode roster data: {0}")]
    Encode(#[source] serde_json::Error),
}
