// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{file}:{line}: {reason}")]
    MalformedLine {
        file: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("{file}:{line}: tick does not strictly increase from the previous record")]
    NonAscendingTick { file: PathBuf, line: usize },
    #[error("{file}: first record's tick must be 0")]
    FirstTickNotZero { file: PathBuf },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
