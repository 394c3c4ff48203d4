// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

use crate::GroupId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("group {0} is not part of the derived view")]
    GroupNotFound(GroupId),
}

pub type Result<T> = std::result::Result<T, TableError>;
