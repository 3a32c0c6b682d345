// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::flow::FlowId;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("flow {flow:?} computed a calendar offset of {offset} slots, which does not fit the {slots}-slot wheel")]
    OffsetOutOfRange { flow: FlowId, offset: u64, slots: u64 },
}
