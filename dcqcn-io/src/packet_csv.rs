// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::path::Path;

use dcqcn_core::{Packet, Tick};
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Deserialize)]
struct PacketRecord {
    timestamp: u64,
    size: u64,
    seq_number: u64,
}

/// Parses a packet trace: CSV with header `timestamp,size,seq_number`,
/// strictly ascending by timestamp.
pub fn parse_packet_csv(path: &Path) -> Result<VecDeque<Packet>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut packets = VecDeque::new();
    let mut last_timestamp: Option<u64> = None;

    for (index, record) in reader.deserialize::<PacketRecord>().enumerate() {
        let line_number = index + 2; // header occupies line 1
        let record = record.map_err(|source| Error::MalformedLine {
            file: path.to_path_buf(),
            line: line_number,
            reason: source.to_string(),
        })?;

        if let Some(last) = last_timestamp {
            if record.timestamp <= last {
                return Err(Error::NonAscendingTick {
                    file: path.to_path_buf(),
                    line: line_number,
                });
            }
        }
        last_timestamp = Some(record.timestamp);

        packets.push_back(Packet {
            arrival_tick: Tick::new(record.timestamp),
            size_bytes: record.size,
            seq_number: record.seq_number,
        });
    }

    Ok(packets)
}
