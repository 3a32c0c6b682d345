// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Deserialize)]
struct FlowGroupRecord {
    group_id: u32,
    rate: f64,
}

/// Parses a flow-group CSV: header `group_id,rate`, positive integer group
/// id, floating rate in bits/sec. Generating this file is out of scope;
/// only parsing it is.
pub fn parse_flow_group_csv(path: &Path) -> Result<Vec<(u32, f64)>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut groups = Vec::new();

    for (index, record) in reader.deserialize::<FlowGroupRecord>().enumerate() {
        let line_number = index + 2;
        let record = record.map_err(|source| Error::MalformedLine {
            file: path.to_path_buf(),
            line: line_number,
            reason: source.to_string(),
        })?;

        if record.group_id == 0 {
            return Err(Error::MalformedLine {
                file: path.to_path_buf(),
                line: line_number,
                reason: "group_id must be a positive integer".to_string(),
            });
        }

        groups.push((record.group_id, record.rate));
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn parses_group_rows() {
        let path = write_temp(
            "dcqcn_io_flow_group_csv_ok.csv",
            "group_id,rate\n1,500000.0\n2,525000.5\n",
        );
        let groups = parse_flow_group_csv(&path).expect("valid file must parse");
        assert_eq!(groups, vec![(1, 500000.0), (2, 525000.5)]);
    }

    #[test]
    fn rejects_a_zero_group_id() {
        let path = write_temp("dcqcn_io_flow_group_csv_zero_id.csv", "group_id,rate\n0,1.0\n");
        assert!(matches!(
            parse_flow_group_csv(&path),
            Err(Error::MalformedLine { .. })
        ));
    }
}
