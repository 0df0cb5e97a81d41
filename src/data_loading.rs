use crate::error::{Result, SignalError};
use crate::SignalTable;
use log::{debug, info};
use ndarray::Array2;
use std::path::Path;

/// Reads a whitespace-delimited table of raw, processed, BPM and IBI rows.
pub fn load_signal_table(path: &Path, sample_period: f64) -> Result<SignalTable> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SignalError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let table = parse_signal_table(&text, sample_period)?;
    info!(
        "Loaded {} samples ({:.1} s at {} Hz) from {}",
        table.len(),
        table.duration(),
        table.sample_rate(),
        path.display()
    );
    Ok(table)
}

/// Parses the table text. Anything after a `#` is a comment; lines left
/// blank are skipped.
pub fn parse_signal_table(text: &str, sample_period: f64) -> Result<SignalTable> {
    let mut values = Vec::new();
    let mut rows = 0;

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line
            .split_once('#')
            .map_or(line, |(content, _)| content)
            .trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != SignalTable::COLUMNS {
            return Err(SignalError::Parse {
                line: idx + 1,
                reason: format!(
                    "expected {} fields, found {}",
                    SignalTable::COLUMNS,
                    fields.len()
                ),
            });
        }

        for field in fields {
            let value: f64 = field.parse().map_err(|_| SignalError::Parse {
                line: idx + 1,
                reason: format!("not a number: {}", field),
            })?;
            values.push(value);
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(SignalError::Parse {
            line: 0,
            reason: "no samples found".to_string(),
        });
    }
    debug!("Parsed {} rows", rows);

    let data = Array2::from_shape_vec((rows, SignalTable::COLUMNS), values)
        .map_err(|e| SignalError::invalid(e.to_string()))?;
    SignalTable::new(data, sample_period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Channel;

    #[test]
    fn parses_rows_and_skips_comments() {
        let text = "# raw processed bpm ibi\n\
                    2048 0.1 72 830\n\
                    \n\
                    2050\t-0.2  72   830\n\
                    2049 1e-1 73.5 820\n";
        let table = parse_signal_table(text, 0.025).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.channel(Channel::Raw).to_vec(), vec![2048.0, 2050.0, 2049.0]);
        assert_eq!(table.channel(Channel::Processed)[1], -0.2);
        assert_eq!(table.channel(Channel::Bpm)[2], 73.5);
        assert_eq!(table.channel(Channel::Ibi)[0], 830.0);
    }

    #[test]
    fn trailing_comments_are_stripped() {
        let text = "1 2 3 4 # first beat\n5 6 7 8#tight\n   # indented comment\n";
        let table = parse_signal_table(text, 0.025).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.channel(Channel::Ibi).to_vec(), vec![4.0, 8.0]);
    }

    #[test]
    fn comment_does_not_hide_a_short_row() {
        assert!(matches!(
            parse_signal_table("1 2 3 # 4\n", 0.025),
            Err(SignalError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn short_row_reports_its_line() {
        let text = "1 2 3 4\n1 2 3\n";
        match parse_signal_table(text, 0.025) {
            Err(SignalError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn extra_field_is_rejected() {
        assert!(matches!(
            parse_signal_table("1 2 3 4 5\n", 0.025),
            Err(SignalError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let text = "1 2 3 4\n1 two 3 4\n";
        match parse_signal_table(text, 0.025) {
            Err(SignalError::Parse { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("two"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            parse_signal_table("\n# nothing\n", 0.025),
            Err(SignalError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = Path::new("does/not/exist/heartbeat_data.dat");
        assert!(matches!(
            load_signal_table(path, 0.025),
            Err(SignalError::NotFound(_))
        ));
    }
}
