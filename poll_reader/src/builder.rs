pub use crate::config::*;
use crate::PollTable;

/// A builder for assembling a poll table line by line.
///
/// Lines that cannot be read are not added to the table. They are kept
/// aside with the reason of their rejection.
///
/// ```
/// pub use poll_reader::builder::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_line(2, "Oct, 28, 600, Likely Voters, 45.4, 47.3")?;
/// assert!(builder.add_line(3, "Oct, 29, 600, Likely Voters").is_err());
///
/// let table = builder.build();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.rejected().len(), 1);
/// # Ok::<(), poll_reader::RowRejection>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _records: Vec<PollRecord>,
    pub(crate) _rejected: Vec<(usize, RowRejection)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Parses a line and adds it to the table.
    ///
    /// lineno: the position of the line in the source, only used for
    /// reporting the rejected lines.
    pub fn add_line(&mut self, lineno: usize, line: &str) -> Result<(), RowRejection> {
        match parse_line(line) {
            Ok(record) => {
                self.add_record(record);
                Ok(())
            }
            Err(rejection) => {
                self._rejected.push((lineno, rejection.clone()));
                Err(rejection)
            }
        }
    }

    /// Adds a record that was already parsed.
    pub fn add_record(&mut self, record: PollRecord) {
        self._records.push(record);
    }

    pub fn build(self) -> PollTable {
        PollTable {
            records: self._records,
            rejected: self._rejected,
        }
    }
}

/// Reads one line of the input into a record.
///
/// Nothing is produced unless all six fields are present and convert. Any
/// integer that fits in an `i64` is accepted for the date and the sample size,
/// including negative values.
pub fn parse_line(line: &str) -> Result<PollRecord, RowRejection> {
    let fields: Vec<&str> = line.trim().split(',').map(|s| s.trim()).collect();
    match fields.as_slice() {
        [month, date, sample, sample_type, first, second] => Ok(PollRecord {
            month: month.to_string(),
            date: parse_number(date, PollColumn::Date)?,
            sample: parse_number(sample, PollColumn::Sample)?,
            sample_type: sample_type.to_string(),
            first_result: parse_percentage(first, PollColumn::FirstResult)?,
            second_result: parse_percentage(second, PollColumn::SecondResult)?,
        }),
        _ => Err(RowRejection::WrongFieldCount {
            found: fields.len(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, column: PollColumn) -> Result<T, RowRejection> {
    raw.parse::<T>().map_err(|_| RowRejection::InvalidNumber {
        column,
        raw: raw.to_string(),
    })
}

/// Converts a result column.
///
/// `NaN`, `inf` and `infinity` are rejected on purpose, although they parse as
/// `f64`: the maximum and the exact-equality tie between candidates are not
/// defined for them.
fn parse_percentage(raw: &str, column: PollColumn) -> Result<f64, RowRejection> {
    let x: f64 = parse_number(raw, column)?;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(RowRejection::InvalidNumber {
            column,
            raw: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_trims_fields() {
        let r = parse_line("  Aug , 22,1500 ,  Likely Voters , 57.0,42.7 \n").unwrap();
        assert_eq!(
            r,
            PollRecord {
                month: "Aug".to_string(),
                date: 22,
                sample: 1500,
                sample_type: "Likely Voters".to_string(),
                first_result: 57.0,
                second_result: 42.7,
            }
        );
    }

    #[test]
    fn parse_line_field_count() {
        assert_eq!(
            parse_line("Jul,8,900,Likely Voters,48.1"),
            Err(RowRejection::WrongFieldCount { found: 5 })
        );
        assert_eq!(
            parse_line("Jul,8,900,Likely Voters,48.1,44.0,1"),
            Err(RowRejection::WrongFieldCount { found: 7 })
        );
        assert_eq!(
            parse_line(""),
            Err(RowRejection::WrongFieldCount { found: 1 })
        );
    }

    #[test]
    fn parse_line_invalid_numbers() {
        assert_eq!(
            parse_line("Sep,5,n/a,Likely Voters,47.0,46.5"),
            Err(RowRejection::InvalidNumber {
                column: PollColumn::Sample,
                raw: "n/a".to_string()
            })
        );
        assert_eq!(
            parse_line("Sep,5.5,900,Likely Voters,47.0,46.5"),
            Err(RowRejection::InvalidNumber {
                column: PollColumn::Date,
                raw: "5.5".to_string()
            })
        );
        assert_eq!(
            parse_line("Sep,5,900,Likely Voters,47.0,"),
            Err(RowRejection::InvalidNumber {
                column: PollColumn::SecondResult,
                raw: "".to_string()
            })
        );
        assert_eq!(
            parse_line("Sep,+,900,Likely Voters,47.0,46.5"),
            Err(RowRejection::InvalidNumber {
                column: PollColumn::Date,
                raw: "+".to_string()
            })
        );
        assert_eq!(
            parse_line("Sep,5,99999999999999999999,Likely Voters,47.0,46.5"),
            Err(RowRejection::InvalidNumber {
                column: PollColumn::Sample,
                raw: "99999999999999999999".to_string()
            })
        );
        assert!(parse_line("Sep,5,900,Likely Voters,NaN,46.5").is_err());
        assert!(parse_line("Sep,5,900,Likely Voters,47.0,inf").is_err());
    }

    #[test]
    fn parse_line_signed_and_large_integers() {
        let r = parse_line("Jul,-1,900,Likely Voters,48.1,44.0").unwrap();
        assert_eq!(r.date, -1);
        assert_eq!(r.sample, 900);

        let r = parse_line("Jul,1,-900,Likely Voters,48.1,44.0").unwrap();
        assert_eq!(r.sample, -900);

        let r = parse_line("Jul,+5,+900,Likely Voters,+48.1,-44.0").unwrap();
        assert_eq!(r.date, 5);
        assert_eq!(r.sample, 900);
        assert_eq!(r.first_result, 48.1);
        assert_eq!(r.second_result, -44.0);

        let r = parse_line("Jul,5000000000,12000000000,Likely Voters,48.1,44.0").unwrap();
        assert_eq!(r.date, 5_000_000_000);
        assert_eq!(r.sample, 12_000_000_000);
    }

    #[test]
    fn signed_rows_stay_in_the_table() {
        let mut b = Builder::new();
        assert!(b.add_line(2, "Jul,-1,900,Likely Voters,48.1,44.0").is_ok());
        assert!(b.add_line(3, "Jul,5000000000,900,Likely Voters,47.9,44.2").is_ok());
        assert!(b.add_line(4, "Jul,1,-900,Registered Voters,46.0,45.0").is_ok());
        let table = b.build();
        assert_eq!(table.len(), 3);
        assert!(table.rejected().is_empty());
        assert_eq!(table.dates(), vec![-1, 5_000_000_000, 1]);
        assert_eq!(table.samples(), vec![900, 900, -900]);
    }

    #[test]
    fn builder_keeps_rejected_lines() {
        let mut b = Builder::new();
        assert!(b.add_line(2, "Jul,1,2600,Likely Voters,46.9,43.2").is_ok());
        assert!(b.add_line(3, "Jul,8,900,Likely Voters,48.1").is_err());
        assert!(b.add_line(4, "Jul,4,900,Registered Voters,44.4,48.6").is_ok());
        let table = b.build();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rejected(),
            &[(3, RowRejection::WrongFieldCount { found: 5 })]
        );
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(
            RowRejection::WrongFieldCount { found: 2 }.to_string(),
            "expected 6 fields, found 2"
        );
        assert_eq!(
            RowRejection::InvalidNumber {
                column: PollColumn::Date,
                raw: "x".to_string()
            }
            .to_string(),
            "invalid number in column 'date': \"x\""
        );
    }
}
