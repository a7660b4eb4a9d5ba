use std::fmt::{self, Display, Write as _};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use csv::WriterBuilder;
use thiserror::Error as ThisError;
use tracing::debug;

use gym_roster::Row;

pub const HEADER: [&str; 6] = [
    "Name",
    "Email",
    "Phone",
    "Membership Start",
    "Membership End",
    "Status",
];

/// How the roster table is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// strftime format of the membership dates
    pub date_format: String,
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
        }
    }
}

/// ExportError type
#[derive(ThisError, Debug)]
pub enum ExportError {
    #[error("invalid date format {0:?}")]
    DateFormat(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Render an instant as a date in the given time zone
fn format_date<Tz>(instant: &DateTime<Utc>, tz: &Tz, format: &str) -> Result<String, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut text = String::new();
    write!(text, "{}", instant.with_timezone(tz).format(format))
        .map_err(|_: fmt::Error| ExportError::DateFormat(format.to_string()))?;
    Ok(text)
}

/// Write the rows as a table, one line per row in display order.
/// Returns the number of rows written.
pub fn write_rows<W, Tz>(
    writer: W,
    rows: &[Row<'_>],
    tz: &Tz,
    options: &ExportOptions,
) -> Result<usize, ExportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut wtr = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    for row in rows {
        let member = row.member;
        let start = format_date(&member.membership_start, tz, &options.date_format)?;
        let end = format_date(&member.membership_end, tz, &options.date_format)?;
        let status = row.status.to_string();
        wtr.write_record([
            member.name.as_str(),
            member.email.as_str(),
            member.phone.as_str(),
            start.as_str(),
            end.as_str(),
            status.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Export rows to a file, with dates in the local time zone
pub fn export_file<P>(path: P, rows: &[Row<'_>], options: &ExportOptions) -> Result<usize, ExportError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    // A bad format must fail before an existing file is truncated
    format_date(&Utc::now(), &Local, &options.date_format)?;
    let file = File::create(path)?;
    let count = write_rows(file, rows, &Local, options)?;
    debug!(path = %path.display(), rows = count, "exported roster");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use gym_data::{Member, MemberId, MembershipStatus, StatusFilter};
    use gym_roster::projection::project;
    use gym_roster::ViewQuery;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn members() -> Vec<Member> {
        vec![
            Member {
                id: MemberId::from(1),
                name: "Alice".to_string(),
                email: "alice@gym.test".to_string(),
                phone: "555-0100".to_string(),
                membership_start: date(2022, 1, 1),
                membership_end: date(2023, 1, 1),
            },
            Member {
                id: MemberId::from(2),
                name: "Bob, Jr.".to_string(),
                email: "bob@gym.test".to_string(),
                phone: "555-0101".to_string(),
                membership_start: date(2023, 6, 1),
                membership_end: date(2030, 6, 1),
            },
        ]
    }

    #[test]
    fn test_write_rows() {
        let members = members();
        let now = date(2024, 1, 1);
        let rows = project(&members, &ViewQuery::default(), &now);

        let mut out = Vec::new();
        let count = write_rows(&mut out, &rows, &Utc, &ExportOptions::default()).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Name,Email,Phone,Membership Start,Membership End,Status",
                "Alice,alice@gym.test,555-0100,2022-01-01,2023-01-01,Expired",
                "\"Bob, Jr.\",bob@gym.test,555-0101,2023-06-01,2030-06-01,Active",
            ]
        );
    }

    #[test]
    fn test_write_filtered_rows() {
        let members = members();
        let now = date(2024, 1, 1);
        let rows = project(&members, &ViewQuery::new("", StatusFilter::Active), &now);
        assert_eq!(rows[0].status, MembershipStatus::Active);

        let options = ExportOptions {
            date_format: "%d.%m.%Y".to_string(),
            delimiter: b';',
        };
        let mut out = Vec::new();
        write_rows(&mut out, &rows, &Utc, &options).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Bob, Jr.;bob@gym.test;555-0101;01.06.2023;01.06.2030;Active");
    }

    #[test]
    fn test_write_empty() {
        let mut out = Vec::new();
        let count = write_rows(&mut out, &[], &Utc, &ExportOptions::default()).unwrap();
        assert_eq!(count, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name,Email,Phone,Membership Start,Membership End,Status\n"
        );
    }

    #[test]
    fn test_invalid_date_format() {
        let members = members();
        let rows = project(&members, &ViewQuery::default(), &date(2024, 1, 1));
        let options = ExportOptions {
            date_format: "%Y-%".to_string(),
            ..Default::default()
        };
        let mut out = Vec::new();
        let err = write_rows(&mut out, &rows, &Utc, &options).unwrap_err();
        assert!(matches!(err, ExportError::DateFormat(_)));
    }

    #[test]
    fn test_export_file() {
        let members = members();
        let rows = project(&members, &ViewQuery::new("alice", StatusFilter::All), &date(2024, 1, 1));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.csv");
        let count = export_file(&path, &rows, &ExportOptions::default()).unwrap();
        assert_eq!(count, 1);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Alice,alice@gym.test,555-0100,"));
        assert!(lines[1].ends_with(",Expired"));
    }

    #[test]
    fn test_export_file_invalid_format_keeps_file() {
        let members = members();
        let rows = project(&members, &ViewQuery::default(), &date(2024, 1, 1));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.csv");
        fs::write(&path, "previous export\n").unwrap();

        let options = ExportOptions {
            date_format: "%Y-%".to_string(),
            ..Default::default()
        };
        let err = export_file(&path, &rows, &options).unwrap_err();
        assert!(matches!(err, ExportError::DateFormat(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous export\n");

        let err = export_file(&path, &[], &options).unwrap_err();
        assert!(matches!(err, ExportError::DateFormat(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous export\n");
    }
}
