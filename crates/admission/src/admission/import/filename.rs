use chrono::NaiveDate;

use super::super::store::ProgramCatalog;

/// Admission cycle year assumed by filename date inference. Upload names
/// carry only day (and optionally month), so the year is fixed; this is a
/// documented limitation of the naming convention, not a silent default.
pub const ADMISSION_YEAR: i32 = 2023;

/// Month assumed when the filename carries only a day segment.
pub const DEFAULT_MONTH: u32 = 8;

/// Program and date hints recovered from an upload filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameHints {
    pub program: Option<String>,
    pub date: Option<String>,
}

/// Recover hints from names shaped `<code>_<DD>.csv` or
/// `<code>_<DD>_<MM>.csv`. Program and date are inferred independently: an
/// unknown code still yields a date, and an invalid day/month still yields
/// a program.
pub fn infer(filename: &str, catalog: &ProgramCatalog) -> FilenameHints {
    let stem = match filename.strip_suffix(".csv") {
        Some(stem) => stem,
        None => return FilenameHints::default(),
    };

    let segments: Vec<&str> = stem.split('_').collect();
    let (code, date) = match segments.as_slice() {
        [code, day] => (code, two_digits(day).and_then(|day| iso_date(DEFAULT_MONTH, day))),
        [code, day, month] => (
            code,
            two_digits(day)
                .zip(two_digits(month))
                .and_then(|(day, month)| iso_date(month, day)),
        ),
        _ => return FilenameHints::default(),
    };

    let program = catalog
        .by_code(code)
        .map(|program| program.name.clone());

    FilenameHints { program, date }
}

fn two_digits(segment: &str) -> Option<u32> {
    if segment.len() != 2 || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn iso_date(month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(ADMISSION_YEAR, month, day)
        .map(|date| date.format("%Y-%m-%d").to_string())
}
