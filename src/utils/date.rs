//! Dates for content frontmatter, feeds and sitemap `lastmod`.
//!
//! Accepted input: `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SSZ`, always UTC.
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z")?;
//! assert_eq!(dt.to_rfc2822(), "Sat, 15 Jun 2024 14:30:45 GMT");
//! ```

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A UTC timestamp. Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current UTC date from the system clock, time fields zeroed.
    pub fn today() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let days = i64::try_from(secs / 86_400).unwrap_or_default();
        let (year, month, day) = civil_from_days(days);
        Self::from_ymd(year, month, day)
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (date, time) = match s.split_once('T') {
            Some((date, time)) => (date, Some(time.strip_suffix('Z')?)),
            None => (s, None),
        };

        let mut ymd = date.splitn(3, '-');
        let year = fixed_digits(ymd.next()?, 4)?;
        let month = fixed_digits(ymd.next()?, 2)?;
        let day = fixed_digits(ymd.next()?, 2)?;

        let (hour, minute, second) = match time {
            None => (0, 0, 0),
            Some(time) => {
                let mut hms = time.splitn(3, ':');
                (
                    fixed_digits(hms.next()?, 2)?,
                    fixed_digits(hms.next()?, 2)?,
                    fixed_digits(hms.next()?, 2)?,
                )
            }
        };

        let dt = Self::new(
            u16::try_from(year).ok()?,
            u8::try_from(month).ok()?,
            u8::try_from(day).ok()?,
            u8::try_from(hour).ok()?,
            u8::try_from(minute).ok()?,
            u8::try_from(second).ok()?,
        );
        dt.is_valid().then_some(dt)
    }

    fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
            && (1..=days_in_month(self.year, self.month)).contains(&self.day)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// `YYYY-MM-DD` (sitemap `lastmod`).
    pub fn to_ymd(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `Sat, 15 Jun 2024 14:30:45 GMT` (RSS dates).
    pub fn to_rfc2822(self) -> String {
        let weekday = days_from_civil(self.year, self.month, self.day).rem_euclid(7);
        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[weekday as usize],
            self.day,
            MONTHS[usize::from(self.month.saturating_sub(1)).min(11)],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }
}

const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Exactly `len` ASCII digits.
fn fixed_digits(s: &str, len: usize) -> Option<u32> {
    (s.len() == len && s.bytes().all(|b| b.is_ascii_digit()))
        .then(|| s.parse().ok())
        .flatten()
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn civil_from_days(days: i64) -> (u16, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year as u16, month as u8, day as u8)
}

/// Inverse of [`civil_from_days`].
const fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let m = month as i64;
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_datetime() {
        assert_eq!(
            DateTimeUtc::parse("2024-06-15"),
            Some(DateTimeUtc::from_ymd(2024, 6, 15))
        );
        assert_eq!(
            DateTimeUtc::parse("2024-06-15T14:30:45Z"),
            Some(DateTimeUtc::new(2024, 6, 15, 14, 30, 45))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "15/06/2024",
            "2024-6-15",
            "2024-06-15T14:30:45",
            "2024-06-15T14:30Z",
            "2024-06-15 14:30:45",
            "",
        ] {
            assert_eq!(DateTimeUtc::parse(input), None, "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(DateTimeUtc::parse("2024-13-01"), None);
        assert_eq!(DateTimeUtc::parse("2024-04-31"), None);
        assert_eq!(DateTimeUtc::parse("2023-02-29"), None);
        assert_eq!(DateTimeUtc::parse("1900-02-29"), None);
        assert_eq!(DateTimeUtc::parse("2024-06-15T24:00:00Z"), None);
        assert!(DateTimeUtc::parse("2024-02-29").is_some());
        assert!(DateTimeUtc::parse("2000-02-29").is_some());
    }

    #[test]
    fn test_to_rfc2822() {
        assert_eq!(
            DateTimeUtc::new(2024, 6, 15, 14, 30, 45).to_rfc2822(),
            "Sat, 15 Jun 2024 14:30:45 GMT"
        );
        assert_eq!(
            DateTimeUtc::from_ymd(2024, 1, 1).to_rfc2822(),
            "Mon, 01 Jan 2024 00:00:00 GMT"
        );
        assert_eq!(
            DateTimeUtc::from_ymd(1970, 1, 1).to_rfc2822(),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_ordering_is_chronological() {
        let older = DateTimeUtc::from_ymd(2023, 12, 31);
        let newer = DateTimeUtc::new(2024, 1, 1, 0, 0, 1);
        assert!(older < newer);
        assert!(DateTimeUtc::from_ymd(2024, 1, 1) < newer);
    }

    #[test]
    fn test_civil_days_round_trip() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
        assert_eq!(civil_from_days(19_782), (2024, 2, 29));
        assert_eq!(days_from_civil(2024, 2, 29), 19_782);
    }

    #[test]
    fn test_to_ymd() {
        assert_eq!(DateTimeUtc::new(2024, 6, 5, 1, 2, 3).to_ymd(), "2024-06-05");
        assert!(DateTimeUtc::today().is_valid());
    }
}
