use std::cmp::Ordering;
use std::fmt;

extern crate regex;
use self::regex::Regex;

/// An ID3 timestamp such as `2004`, `2004-05` or `2004-05-06T07:08:09`.
///
/// Every component is optional; a component is only set when the source text
/// was long enough to carry it. Two timestamps compare by their formatted text.
#[derive(Debug, Clone, Default)]
pub struct TimeStamp {
    pub year: Option<i64>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl TimeStamp {
    pub fn parse(text: &str) -> TimeStamp {
        lazy_static! {
            static ref SPLIT: Regex = Regex::new(r"[-T:/.]|\s+").unwrap();
        }
        // pad so that missing components split out as empty strings
        let padded = format!("{}:::::", text);
        let mut parts = SPLIT.split(&padded);
        let mut next = || parts.next().unwrap_or("");

        TimeStamp {
            year: next().parse().ok(),
            month: next().parse().ok(),
            day: next().parse().ok(),
            hour: next().parse().ok(),
            minute: next().parse().ok(),
            second: next().parse().ok(),
        }
    }

    pub fn text(&self) -> String {
        let mut s = String::with_capacity(19);
        if let Some(x) = self.year {
            s.push_str(format!("{:04}", x).as_str());
            if let Some(x) = self.month {
                s.push_str(format!("-{:02}", x).as_str());
                if let Some(x) = self.day {
                    s.push_str(format!("-{:02}", x).as_str());
                    if let Some(x) = self.hour {
                        s.push_str(format!("T{:02}", x).as_str());
                        if let Some(x) = self.minute {
                            s.push_str(format!(":{:02}", x).as_str());
                            if let Some(x) = self.second {
                                s.push_str(format!(":{:02}", x).as_str());
                            }
                        }
                    }
                }
            }
        }
        s
    }
}

impl PartialEq for TimeStamp {
    fn eq(&self, other: &TimeStamp) -> bool {
        self.text() == other.text()
    }
}

impl Eq for TimeStamp {}

impl PartialOrd for TimeStamp {
    fn partial_cmp(&self, other: &TimeStamp) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStamp {
    fn cmp(&self, other: &TimeStamp) -> Ordering {
        self.text().cmp(&other.text())
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[test]
fn test() {
    assert_eq!(
        TimeStamp::parse("2000"),
        TimeStamp {
            year: Some(2000),
            ..Default::default()
        }
    );
    let ts = TimeStamp::parse("2000-01");
    assert_eq!((ts.year, ts.month, ts.day), (Some(2000), Some(1), None));

    let ts = TimeStamp::parse("2000-01-02T03:04:05");
    assert_eq!(ts.day, Some(2));
    assert_eq!(ts.hour, Some(3));
    assert_eq!(ts.minute, Some(4));
    assert_eq!(ts.second, Some(5));

    // space separated dates are accepted but formatted with a T
    assert_eq!(
        TimeStamp::parse("2000-01-02 03:04").text(),
        "2000-01-02T03:04"
    );

    let s = "2000-01-01T00:00:00";
    assert_eq!(TimeStamp::parse(s).text(), s.to_string());

    assert_eq!(TimeStamp::parse("ab").text(), "");
    assert_eq!(TimeStamp::parse("ab"), TimeStamp::parse(""));
    assert!(TimeStamp::parse("1987") < TimeStamp::parse("1988"));
}

#[cfg(feature = "chrono")]
mod chrono {
    use crate::TimeStamp;
    extern crate chrono;
    use self::chrono::DateTime as ChronoDateTime;
    use self::chrono::{Datelike, TimeZone, Timelike, Utc};

    impl<Tz: TimeZone> From<ChronoDateTime<Tz>> for TimeStamp {
        fn from(cdt: ChronoDateTime<Tz>) -> TimeStamp {
            let cdt = cdt.with_timezone(&Utc);
            TimeStamp {
                year: Some(cdt.year() as i64),
                month: Some(cdt.month() as u8),
                day: Some(cdt.day() as u8),
                hour: Some(cdt.hour() as u8),
                minute: Some(cdt.minute() as u8),
                second: Some(cdt.second() as u8),
            }
        }
    }

    use self::chrono::{NaiveDate, NaiveDateTime};

    impl From<TimeStamp> for Option<NaiveDateTime> {
        fn from(ts: TimeStamp) -> Option<NaiveDateTime> {
            NaiveDate::from_ymd_opt(
                ts.year? as i32,
                ts.month.unwrap_or(1) as u32,
                ts.day.unwrap_or(1) as u32,
            )?
            .and_hms_opt(
                ts.hour.unwrap_or(0) as u32,
                ts.minute.unwrap_or(0) as u32,
                ts.second.unwrap_or(0) as u32,
            )
        }
    }

    impl From<TimeStamp> for Option<ChronoDateTime<Utc>> {
        fn from(ts: TimeStamp) -> Option<ChronoDateTime<Utc>> {
            let ndt: Option<NaiveDateTime> = ts.into();
            Some(Utc.from_utc_datetime(&ndt?))
        }
    }

    #[test]
    fn from_chrono() {
        let s = "2000-01-01T00:00:00-00:00";
        let cdt = ChronoDateTime::parse_from_rfc3339(s).unwrap();
        let ts = TimeStamp::parse(s);
        assert_eq!(ts, cdt.into());
    }

    #[test]
    fn into_chrono() {
        let ts = TimeStamp::parse("2000-01-01T00:00:00");
        let cdt = ChronoDateTime::parse_from_rfc3339("2000-01-01T00:00:00+00:00").unwrap();
        assert_eq!(cdt, Option::<ChronoDateTime<Utc>>::from(ts).unwrap());
    }
}
