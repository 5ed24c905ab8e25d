extern crate regex;
use self::regex::Regex;

lazy_static! {
    // (id)(id)... followed by free text
    pub static ref GENRE: Regex = Regex::new(r"(?s)^((?:\((?:[0-9]+|RX|CR)\))*)(.+)?$").unwrap();
    static ref NUMBER_PAIR: Regex = Regex::new(r"^\s*(\d+)\s*(?:/\s*(\d*)\s*)?$").unwrap();
}

/// `"N"` or `"N/M"`, as used for track and disc numbers.
pub fn get_number_pair(input: &str) -> Option<(i64, Option<i64>)> {
    let c = NUMBER_PAIR.captures(input)?;
    let n = c.get(1)?.as_str().parse::<i64>().ok()?;
    let total = c.get(2).and_then(|m| m.as_str().parse::<i64>().ok());
    Some((n, total))
}

pub fn get_number(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}
