use crate::id3v1::get_genre;
use crate::id3v2::regex::GENRE;

fn by_id(id: &str) -> String {
    match id {
        "CR" => "Cover".to_string(),
        "RX" => "Remix".to_string(),
        _ => id
            .parse::<usize>()
            .ok()
            .and_then(get_genre)
            .unwrap_or("Unknown")
            .to_string(),
    }
}

/// Decodes content type text into genre names.
///
/// Values are separated by `\0`. Each value is either a bare table index, a
/// run of parenthesized references (`(17)`, `(RX)`, `(CR)`) optionally followed
/// by a free-text refinement, or plain text. `((` escapes a literal paren.
pub fn parse(text: &str) -> Vec<String> {
    let mut genres = Vec::new();

    for token in text.split('\0') {
        if token.is_empty() {
            continue;
        }
        if token.bytes().all(|b| b.is_ascii_digit()) || token == "CR" || token == "RX" {
            genres.push(by_id(token));
            continue;
        }

        let caps = match GENRE.captures(token) {
            Some(c) => c,
            None => continue,
        };
        let mut found: Vec<String> = Vec::new();
        if let Some(ids) = caps.get(1) {
            let ids = ids.as_str();
            if ids.len() > 2 {
                found.extend(ids[1..ids.len() - 1].split(")(").map(by_id));
            }
        }
        if let Some(name) = caps.get(2) {
            let mut name = name.as_str();
            if name.starts_with("((") {
                name = &name[1..];
            }
            // "(20)Alternative" is a refinement that repeats the reference
            if !found.iter().any(|g| g == name) {
                found.push(name.to_string());
            }
        }
        genres.extend(found);
    }
    genres
}
