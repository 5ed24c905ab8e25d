use tracing::debug;

use crate::id3v2::{FrameBuilder, Tag, Version};
use crate::source::ByteSource;
use crate::tools::encoding::{decode_iso_8859_1, TextEncoding};
use crate::Error;
use crate::Frame;

/// The genre table shared by ID3v1 genre bytes and ID3v2 genre references:
/// the original 80 genres plus the Winamp extensions.
pub static GENRES: [&str; 148] = [
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychedelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
    "Folk",
    "Folk-Rock",
    "National Folk",
    "Swing",
    "Fast Fusion",
    "Bebob",
    "Latin",
    "Revival",
    "Celtic",
    "Bluegrass",
    "Avantgarde",
    "Gothic Rock",
    "Progressive Rock",
    "Psychedelic Rock",
    "Symphonic Rock",
    "Slow Rock",
    "Big Band",
    "Chorus",
    "Easy Listening",
    "Acoustic",
    "Humour",
    "Speech",
    "Chanson",
    "Opera",
    "Chamber Music",
    "Sonata",
    "Symphony",
    "Booty Bass",
    "Primus",
    "Porn Groove",
    "Satire",
    "Slow Jam",
    "Club",
    "Tango",
    "Samba",
    "Folklore",
    "Ballad",
    "Power Ballad",
    "Rhythmic Soul",
    "Freestyle",
    "Duet",
    "Punk Rock",
    "Drum Solo",
    "A Cappella",
    "Euro-House",
    "Dance Hall",
    "Goa",
    "Drum & Bass",
    "Club-House",
    "Hardcore",
    "Terror",
    "Indie",
    "BritPop",
    "Afro-Punk",
    "Polsk Punk",
    "Beat",
    "Christian Gangsta Rap",
    "Heavy Metal",
    "Black Metal",
    "Crossover",
    "Contemporary Christian",
    "Christian Rock",
    "Merengue",
    "Salsa",
    "Thrash Metal",
    "Anime",
    "JPop",
    "Synthpop",
];

pub fn get_genre(index: usize) -> Option<&'static str> {
    GENRES.get(index).copied()
}

// cut at the first NUL, then trim
fn fix(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    decode_iso_8859_1(&field[..end]).trim().to_string()
}

fn text_frame(id: &str, text: String) -> Option<Frame> {
    Some(
        FrameBuilder::for_id(id)?
            .encoding(TextEncoding::Latin1)
            .text(&text)
            .build(),
    )
}

/// Converts an ID3v1 or ID3v1.1 trailer into ID3v2.4 frames.
///
/// `data` must start at or before the `TAG` signature. Trailers between 124
/// and 128 bytes are accepted; the year field absorbs the difference, since
/// some writers stored short years with fewer than four bytes.
pub fn parse(data: &[u8]) -> Option<Vec<Frame>> {
    let start = data.windows(3).position(|w| w == b"TAG")?;
    let data = &data[start..];
    if data.len() < 124 || data.len() > 128 {
        return None;
    }

    let year_len = data.len() - 124;
    let title = fix(&data[3..33]);
    let artist = fix(&data[33..63]);
    let album = fix(&data[63..93]);
    let year = fix(&data[93..93 + year_len]);
    let comment_start = 93 + year_len;
    let comment = fix(&data[comment_start..comment_start + 29]);
    let track = data[data.len() - 2];
    let genre = data[data.len() - 1];

    let mut frames = Vec::new();
    let mut push = |id: &str, text: String| {
        if !text.is_empty() {
            frames.extend(text_frame(id, text));
        }
    };
    push("TIT2", title);
    push("TPE1", artist);
    push("TALB", album);
    push("TDRC", year);
    if !comment.is_empty() {
        frames.extend(FrameBuilder::for_id("COMM").map(|b| {
            b.encoding(TextEncoding::Latin1)
                .language("eng")
                .description("ID3v1 Comment")
                .text(&comment)
                .build()
        }));
    }
    // a comment padded with spaces rather than NULs leaves 32 in the track byte
    if track != 0 && (track != 32 || data[data.len() - 3] == 0) {
        frames.extend(text_frame("TRCK", track.to_string()));
    }
    if genre != 255 {
        frames.extend(text_frame("TCON", genre.to_string()));
    }
    Some(frames)
}

pub fn has_id3v1<S: ByteSource>(source: &mut S) -> bool {
    if source.len() < 128 {
        return false;
    }
    match source.read_at(source.len() - 128, 3) {
        Ok(v) => v == b"TAG",
        Err(_) => false,
    }
}

/// Reads the 128 byte trailer at the end of `source` into a tag.
pub fn get<S: ByteSource>(source: &mut S) -> Result<Tag, Error> {
    if source.len() < 128 {
        return Err(Error::NotFound("too small for ID3v1".to_string()));
    }
    let data = source.read_at(source.len() - 128, 128)?;
    if &data[0..3] != b"TAG" {
        return Err(Error::NotFound("ID3v1 tag not found".to_string()));
    }
    let frames = parse(&data).ok_or_else(|| Error::NotFound("ID3v1 tag not found".to_string()))?;
    debug!(frames = frames.len(), "read ID3v1 trailer");

    let mut tag = Tag::new(Version::V11);
    for frame in frames {
        tag.insert(frame);
    }
    Ok(tag)
}
