use std::collections::HashMap;
use std::fmt;
use std::io::prelude::*;

use tracing::debug;

use crate::id3v1;
use crate::id3v2::frame::{Frame, FrameBuilder, HashKey};
use crate::id3v2::frames::{self, Category};
use crate::id3v2::read::{self, FrameReader, ReadFrame};
use crate::id3v2::regex::{get_number, get_number_pair};
use crate::id3v2::structure::{ExtendedHeader, Header, Version};
use crate::id3v2::tools::undo_unsynch;
use crate::source::{ByteSource, Source};
use crate::Error;
use crate::Image;
use crate::TimeStamp;

/// v2.2 ids and the v2.3 ids that replaced them.
pub static V22_TO_V23: &[(&str, &str)] = &[
    ("TAL", "TALB"),
    ("TCM", "TCOM"),
    ("TCR", "TCOP"),
    ("TDA", "TDAT"),
    ("TEN", "TENC"),
    ("TFT", "TFLT"),
    ("TIM", "TIME"),
    ("TKE", "TKEY"),
    ("TLA", "TLAN"),
    ("TMT", "TMED"),
    ("TOA", "TOPE"),
    ("TOF", "TOFN"),
    ("TOL", "TOLY"),
    ("TOT", "TOAL"),
    ("TP1", "TPE1"),
    ("TP2", "TPE2"),
    ("TP3", "TPE3"),
    ("TP4", "TPE4"),
    ("TPB", "TPUB"),
    ("TRC", "TSRC"),
    ("TRD", "TRDA"),
    ("TSS", "TSSE"),
    ("TT1", "TIT1"),
    ("TT2", "TIT2"),
    ("TT3", "TIT3"),
    ("TXT", "TEXT"),
    ("IPL", "IPLS"),
    ("TBP", "TBPM"),
    ("TCP", "TCMP"),
    ("TDY", "TDLY"),
    ("TLE", "TLEN"),
    ("TOR", "TORY"),
    ("TSI", "TSIZ"),
    ("TYE", "TYER"),
    ("TPA", "TPOS"),
    ("TRK", "TRCK"),
    ("TCO", "TCON"),
    ("TXX", "TXXX"),
    ("WAF", "WOAF"),
    ("WAR", "WOAR"),
    ("WAS", "WOAS"),
    ("WCM", "WCOM"),
    ("WCP", "WCOP"),
    ("WPB", "WPUB"),
    ("WXX", "WXXX"),
    ("COM", "COMM"),
    ("ULT", "USLT"),
    ("PIC", "APIC"),
    ("UFI", "UFID"),
    ("POP", "POPM"),
    ("GEO", "GEOB"),
    ("CNT", "PCNT"),
    ("MCI", "MCDI"),
    ("ETC", "ETCO"),
    ("MLL", "MLLT"),
    ("STC", "SYTC"),
    ("SLT", "SYLT"),
    ("RVA", "RVAD"),
    ("EQU", "EQUA"),
    ("REV", "RVRB"),
    ("BUF", "RBUF"),
    ("LNK", "LINK"),
    ("CRA", "AENC"),
];

/// v2.3 ids renamed in v2.4. TYER, TDAT and TIME are merged into TDRC
/// separately.
pub static V23_TO_V24: &[(&str, &str)] = &[("TORY", "TDOR"), ("IPLS", "TIPL")];

/// Which frame ids a load rewrites to their newer equivalents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Canonicalization {
    /// keep ids as read
    None,
    /// v2.2 ids become v2.3 ids
    V23,
    /// v2.2 and v2.3 ids become v2.4 ids, and the v2.3 date frames merge
    V24,
    /// a caller-supplied `(from, to)` rename table
    Custom(&'static [(&'static str, &'static str)]),
}

impl Default for Canonicalization {
    fn default() -> Canonicalization {
        Canonicalization::V24
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub canonicalization: Canonicalization,
    /// read the ID3v1 trailer when there is no usable ID3v2 tag
    pub id3v1_fallback: bool,
    /// add ID3v1 frames the ID3v2 tag does not have
    pub fill_from_id3v1: bool,
}

impl Default for LoadOptions {
    fn default() -> LoadOptions {
        LoadOptions {
            canonicalization: Canonicalization::default(),
            id3v1_fallback: true,
            fill_from_id3v1: false,
        }
    }
}

// Renames frames through `table`. A frame whose new id is already taken is
// dropped instead.
fn rename(frames: Vec<Frame>, table: &[(&str, &str)]) -> Vec<Frame> {
    let present: Vec<&'static str> = frames.iter().map(|f| f.id()).collect();
    frames
        .into_iter()
        .filter_map(|f| {
            let target = table
                .iter()
                .find(|(from, _)| *from == f.id())
                .and_then(|(_, to)| frames::lookup_any(to));
            match target {
                Some(kind) if present.contains(&kind.id) => {
                    debug!(frame = f.id(), replacement = kind.id, "dropping superseded frame");
                    None
                }
                Some(kind) => Some(f.convert(kind)),
                None => Some(f),
            }
        })
        .collect()
}

fn first_text(frames: &[Frame], id: &str) -> Option<String> {
    frames
        .iter()
        .find(|f| f.id() == id)
        .and_then(|f| f.text().into_iter().next())
        .filter(|s| !s.trim_matches('\0').is_empty())
}

// TYER "YYYY" + TDAT "DDMM" + TIME "HHMM" -> TDRC "YYYY-MM-DDTHH:MM"
fn merge_dates(frames: Vec<Frame>) -> Vec<Frame> {
    let year = match first_text(&frames, "TYER") {
        Some(y) => y,
        None => return frames,
    };
    let mut date = year;
    let mut consumed = vec!["TYER"];
    if let Some(dat) = first_text(&frames, "TDAT") {
        consumed.push("TDAT");
        if dat.len() == 4 && dat.bytes().all(|b| b.is_ascii_digit()) {
            date = format!("{}-{}-{}", date, &dat[2..], &dat[..2]);
            if let Some(time) = first_text(&frames, "TIME") {
                consumed.push("TIME");
                if time.len() == 4 && time.bytes().all(|b| b.is_ascii_digit()) {
                    date = format!("{}T{}:{}", date, &time[..2], &time[2..]);
                }
            }
        }
    }

    let has_tdrc = frames.iter().any(|f| f.id() == "TDRC");
    let mut merged = Vec::with_capacity(frames.len());
    for f in frames {
        if f.id() == "TYER" && !has_tdrc {
            if let Some(builder) = FrameBuilder::for_id("TDRC") {
                let builder = match f.encoding() {
                    Some(enc) => builder.encoding(enc),
                    None => builder,
                };
                merged.push(builder.text(&date).build());
            }
        } else if !consumed.contains(&f.id()) {
            merged.push(f);
        }
    }
    merged
}

pub fn canonicalize(frames: Vec<Frame>, canonicalization: Canonicalization) -> Vec<Frame> {
    match canonicalization {
        Canonicalization::None => frames,
        Canonicalization::V23 => rename(frames, V22_TO_V23),
        Canonicalization::V24 => merge_dates(rename(rename(frames, V22_TO_V23), V23_TO_V24)),
        Canonicalization::Custom(table) => rename(frames, table),
    }
}

/// A single value pulled out of a frame, compared as text or as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    text: String,
    category: Category,
}

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_number(&self) -> Result<i64, Error> {
        let n = if self.category == Category::NumericPartText {
            get_number_pair(&self.text).map(|(n, _)| n)
        } else {
            get_number(&self.text)
        };
        n.ok_or_else(|| Error::NotNumeric(self.text.clone()))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl<'a> PartialEq<&'a str> for Scalar {
    fn eq(&self, other: &&'a str) -> bool {
        self.text == *other
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        self.as_number().map_or(false, |n| n == *other)
    }
}

/// A decoded tag: frames keyed by [`HashKey`] in load order, plus the raw
/// records of frames no table knows.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    version: Version,
    flags: u8,
    header: Option<Header>,
    frames: Vec<Frame>,
    index: HashMap<HashKey, usize>,
    unknown_frames: Vec<Vec<u8>>,
}

impl Tag {
    pub fn new(version: Version) -> Tag {
        Tag {
            version,
            flags: 0,
            header: None,
            frames: Vec::new(),
            index: HashMap::new(),
            unknown_frames: Vec::new(),
        }
    }

    /// Loads with default options from anything seekable.
    pub fn read_from<T: Read + Seek>(input: T) -> Result<Tag, Error> {
        let mut source = Source::new(input)?;
        Tag::load(&mut source, &LoadOptions::default())
    }

    pub fn load<S: ByteSource>(source: &mut S, options: &LoadOptions) -> Result<Tag, Error> {
        if source.len() < read::HEADER_LEN {
            return Err(Error::NotFound("too small".to_string()));
        }

        let header = match read::header(source) {
            Ok(h) => h,
            Err(e @ Error::NotFound(_)) | Err(e @ Error::UnsupportedVersion(_))
                if options.id3v1_fallback =>
            {
                debug!(error = %e, "no usable ID3v2 tag, trying ID3v1");
                return id3v1::get(source).map_err(|_| e);
            }
            Err(e) => return Err(e),
        };

        let (offset, len) = read::body_range(&header);
        let mut body = source.read_at(offset, len)?;
        // before v2.4 unsynchronization covers the whole tag at once
        if header.is_unsynchronized() && header.version < Version::V24 {
            match undo_unsynch(&body) {
                Ok(v) => body = v,
                Err(e) => debug!(error = %e, "using the tag body as is"),
            }
        }

        let mut tag = Tag::new(header.version);
        tag.flags = header.flags;

        let mut frames = Vec::new();
        for item in FrameReader::new(header.version, header.flags, &body) {
            match item {
                ReadFrame::Known(frame) => frames.push(frame),
                ReadFrame::Unknown(raw) => tag.unknown_frames.push(raw),
            }
        }
        for frame in canonicalize(frames, options.canonicalization) {
            tag.insert(frame);
        }
        tag.header = Some(header);

        if options.fill_from_id3v1 && id3v1::has_id3v1(source) {
            if let Ok(v1) = id3v1::get(source) {
                for frame in v1.frames {
                    if !tag.contains(frame.hash_key().as_str()) {
                        tag.insert(frame);
                    }
                }
            }
        }

        debug!(
            version = %tag.version,
            frames = tag.frames.len(),
            unknown = tag.unknown_frames.len(),
            "loaded tag"
        );
        Ok(tag)
    }

    /// Adds a frame. A frame with the same key is replaced in place.
    pub fn insert(&mut self, frame: Frame) {
        match self.index.get(frame.hash_key()) {
            Some(&i) => self.frames[i] = frame,
            None => {
                self.index.insert(frame.hash_key().clone(), self.frames.len());
                self.frames.push(frame);
            }
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.header.as_ref()?.extended_header.as_ref()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn unknown_frames(&self) -> &[Vec<u8>] {
        &self.unknown_frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&HashKey::from(key))
    }

    /// The frame stored under `key`, e.g. `"TIT2"` or `"COMM:desc:eng"`.
    pub fn get(&self, key: &str) -> Option<&Frame> {
        self.index.get(&HashKey::from(key)).map(|&i| &self.frames[i])
    }

    pub fn get_all(&self, id: &str) -> Vec<&Frame> {
        self.frames.iter().filter(|f| f.id() == id).collect()
    }

    /// First value of the first frame with `id`.
    pub fn scalar(&self, id: &str) -> Option<Scalar> {
        let frame = self.get(id).or_else(|| self.frames.iter().find(|f| f.id() == id))?;
        let text = if frame.category().renders_as_text() {
            frame.text().into_iter().next().unwrap_or_default()
        } else {
            frame.to_string()
        };
        Some(Scalar {
            text,
            category: frame.category(),
        })
    }

    // the v2.2 id is tried too, for tags loaded without canonicalization
    fn find(&self, ids: &[&str]) -> Option<&Frame> {
        ids.iter()
            .filter_map(|id| self.frames.iter().find(|f| f.id() == *id))
            .next()
    }

    fn text_of(&self, ids: &[&str]) -> Option<String> {
        self.find(ids)?.text().into_iter().next()
    }

    pub fn title(&self) -> Option<String> {
        self.text_of(&["TIT2", "TT2"])
    }

    pub fn artist(&self) -> Option<String> {
        self.text_of(&["TPE1", "TP1"])
    }

    pub fn album(&self) -> Option<String> {
        self.text_of(&["TALB", "TAL"])
    }

    pub fn album_artist(&self) -> Option<String> {
        self.text_of(&["TPE2", "TP2"])
    }

    pub fn composer(&self) -> Option<String> {
        self.text_of(&["TCOM", "TCM"])
    }

    pub fn grouping(&self) -> Option<String> {
        self.text_of(&["TIT1", "TT1"])
    }

    pub fn genres(&self) -> Vec<String> {
        self.find(&["TCON", "TCO"])
            .map(|f| f.genres())
            .unwrap_or_default()
    }

    pub fn date(&self) -> Option<TimeStamp> {
        match self.find(&["TDRC"]) {
            Some(f) => f.timestamps().into_iter().next(),
            None => self.text_of(&["TYER", "TYE"]).map(|y| TimeStamp::parse(&y)),
        }
    }

    pub fn track(&self) -> Option<(i64, Option<i64>)> {
        self.find(&["TRCK", "TRK"])?.as_number_pair().ok()
    }

    pub fn disc(&self) -> Option<(i64, Option<i64>)> {
        self.find(&["TPOS", "TPA"])?.as_number_pair().ok()
    }

    pub fn bpm(&self) -> Option<i64> {
        self.find(&["TBPM", "TBP"])?.as_number().ok()
    }

    /// Length in milliseconds.
    pub fn length(&self) -> Option<i64> {
        self.find(&["TLEN", "TLE"])?.as_number().ok()
    }

    /// Text of the comment without a description, else of the first comment.
    pub fn comment(&self) -> Option<String> {
        let comments: Vec<&Frame> = self
            .frames
            .iter()
            .filter(|f| f.id() == "COMM" || f.id() == "COM")
            .collect();
        comments
            .iter()
            .find(|f| f.description().map_or(true, |d| d.is_empty()))
            .or_else(|| comments.first())
            .and_then(|f| f.text().into_iter().next())
    }

    /// The front cover picture, or failing that the first readable picture.
    pub fn front_cover(&self) -> Option<Image> {
        let pictures = self
            .frames
            .iter()
            .filter(|f| f.category() == Category::Picture);
        let mut fallback = None;
        for f in pictures {
            match (f.picture_type(), f.image()) {
                (Some(3), Some(image)) => return Some(image),
                (_, Some(image)) if fallback.is_none() => fallback = Some(image),
                _ => (),
            }
        }
        fallback
    }
}
