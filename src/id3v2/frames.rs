use std::collections::HashMap;

use crate::id3v2::specs::{FieldSpec, SpecKind};
use crate::id3v2::structure::Version;

/// What a frame means, independent of its byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Text,
    /// text that must coerce to a single integer
    NumericText,
    /// text of the form `N` or `N/M`
    NumericPartText,
    TimeStampText,
    /// content type, decoded through the genre grammar
    Genre,
    /// TXXX: described text
    UserText,
    UrlLink,
    /// WXXX: described URL
    UserUrl,
    /// comments, lyrics, terms of use
    Comment,
    Picture,
    Binary,
}

impl Category {
    pub fn renders_as_text(self) -> bool {
        match self {
            Category::Text
            | Category::NumericText
            | Category::NumericPartText
            | Category::TimeStampText
            | Category::Genre
            | Category::UserText
            | Category::Comment => true,
            _ => false,
        }
    }
    pub fn renders_as_number(self) -> bool {
        self == Category::NumericText || self == Category::NumericPartText
    }
    pub fn renders_as_number_pair(self) -> bool {
        self == Category::NumericPartText
    }
    pub fn has_description(self) -> bool {
        match self {
            Category::UserText | Category::UserUrl | Category::Comment | Category::Picture => true,
            _ => false,
        }
    }
    pub fn has_language(self) -> bool {
        self == Category::Comment
    }
    pub fn decodes_genres(self) -> bool {
        self == Category::Genre
    }
}

/// Static description of one frame id: its field layout, its category, and
/// which fields besides the id distinguish repeated instances.
#[derive(Debug, PartialEq)]
pub struct FrameKind {
    pub id: &'static str,
    pub specs: &'static [FieldSpec],
    pub category: Category,
    pub key_fields: &'static [&'static str],
}

const TEXT: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("text", SpecKind::Multi(&SpecKind::EncodedText)),
];
const TIMESTAMPS: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("text", SpecKind::Multi(&SpecKind::TimeStamp)),
];
const USER_TEXT: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("text", SpecKind::Multi(&SpecKind::EncodedText)),
];
const URL: &[FieldSpec] = &[FieldSpec::new("url", SpecKind::Latin1Text)];
const USER_URL: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("url", SpecKind::Latin1Text),
];
const COMMENT: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("lang", SpecKind::Fixed(3)),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("text", SpecKind::Multi(&SpecKind::EncodedText)),
];
const LYRICS: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("lang", SpecKind::Fixed(3)),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("text", SpecKind::EncodedText),
];
const TERMS: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("lang", SpecKind::Fixed(3)),
    FieldSpec::new("text", SpecKind::EncodedText),
];
const PICTURE: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("mime", SpecKind::Latin1Text),
    FieldSpec::new("type", SpecKind::Byte),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("data", SpecKind::Binary),
];
// v2.2 stores a three letter image format instead of a MIME type
const PICTURE_V22: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("mime", SpecKind::Fixed(3)),
    FieldSpec::new("type", SpecKind::Byte),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("data", SpecKind::Binary),
];
const OWNER_DATA: &[FieldSpec] = &[
    FieldSpec::new("owner", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
const POPULARIMETER: &[FieldSpec] = &[
    FieldSpec::new("email", SpecKind::Latin1Text),
    FieldSpec::new("rating", SpecKind::Byte),
    FieldSpec::new("count", SpecKind::Binary),
];
const OBJECT: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("mime", SpecKind::Latin1Text),
    FieldSpec::new("filename", SpecKind::EncodedText),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("data", SpecKind::Binary),
];
const SYNCED_LYRICS: &[FieldSpec] = &[
    FieldSpec::encoding(),
    FieldSpec::new("lang", SpecKind::Fixed(3)),
    FieldSpec::new("format", SpecKind::Byte),
    FieldSpec::new("type", SpecKind::Byte),
    FieldSpec::new("desc", SpecKind::EncodedText),
    FieldSpec::new("data", SpecKind::Binary),
];
const RELATIVE_VOLUME: &[FieldSpec] = &[
    FieldSpec::new("desc", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
const EQUALISATION: &[FieldSpec] = &[
    FieldSpec::new("method", SpecKind::Byte),
    FieldSpec::new("desc", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
const ENCRYPTION: &[FieldSpec] = &[
    FieldSpec::new("owner", SpecKind::Latin1Text),
    FieldSpec::new("method", SpecKind::Byte),
    FieldSpec::new("data", SpecKind::Binary),
];
const ENCRYPTED_META: &[FieldSpec] = &[
    FieldSpec::new("owner", SpecKind::Latin1Text),
    FieldSpec::new("desc", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
const GROUP_ID: &[FieldSpec] = &[
    FieldSpec::new("owner", SpecKind::Latin1Text),
    FieldSpec::new("group", SpecKind::Byte),
    FieldSpec::new("data", SpecKind::Binary),
];
const SIGNATURE: &[FieldSpec] = &[
    FieldSpec::new("group", SpecKind::Byte),
    FieldSpec::new("data", SpecKind::Binary),
];
const LINKED: &[FieldSpec] = &[
    FieldSpec::new("frameid", SpecKind::Fixed(4)),
    FieldSpec::new("url", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
// v2.2 links name a three character frame
const LINKED_V22: &[FieldSpec] = &[
    FieldSpec::new("frameid", SpecKind::Fixed(3)),
    FieldSpec::new("url", SpecKind::Latin1Text),
    FieldSpec::new("data", SpecKind::Binary),
];
const BINARY: &[FieldSpec] = &[FieldSpec::new("data", SpecKind::Binary)];

macro_rules! kinds {
    ($($id:expr => $specs:ident, $cat:ident $([$($key:expr),*])?;)*) => {
        &[$(FrameKind {
            id: $id,
            specs: $specs,
            category: Category::$cat,
            key_fields: &[$($($key),*)?],
        }),*]
    };
}

/// Frames of ID3v2.3 and ID3v2.4, which share four character ids.
pub static FRAMES: &[FrameKind] = kinds! {
    "TALB" => TEXT, Text;
    "TCOM" => TEXT, Text;
    "TCOP" => TEXT, Text;
    "TDAT" => TEXT, Text;
    "TENC" => TEXT, Text;
    "TEXT" => TEXT, Text;
    "TFLT" => TEXT, Text;
    "TIME" => TEXT, Text;
    "TIT1" => TEXT, Text;
    "TIT2" => TEXT, Text;
    "TIT3" => TEXT, Text;
    "TKEY" => TEXT, Text;
    "TLAN" => TEXT, Text;
    "TMED" => TEXT, Text;
    "TMOO" => TEXT, Text;
    "TOAL" => TEXT, Text;
    "TOFN" => TEXT, Text;
    "TOLY" => TEXT, Text;
    "TOPE" => TEXT, Text;
    "TOWN" => TEXT, Text;
    "TPE1" => TEXT, Text;
    "TPE2" => TEXT, Text;
    "TPE3" => TEXT, Text;
    "TPE4" => TEXT, Text;
    "TPRO" => TEXT, Text;
    "TPUB" => TEXT, Text;
    "TRDA" => TEXT, Text;
    "TRSN" => TEXT, Text;
    "TRSO" => TEXT, Text;
    "TSOA" => TEXT, Text;
    "TSOP" => TEXT, Text;
    "TSOT" => TEXT, Text;
    "TSO2" => TEXT, Text;
    "TSOC" => TEXT, Text;
    "TSRC" => TEXT, Text;
    "TSSE" => TEXT, Text;
    "TSST" => TEXT, Text;
    "TIPL" => TEXT, Text;
    "TMCL" => TEXT, Text;
    "IPLS" => TEXT, Text;
    "TCAT" => TEXT, Text;
    "TDES" => TEXT, Text;
    "TGID" => TEXT, Text;
    "TKWD" => TEXT, Text;
    "GRP1" => TEXT, Text;
    "MVNM" => TEXT, Text;

    "TBPM" => TEXT, NumericText;
    "TCMP" => TEXT, NumericText;
    "TDLY" => TEXT, NumericText;
    "TLEN" => TEXT, NumericText;
    "TORY" => TEXT, NumericText;
    "TSIZ" => TEXT, NumericText;
    "TYER" => TEXT, NumericText;

    "TPOS" => TEXT, NumericPartText;
    "TRCK" => TEXT, NumericPartText;
    "MVIN" => TEXT, NumericPartText;

    "TDEN" => TIMESTAMPS, TimeStampText;
    "TDOR" => TIMESTAMPS, TimeStampText;
    "TDRC" => TIMESTAMPS, TimeStampText;
    "TDRL" => TIMESTAMPS, TimeStampText;
    "TDTG" => TIMESTAMPS, TimeStampText;

    "TCON" => TEXT, Genre;
    "TXXX" => USER_TEXT, UserText ["desc"];

    "WCOM" => URL, UrlLink ["url"];
    "WCOP" => URL, UrlLink;
    "WFED" => URL, UrlLink;
    "WOAF" => URL, UrlLink;
    "WOAR" => URL, UrlLink ["url"];
    "WOAS" => URL, UrlLink;
    "WORS" => URL, UrlLink;
    "WPAY" => URL, UrlLink;
    "WPUB" => URL, UrlLink;
    "WXXX" => USER_URL, UserUrl ["desc"];

    "COMM" => COMMENT, Comment ["desc", "lang"];
    "USLT" => LYRICS, Comment ["desc", "lang"];
    "USER" => TERMS, Comment ["lang"];

    "APIC" => PICTURE, Picture ["desc"];

    "UFID" => OWNER_DATA, Binary ["owner"];
    "PRIV" => OWNER_DATA, Binary ["owner"];
    "POPM" => POPULARIMETER, Binary ["email"];
    "GEOB" => OBJECT, Binary ["desc"];
    "PCNT" => BINARY, Binary;
    "MCDI" => BINARY, Binary;
    "ETCO" => BINARY, Binary;
    "MLLT" => BINARY, Binary;
    "SYTC" => BINARY, Binary;
    "SYLT" => SYNCED_LYRICS, Binary ["desc", "lang"];
    "RVA2" => RELATIVE_VOLUME, Binary ["desc"];
    "EQU2" => EQUALISATION, Binary ["desc"];
    "RVAD" => BINARY, Binary;
    "EQUA" => BINARY, Binary;
    "RVRB" => BINARY, Binary;
    "RBUF" => BINARY, Binary;
    "AENC" => OWNER_DATA, Binary ["owner"];
    "LINK" => LINKED, Binary ["frameid", "url"];
    "POSS" => BINARY, Binary;
    "COMR" => BINARY, Binary;
    "ENCR" => ENCRYPTION, Binary ["owner"];
    "GRID" => GROUP_ID, Binary ["group"];
    "SIGN" => SIGNATURE, Binary ["group"];
    "SEEK" => BINARY, Binary;
    "ASPI" => BINARY, Binary;
    "OWNE" => BINARY, Binary;
};

/// Frames of ID3v2.2, with three character ids.
pub static FRAMES_2_2: &[FrameKind] = kinds! {
    "TAL" => TEXT, Text;
    "TCM" => TEXT, Text;
    "TCR" => TEXT, Text;
    "TDA" => TEXT, Text;
    "TEN" => TEXT, Text;
    "TFT" => TEXT, Text;
    "TIM" => TEXT, Text;
    "TKE" => TEXT, Text;
    "TLA" => TEXT, Text;
    "TMT" => TEXT, Text;
    "TOA" => TEXT, Text;
    "TOF" => TEXT, Text;
    "TOL" => TEXT, Text;
    "TOT" => TEXT, Text;
    "TP1" => TEXT, Text;
    "TP2" => TEXT, Text;
    "TP3" => TEXT, Text;
    "TP4" => TEXT, Text;
    "TPB" => TEXT, Text;
    "TRC" => TEXT, Text;
    "TRD" => TEXT, Text;
    "TSS" => TEXT, Text;
    "TT1" => TEXT, Text;
    "TT2" => TEXT, Text;
    "TT3" => TEXT, Text;
    "TXT" => TEXT, Text;
    "IPL" => TEXT, Text;

    "TBP" => TEXT, NumericText;
    "TCP" => TEXT, NumericText;
    "TDY" => TEXT, NumericText;
    "TLE" => TEXT, NumericText;
    "TOR" => TEXT, NumericText;
    "TSI" => TEXT, NumericText;
    "TYE" => TEXT, NumericText;

    "TPA" => TEXT, NumericPartText;
    "TRK" => TEXT, NumericPartText;

    "TCO" => TEXT, Genre;
    "TXX" => USER_TEXT, UserText ["desc"];

    "WAF" => URL, UrlLink;
    "WAR" => URL, UrlLink ["url"];
    "WAS" => URL, UrlLink;
    "WCM" => URL, UrlLink ["url"];
    "WCP" => URL, UrlLink;
    "WPB" => URL, UrlLink;
    "WXX" => USER_URL, UserUrl ["desc"];

    "COM" => COMMENT, Comment ["desc", "lang"];
    "ULT" => LYRICS, Comment ["desc", "lang"];

    "PIC" => PICTURE_V22, Picture ["desc"];

    "UFI" => OWNER_DATA, Binary ["owner"];
    "POP" => POPULARIMETER, Binary ["email"];
    "GEO" => OBJECT, Binary ["desc"];
    "CNT" => BINARY, Binary;
    "MCI" => BINARY, Binary;
    "ETC" => BINARY, Binary;
    "MLL" => BINARY, Binary;
    "STC" => BINARY, Binary;
    "SLT" => SYNCED_LYRICS, Binary ["desc", "lang"];
    "RVA" => BINARY, Binary;
    "EQU" => BINARY, Binary;
    "REV" => BINARY, Binary;
    "BUF" => BINARY, Binary;
    "CRA" => OWNER_DATA, Binary ["owner"];
    "CRM" => ENCRYPTED_META, Binary ["owner"];
    "LNK" => LINKED_V22, Binary ["frameid", "url"];
};

pub type FrameTable = HashMap<&'static str, &'static FrameKind>;

lazy_static! {
    static ref TABLE: FrameTable = FRAMES.iter().map(|k| (k.id, k)).collect();
    static ref TABLE_2_2: FrameTable = FRAMES_2_2.iter().map(|k| (k.id, k)).collect();
}

/// The id table a tag of `version` draws its frames from.
pub fn table(version: Version) -> &'static FrameTable {
    if version.minor == 2 {
        &*TABLE_2_2
    } else {
        &*TABLE
    }
}

pub fn lookup(version: Version, id: &str) -> Option<&'static FrameKind> {
    table(version).get(id).copied()
}

/// Looks an id up in whichever table its length selects.
pub fn lookup_any(id: &str) -> Option<&'static FrameKind> {
    match id.len() {
        3 => TABLE_2_2.get(id).copied(),
        _ => TABLE.get(id).copied(),
    }
}

/// Whether four bytes spell a v2.3/v2.4 frame id this crate knows.
pub fn is_known_id(id: &[u8]) -> bool {
    std::str::from_utf8(id)
        .map(|s| TABLE.contains_key(s))
        .unwrap_or(false)
}
