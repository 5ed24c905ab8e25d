
use std::fs::File;
use std::io::Cursor;

use crate::id3v2::frames::lookup;
use crate::id3v2::read::{self, load_frame, FrameReader, ReadFrame};
use crate::id3v2::*;
use crate::tools::encoding::TextEncoding;
use crate::Error;
use crate::Source;
use crate::TimeStamp;

fn source(data: &[u8]) -> Source<Cursor<Vec<u8>>> {
    Source::new(Cursor::new(data.to_vec())).unwrap()
}

fn from_hex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn open(name: &str) -> Source<File> {
    Source::new(File::open(format!("testfiles/{}", name)).unwrap()).unwrap()
}

fn load(name: &str) -> Tag {
    Tag::load(&mut open(name), &LoadOptions::default()).unwrap()
}

fn read_all(version: Version, tag_flags: u8, data: &[u8]) -> Vec<ReadFrame> {
    FrameReader::new(version, tag_flags, data).collect()
}

fn tpe1(version: Version, flags: u16, data: &str) -> Result<Frame, Error> {
    load_frame(lookup(version, "TPE1").unwrap(), version, 0, flags, &from_hex(data))
}

#[test]
fn header_test() {
    let h = read::header(&mut open("silence-44-s.mp3")).unwrap();
    assert_eq!(h.version, Version::new(2, 3));
    assert_eq!(h.version.minor, 3);
    assert_eq!(h.size, 1314);
    assert_eq!(h.flags, 0);
    assert!(h.extended_header.is_none());
}

#[test]
fn header_errors_test() {
    match read::header(&mut source(b"ID3\x04\x00\x00\x00")) {
        Err(Error::UnexpectedEndOfData { wanted: 10, available: 7 }) => (),
        x => panic!("expected end of data, got {:?}", x),
    }
    match read::header(&mut source(b"ID3\x01\x00\x00\x00\x00\x00\x00")) {
        Err(Error::UnsupportedVersion(1)) => (),
        x => panic!("expected unsupported version, got {:?}", x),
    }
    match read::header(&mut source(b"ID3\x05\x00\x00\x00\x00\x00\x00")) {
        Err(Error::UnsupportedVersion(5)) => (),
        x => panic!("expected unsupported version, got {:?}", x),
    }
    match read::header(&mut source(b"TAG\x03\x00\x00\x00\x00\x00\x00")) {
        Err(Error::NotFound(_)) => (),
        x => panic!("expected not found, got {:?}", x),
    }
}

#[test]
fn extended_header_v24_test() {
    let h = read::header(&mut source(&from_hex("4944330400400000000a000000055a"))).unwrap();
    let ext = h.extended_header.as_ref().unwrap();
    assert_eq!(ext.size, 1);
    assert_eq!(ext.data, vec![0x5a]);
    assert!(h.has_extended_header());
    assert_eq!(read::body_range(&h), (15, 5));
}

#[test]
fn extended_header_v23_test() {
    let h = read::header(&mut source(&from_hex("4944330300400000000a00000006000056789abc"))).unwrap();
    let ext = h.extended_header.as_ref().unwrap();
    assert_eq!(ext.size, 6);
    assert_eq!(ext.data, from_hex("000056789abc"));
    assert_eq!(ext.crc32(), None);

    let data = from_hex("494433030040000000140000000a800000000000abcdef01");
    let h = read::header(&mut source(&data)).unwrap();
    assert_eq!(h.extended_header.unwrap().crc32(), Some(0xabcdef01));
}

#[test]
fn bogus_extended_header_test() {
    // the "size" is a frame id
    let h = read::header(&mut source(&from_hex("4944330400400000001454495431"))).unwrap();
    let ext = h.extended_header.as_ref().unwrap();
    assert_eq!(ext.size, 0);
    assert!(ext.data.is_empty());
    assert!(!h.has_extended_header());
    assert_eq!(read::body_range(&h).0, 10);

    // not a known id: read as a size, and far too big
    match read::header(&mut source(&from_hex("4944330400400000001454495439"))) {
        Err(Error::UnexpectedEndOfData { .. }) => (),
        x => panic!("expected end of data, got {:?}", x),
    }
}

#[test]
fn issue_21_test() {
    let tag = load("issue_21.id3");
    assert_eq!(tag.flags() & structure::FLAG_EXTENDED, 0);
    assert!(!tag.header().unwrap().has_extended_header());
    assert!(tag.contains("TIT2"));
    assert!(tag.contains("TALB"));
    assert_eq!(tag.scalar("TIT2").unwrap(), "Punk To Funk");
}

#[test]
fn short_frame_data_test() {
    assert!(read_all(Version::V24, 0, b"012345678").is_empty());
    assert!(read_all(Version::V23, 0, b"012345678").is_empty());
    assert!(read_all(Version::V22, 0, b"01234").is_empty());
    // zero-sized frames are skipped
    assert!(read_all(Version::V22, 0, &from_hex("545431000000")).is_empty());
}

#[test]
fn unknown_frame_test() {
    let data = from_hex("58595a00000100");
    assert_eq!(
        read_all(Version::V22, 0, &data),
        vec![ReadFrame::Unknown(data.clone())]
    );

    let data = from_hex("5858585800000003000061626300000000");
    assert_eq!(
        read_all(Version::V23, 0, &data),
        vec![ReadFrame::Unknown(data[..13].to_vec())]
    );
}

#[test]
fn invalid_frame_id_test() {
    // lowercase ids are neither decoded nor kept
    let data = from_hex("7469743200000002000000615449543200000002000000620000");
    let frames = read_all(Version::V23, 0, &data);
    assert_eq!(frames.len(), 1);
    match &frames[0] {
        ReadFrame::Known(f) => assert_eq!(f.text(), vec!["b"]),
        x => panic!("expected TIT2, got {:?}", x),
    }
}

#[test]
fn v22_direct_ints_test() {
    // v2.2 sizes are plain ints: 0x83 would be 3 as a sync-safe int
    let mut data = from_hex("54543100008300");
    for _ in 0..15 {
        data.extend_from_slice(b"123456789abcdef");
    }
    let frames = read_all(Version::V22, 0, &data);
    assert_eq!(frames.len(), 1);
    match &frames[0] {
        ReadFrame::Known(f) => {
            assert_eq!(f.id(), "TT1");
            assert_eq!(f.text(), vec![String::from_utf8(data[7..7 + 0x82].to_vec()).unwrap()]);
        }
        x => panic!("expected TT1, got {:?}", x),
    }
}

#[test]
fn frame_past_end_test() {
    // the second frame claims more bytes than are left
    let data = from_hex("54495432000000020000006154504531000000ff000000");
    let frames = read_all(Version::V23, 0, &data);
    assert_eq!(frames.len(), 1);
}

#[test]
fn bad_frame_is_dropped_test() {
    // an unknown encoding byte in the first frame does not stop the second
    let data = from_hex("544954320000000200000961544954310000000200000062");
    let frames = read_all(Version::V23, 0, &data);
    assert_eq!(frames.len(), 1);
    match &frames[0] {
        ReadFrame::Known(f) => assert_eq!(f.id(), "TIT1"),
        x => panic!("expected TIT1, got {:?}", x),
    }
}

#[test]
fn badsync_test() {
    let tit2 = lookup(Version::V24, "TIT2").unwrap();
    let data = from_hex("00ff00616200");

    let f = load_frame(tit2, Version::V24, 0, structure::FLAG24_UNSYNCH, &data).unwrap();
    assert_eq!(f.to_string(), "\u{ff}ab");

    let f = load_frame(tit2, Version::V24, structure::FLAG_UNSYNCH, 0, &data).unwrap();
    assert_eq!(f.to_string(), "\u{ff}ab");

    let f = load_frame(tit2, Version::V24, 0, 0, &data).unwrap();
    assert_eq!(f.text(), vec!["\u{ff}", "ab"]);

    match load_frame(tit2, Version::V24, 0, structure::FLAG24_UNSYNCH, &from_hex("00ffe0")) {
        Err(Error::SyncError(_)) => (),
        x => panic!("expected a sync error, got {:?}", x),
    }
}

#[test]
fn compressed_frames_test() {
    let f = tpe1(Version::V24, 0x09, "0000000f789c6328c9c82c5600a244fd92d4e21200267f0525").unwrap();
    assert_eq!(f.encoding(), Some(TextEncoding::Latin1));
    assert_eq!(f.text(), vec!["this is a/test"]);

    let f = tpe1(Version::V24, 0x01, "0000000600412074657374").unwrap();
    assert_eq!(f.encoding(), Some(TextEncoding::Latin1));
    assert_eq!(f.text(), vec!["A test"]);

    let f = tpe1(Version::V23, 0x00, "037468697320697320612074657374").unwrap();
    assert_eq!(f.encoding(), Some(TextEncoding::Utf8));
    assert_eq!(f.text(), vec!["this is a test"]);

    let utf16 = "0000001f789c63fcffaf8421832193a19841014a2632e8339430a402d9250c0087c60723";
    for (version, flags) in &[(Version::V23, 0x80), (Version::V24, 0x08)] {
        let f = tpe1(*version, *flags, utf16).unwrap();
        assert_eq!(f.encoding(), Some(TextEncoding::Utf16));
        assert_eq!(f.text(), vec!["this is a/test"]);
    }
}

#[test]
fn compressed_without_data_length_test() {
    // the compression flag alone, and no data length in front of the zlib data
    let f = tpe1(Version::V24, 0x08, "789c6328c9c82c5600a244fd92d4e21200267f0525").unwrap();
    assert_eq!(f.text(), vec!["this is a/test"]);

    match tpe1(Version::V24, 0x08, "00000004deadbeef") {
        Err(Error::Decompression(_)) => (),
        x => panic!("expected a decompression error, got {:?}", x),
    }
}

#[test]
fn encrypted_frame_test() {
    let data = from_hex("5450453100000004000400414243");
    assert_eq!(
        read_all(Version::V24, 0, &data),
        vec![ReadFrame::Unknown(data.clone())]
    );
    match tpe1(Version::V23, 0x40, "00414243") {
        Err(Error::Encrypted) => (),
        x => panic!("expected an encrypted frame, got {:?}", x),
    }
}

#[test]
fn repeated_relative_volume_test() {
    // ReplayGain writes one RVA2 per identification
    let data = from_hex(concat!(
        "525641320000000a0000747261636b0001000000",
        "525641320000000a0000616c62756d0002000000"
    ));
    let mut tag = Tag::new(Version::V24);
    for item in read_all(Version::V24, 0, &data) {
        match item {
            ReadFrame::Known(f) => tag.insert(f),
            x => panic!("expected RVA2, got {:?}", x),
        }
    }
    assert_eq!(tag.len(), 2);
    assert_eq!(tag.get("RVA2:track").unwrap().data().unwrap(), &[1, 0, 0, 0]);
    assert_eq!(tag.get("RVA2:album").unwrap().data().unwrap(), &[2, 0, 0, 0]);
}

#[test]
fn grouped_frame_test() {
    let f = tpe1(Version::V24, 0x40, "0100414243").unwrap();
    assert_eq!(f.text(), vec!["ABC"]);
    let f = tpe1(Version::V23, 0x20, "0100414243").unwrap();
    assert_eq!(f.text(), vec!["ABC"]);
}

#[test]
fn itunes_sizes_test() {
    let tag = load("id3v24-itunes-sizes.mp3");
    assert_eq!(tag.len(), 3);
    assert_eq!(tag.title().unwrap(), "a".repeat(200));
    assert_eq!(tag.album().unwrap(), "x");
    assert_eq!(tag.artist().unwrap(), "y");
}

#[test]
fn size_bits_test() {
    let data = from_hex("54495432000000020000006154504531000000020000006200000000000000000000");
    assert_eq!(read::size_bits(&data), 7);
}

#[test]
fn v23_read_test() {
    let tag = load("silence-44-s.mp3");
    assert_eq!(tag.version(), Version::V23);
    assert_eq!(tag.len(), 8);
    assert!(tag.unknown_frames().is_empty());

    assert_eq!(tag.scalar("TALB").unwrap(), "Quod Libet Test Data");
    assert_eq!(tag.scalar("TCON").unwrap(), "Silence");
    assert_eq!(tag.scalar("TIT1").unwrap(), "Silence");
    assert_eq!(tag.scalar("TIT2").unwrap(), "Silence");
    assert_eq!(tag.scalar("TLEN").unwrap(), 3000i64);
    assert_eq!(tag.get("TPE1").unwrap().text(), vec!["jzig", "piman"]);
    assert_eq!(tag.get("TRCK").unwrap().text(), vec!["02/10"]);
    assert_eq!(tag.scalar("TRCK").unwrap(), 2i64);
    assert_eq!(tag.scalar("TDRC").unwrap(), "2004");
    assert!(tag.get("TYER").is_none());

    assert_eq!(tag.album().unwrap(), "Quod Libet Test Data");
    assert_eq!(tag.title().unwrap(), "Silence");
    assert_eq!(tag.genres(), vec!["Silence"]);
    assert_eq!(tag.track(), Some((2, Some(10))));
    assert_eq!(tag.length(), Some(3000));
    assert_eq!(tag.date(), Some(TimeStamp::parse("2004")));
}

#[test]
fn v23_raw_ids_test() {
    let options = LoadOptions {
        canonicalization: Canonicalization::None,
        ..Default::default()
    };
    let tag = Tag::load(&mut open("silence-44-s.mp3"), &options).unwrap();
    assert_eq!(tag.len(), 8);
    assert!(tag.contains("TYER"));
    assert!(!tag.contains("TDRC"));
    assert_eq!(tag.date().unwrap().year, Some(2004));
}

#[test]
fn v22_read_test() {
    let tag = load("id3v22-png.mp3");
    assert_eq!(tag.version(), Version::V22);
    assert_eq!(tag.title().unwrap(), "example song");
    assert_eq!(tag.artist().unwrap(), "example artist");
    assert_eq!(tag.album().unwrap(), "example album");
    assert_eq!(tag.date().unwrap().year, Some(2017));
    assert_eq!(tag.track(), Some((3, Some(12))));
    assert_eq!(tag.genres(), vec!["Anime"]);
    assert_eq!(tag.comment().unwrap(), "a comment");
    assert!(tag.contains("COMM::eng"));

    let apic = tag.get("APIC:").unwrap();
    assert_eq!(apic.mime().unwrap(), "image/png");
    let cover = tag.front_cover().unwrap();
    assert_eq!(cover.mime(), "image/png");
    assert_eq!(cover.dimensions(), Some((2, 3, 8)));

    assert_eq!(tag.unknown_frames(), &[from_hex("58595a0000020001")][..]);
}

#[test]
fn v22_raw_ids_test() {
    let options = LoadOptions {
        canonicalization: Canonicalization::None,
        ..Default::default()
    };
    let tag = Tag::load(&mut open("id3v22-png.mp3"), &options).unwrap();
    assert!(tag.contains("TT2"));
    assert_eq!(tag.get("PIC:").unwrap().mime().unwrap(), "PNG");
    // the accessors fall back to v2.2 ids
    assert_eq!(tag.title().unwrap(), "example song");
    assert_eq!(tag.front_cover().unwrap().mime(), "image/png");

    let options = LoadOptions {
        canonicalization: Canonicalization::V23,
        ..Default::default()
    };
    let tag = Tag::load(&mut open("id3v22-png.mp3"), &options).unwrap();
    assert!(tag.contains("TYER"));
    assert!(tag.contains("TIT2"));
}

#[test]
fn v24_unsynch_read_test() {
    let tag = load("id3v24-unsynch.mp3");
    assert_eq!(tag.version(), Version::V24);
    let ext = tag.extended_header().unwrap();
    assert_eq!(ext.crc32(), Some(0x4103ecfb));
    assert!(!ext.is_update());
    assert_eq!(ext.restrictions(), None);

    assert_eq!(tag.title().unwrap(), "Unsynch Title");
    assert_eq!(tag.get("TIT2").unwrap().encoding(), Some(TextEncoding::Utf16));
    assert_eq!(tag.artist().unwrap(), "compressed artist");
    assert_eq!(tag.date().unwrap().to_string(), "2008-12-29");
    assert_eq!(tag.disc(), Some((3, Some(4))));
    assert_eq!(tag.bpm(), Some(96));
    assert_eq!(tag.get("TXXX:label").unwrap().text(), vec!["value"]);

    // the second comment with the same key replaced the first
    assert_eq!(tag.get_all("COMM").len(), 2);
    assert_eq!(tag.comment().unwrap(), "Replaced Comments");
    assert_eq!(tag.frames()[5].id(), "COMM");
    assert_eq!(tag.get("COMM:iTunNORM:eng").unwrap().text(), vec![" 00000001"]);

    assert_eq!(tag.unknown_frames(), &[from_hex("41424344000000030000726177")][..]);
}

#[test]
fn empty_file_test() {
    match Tag::load(&mut open("emptyfile.mp3"), &LoadOptions::default()) {
        Err(Error::NotFound(s)) => assert!(s.contains("too small")),
        x => panic!("expected not found, got {:?}", x),
    }
}

#[test]
fn truncated_body_test() {
    // the header promises 0x20 bytes of frames
    let data = from_hex("494433030000000000205449543200000002000000");
    match super::get(&mut source(&data)) {
        Err(Error::UnexpectedEndOfData { .. }) => (),
        x => panic!("expected end of data, got {:?}", x),
    }
}

#[test]
fn id3v1_fallback_test() {
    let tag = load("silence-44-s-v1.mp3");
    assert_eq!(tag.version(), Version::V11);
    assert_eq!(tag.title().unwrap(), "Silence");

    match super::get(&mut open("silence-44-s-v1.mp3")) {
        Err(Error::NotFound(_)) => (),
        x => panic!("expected not found, got {:?}", x),
    }
}

#[test]
fn fill_from_id3v1_test() {
    let mut data = from_hex("4944330300000000001054495432000000060000006f74686572");
    data.extend(std::fs::read("testfiles/silence-44-s-v1.mp3").unwrap());
    let options = LoadOptions {
        fill_from_id3v1: true,
        ..Default::default()
    };
    let tag = Tag::load(&mut source(&data), &options).unwrap();
    assert_eq!(tag.title().unwrap(), "other");
    assert_eq!(tag.artist().unwrap(), "piman");
    assert_eq!(tag.frames()[0].id(), "TIT2");

    let tag = Tag::load(&mut source(&data), &LoadOptions::default()).unwrap();
    assert_eq!(tag.len(), 1);
}

#[test]
fn insert_test() {
    let mut tag = Tag::new(Version::V24);
    tag.insert(FrameBuilder::for_id("TIT2").unwrap().text("first").build());
    tag.insert(FrameBuilder::for_id("TALB").unwrap().text("album").build());
    tag.insert(FrameBuilder::for_id("TIT2").unwrap().text("second").build());
    assert_eq!(tag.len(), 2);
    assert_eq!(tag.frames()[0].text(), vec!["second"]);
    assert_eq!(tag.frames()[1].id(), "TALB");

    tag.insert(FrameBuilder::for_id("TXXX").unwrap().description("a").text("1").build());
    tag.insert(FrameBuilder::for_id("TXXX").unwrap().description("b").text("2").build());
    assert_eq!(tag.len(), 4);
    assert_eq!(tag.get("TXXX:b").unwrap().text(), vec!["2"]);
}

fn built(id: &str, text: &str) -> Frame {
    FrameBuilder::for_id(id).unwrap().text(text).build()
}

#[test]
fn date_merge_test() {
    let frames = vec![
        built("TIT2", "t"),
        built("TYER", "2004"),
        built("TDAT", "0201"),
        built("TIME", "1030"),
    ];
    let merged = canonicalize(frames, Canonicalization::V24);
    let ids: Vec<&str> = merged.iter().map(|f| f.id()).collect();
    assert_eq!(ids, vec!["TIT2", "TDRC"]);
    assert_eq!(merged[1].to_string(), "2004-01-02T10:30");

    // an existing TDRC is never overwritten
    let frames = vec![built("TDRC", "1999"), built("TYER", "2004")];
    let merged = canonicalize(frames, Canonicalization::V24);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].to_string(), "1999");

    let frames = vec![built("TYER", "2004")];
    assert_eq!(canonicalize(frames, Canonicalization::V23)[0].id(), "TYER");
}

#[test]
fn rename_test() {
    let frames = vec![built("TORY", "1970"), built("IPLS", "a")];
    let renamed = canonicalize(frames, Canonicalization::V24);
    assert_eq!(renamed[0].id(), "TDOR");
    assert_eq!(renamed[0].timestamps(), vec![TimeStamp::parse("1970")]);
    assert_eq!(renamed[1].id(), "TIPL");

    static TABLE: &[(&str, &str)] = &[("TIT1", "GRP1")];
    let renamed = canonicalize(vec![built("TIT1", "g")], Canonicalization::Custom(TABLE));
    assert_eq!(renamed[0].id(), "GRP1");
    assert_eq!(renamed[0].text(), vec!["g"]);
}

#[test]
fn scalar_test() {
    let mut tag = Tag::new(Version::V24);
    tag.insert(built("TBPM", "fast"));
    tag.insert(built("TRCK", "4/9"));
    tag.insert(built("TIT2", "12"));

    let bpm = tag.scalar("TBPM").unwrap();
    assert_eq!(bpm, "fast");
    assert!(bpm != 120i64);
    assert!(bpm.as_number().is_err());
    assert_eq!(tag.bpm(), None);

    let track = tag.scalar("TRCK").unwrap();
    assert_eq!(track, 4i64);
    assert_eq!(track, "4/9");
    assert_eq!(track.to_string(), "4/9");

    assert_eq!(tag.scalar("TIT2").unwrap(), 12i64);
    assert!(tag.scalar("TALB").is_none());
}
