use std::fs::File;
use std::path::Path;

use crate::id3v2::{LoadOptions, Tag};
use crate::source::Source;
use crate::Error;

/// Reads the tag of the file at `path`, falling back on ID3v1 when there is
/// no ID3v2 tag.
pub fn get_tag<P: AsRef<Path>>(path: P) -> Result<Tag, Error> {
    get_tag_with(path, &LoadOptions::default())
}

pub fn get_tag_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Tag, Error> {
    let file = File::open(path.as_ref())?;
    let mut source = Source::new(file)?;
    Tag::load(&mut source, options)
}
