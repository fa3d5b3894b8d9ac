use crate::stream::{ObjectSize, StreamOptions};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Debug)]
pub enum Action {
    /// Multipart upload from STDIN
    Stream {
        key: String,
        size: ObjectSize,
        options: StreamOptions,
        create_bucket: bool,
    },
    /// Single request upload of a file
    Put {
        key: String,
        file: PathBuf,
        content_type: Option<String>,
        acl: Option<String>,
        meta: BTreeMap<String, String>,
        create_bucket: bool,
    },
}
