use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn validator_key_value() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<String, String> {
        for pair in s.split(';') {
            match pair.split_once('=') {
                Some((key, _)) if !key.trim().is_empty() => (),
                _ => return Err(String::from("metadata format is key1=value1;key2=value2")),
            }
        }
        Ok(s.to_string())
    })
}

pub fn validator_is_file() -> ValueParser {
    ValueParser::from(move |s: &str| -> std::result::Result<PathBuf, String> {
        if let Ok(metadata) = fs::metadata(s) {
            if metadata.is_file() {
                return Ok(PathBuf::from(s));
            }
        }

        Err(format!("Invalid file path or file does not exist: '{s}'"))
    })
}

pub fn new(config_path: &Path) -> Command {
    // default: ~/.config/s3stream/config.yml
    let config_file_path = config_path.join("config.yml");

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("s3stream")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stream STDIN to S3 as a multipart upload")
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("key")
            .help("Object key")
            .required(true)
            .num_args(1)
        )
        .arg(
            Arg::new("config")
            .help(format!("YAML file with the hosts, used when present [default: {}]", config_file_path.display()))
            .long("config")
            .short('c')
            .value_parser(validator_is_file())
            .value_name("config.yml")
            .num_args(1)
        )
        .arg(
            Arg::new("host")
            .help("Host entry of the config file, optional when it has only one")
            .long("host")
            .num_args(1)
        )
        .arg(
            Arg::new("bucket")
            .help("Bucket name")
            .long("bucket")
            .short('B')
            .num_args(1)
        )
        .arg(
            Arg::new("endpoint")
            .help("S3 compatible endpoint host[:port], an http:// or https:// prefix is accepted")
            .long("endpoint")
            .env("S3_ADDRESS")
            .num_args(1)
        )
        .arg(
            Arg::new("access-key")
            .long("access-key")
            .env("ACCESS_KEY")
            .num_args(1)
        )
        .arg(
            Arg::new("secret-key")
            .long("secret-key")
            .env("SECRET_KEY")
            .hide_env_values(true)
            .num_args(1)
        )
        .arg(
            Arg::new("ssl")
            .help("Use https")
            .long("ssl")
            .env("SSL")
            .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("region")
            .help("AWS region, or the signing region of a custom endpoint")
            .long("region")
            .num_args(1)
        )
        .arg(
            Arg::new("size")
            .help("Size in bytes of the STDIN stream when known, the upload fails if it ends earlier")
            .long("size")
            .short('s')
            .value_parser(clap::value_parser!(u64).range(1..))
            .conflicts_with("file")
            .num_args(1)
        )
        .arg(
            Arg::new("file")
            .help("Upload a file with a single PutObject request instead of reading STDIN")
            .long("file")
            .short('f')
            .value_parser(validator_is_file())
            .num_args(1)
        )
        .arg(
            Arg::new("content-type")
            .long("content-type")
            .num_args(1)
        )
        .arg(
            Arg::new("meta")
            .long("meta")
            .short('m')
            .help("User-defined object metadata \"x-amz-meta-*\", example: \"key1=value1;key2=value2\"")
            .value_parser(validator_key_value())
            .num_args(1)
        )
        .arg(
            Arg::new("acl")
            .help("The canned ACL to apply to the object")
            .long("acl")
            .short('a')
            .value_parser([
                "private",
                "public-read",
                "public-read-write",
                "authenticated-read",
                "aws-exec-read",
                "bucket-owner-read",
                "bucket-owner-full-control",
            ])
            .num_args(1)
        )
        .arg(
            Arg::new("checksum")
            .help("Additional checksums algorithms")
            .long("checksum")
            .value_parser([
                "crc32",
                "crc32c",
                "sha1",
                "sha256",
            ])
            .value_name("algorithm")
            .num_args(1)
        )
        .arg(
            Arg::new("abort-on-failure")
            .help("Abort the multipart upload when it fails, otherwise the uploaded parts are kept")
            .long("abort-on-failure")
            .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("create-bucket")
            .help("Create the bucket if it does not exist")
            .long("create-bucket")
            .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("no-sign-request")
            .help("Make requests as anonymous user (no credentials used)")
            .long("no-sign-request")
            .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("verbose")
            .help("Verbosity level")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
        )
}
