use crate::{
    cli::{Config, Host, actions::Action, commands},
    s3::{Credentials, S3, checksum::ChecksumAlgorithm},
    stream::{ObjectOptions, StreamOptions},
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use secrecy::SecretString;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub fn get_config_path() -> PathBuf {
    let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));

    Path::new(&home_dir).join(".config").join("s3stream")
}

/// Parse the command line, initialize logging and build the client and the
/// action to run
///
/// # Errors
///
/// Will return an error if the config file or the arguments are not valid
pub fn start() -> Result<(S3, Action)> {
    let config_path = get_config_path();

    let matches = commands::new(&config_path).get_matches();

    let verbosity_level = match matches.get_one::<u8>("verbose").copied().unwrap_or(0) {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(verbosity_level)
        .init();

    parse(&matches, &config_path.join("config.yml"))
}

// default_config is only read when it exists
pub(crate) fn parse(matches: &ArgMatches, default_config: &Path) -> Result<(S3, Action)> {
    let host = get_host(matches, default_config)?;

    log::debug!(
        "endpoint: {:?}, region: {:?}, bucket: {:?}, ssl: {}",
        host.endpoint,
        host.region,
        host.bucket,
        host.ssl
    );

    let region = host.get_region()?;

    let bucket = host.bucket.clone().filter(|b| !b.is_empty()).ok_or_else(|| {
        anyhow!(
            "No \"bucket\" found, use --bucket or set it in the config file, For more information try {}",
            "--help".green()
        )
    })?;

    let credentials = Credentials::new(
        &host.access_key,
        &SecretString::from(host.secret_key.clone()),
    );

    let s3 = S3::new(&credentials, &region, Some(bucket), host.ssl)
        .with_no_sign_request(matches.get_flag("no-sign-request"));

    log::debug!("S3:\n{s3}");

    let action = new_action(matches)?;

    log::debug!("action: {action:#?}");

    Ok((s3, action))
}

// config file entry first, flags and env vars override it
fn get_host(matches: &ArgMatches, default_config: &Path) -> Result<Host> {
    let config_file = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .or_else(|| default_config.is_file().then(|| default_config.to_path_buf()));

    let host_name = matches.get_one::<String>("host").map(String::as_str);

    let mut host = match config_file {
        Some(path) => {
            log::info!("config file: {}", path.display());

            Config::new(&path)?.take_host(host_name).with_context(|| {
                format!("Check config file {}", path.display())
            })?
        }
        None if host_name.is_some() => {
            return Err(anyhow!(
                "--host requires a config file, none found at {}",
                default_config.display()
            ));
        }
        None => Host::default(),
    };

    let arg = |name: &str| matches.get_one::<String>(name).cloned();

    if let Some(endpoint) = arg("endpoint") {
        host.endpoint = Some(endpoint);
    }

    if let Some(region) = arg("region") {
        host.region = Some(region);
    }

    if let Some(bucket) = arg("bucket") {
        host.bucket = Some(bucket);
    }

    if let Some(access_key) = arg("access-key") {
        host.access_key = access_key;
    }

    if let Some(secret_key) = arg("secret-key") {
        host.secret_key = secret_key;
    }

    if matches.get_flag("ssl") {
        host.ssl = true;
    }

    host.normalize_endpoint();

    Ok(host)
}

fn new_action(matches: &ArgMatches) -> Result<Action> {
    let key = matches
        .get_one::<String>("key")
        .cloned()
        .filter(|k| !k.is_empty())
        .context("object key missing")?;

    let arg = |name: &str| matches.get_one::<String>(name).cloned();

    let meta = arg("meta").map(|m| parse_meta(&m)).unwrap_or_default();

    let create_bucket = matches.get_flag("create-bucket");

    if let Some(file) = matches.get_one::<PathBuf>("file") {
        return Ok(Action::Put {
            key,
            file: file.clone(),
            content_type: arg("content-type"),
            acl: arg("acl"),
            meta,
            create_bucket,
        });
    }

    let additional_checksum = arg("checksum")
        .map(|c| c.parse::<ChecksumAlgorithm>())
        .transpose()?;

    let options = StreamOptions {
        object: ObjectOptions {
            acl: arg("acl"),
            content_type: arg("content-type"),
            meta,
            additional_checksum,
        },
        abort_on_failure: matches.get_flag("abort-on-failure"),
        ..StreamOptions::default()
    };

    Ok(Action::Stream {
        key,
        size: matches.get_one::<u64>("size").copied().into(),
        options,
        create_bucket,
    })
}

/// "k1=v1;k2=v2" to `x-amz-meta-k1: v1`, `x-amz-meta-k2: v2`
pub fn parse_meta(meta: &str) -> BTreeMap<String, String> {
    meta.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| {
            (
                format!("x-amz-meta-{}", k.trim().to_lowercase()),
                v.trim().to_string(),
            )
        })
        .collect()
}
