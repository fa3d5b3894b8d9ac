use crate::s3::checksum::{ChecksumAlgorithm, HashSums};
use bytes::BytesMut;
use futures::stream::TryStreamExt;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::{BytesCodec, FramedRead};

// read size of every chunk fed to the hashers
const READ_BUFFER_SIZE: usize = 1024 * 256;

/// Result of copying one part
#[derive(Debug)]
pub struct Copied {
    pub size: u64,
    /// the source ended before `limit` bytes were read
    pub eof: bool,
    pub sums: HashSums,
}

/// Copy up to `limit` bytes from `reader` into `buffer`, updating a fresh
/// hasher for every algorithm with the same bytes in a single pass.
///
/// Reaching the end of the source is not an error, it is reported through
/// `Copied::eof` together with the bytes read so far.
///
/// # Errors
///
/// Will return `Err` on any read fault, no digests are returned in that case
pub async fn hash_copy_n<R>(
    algorithms: &[ChecksumAlgorithm],
    reader: &mut R,
    buffer: &mut BytesMut,
    limit: u64,
) -> io::Result<Copied>
where
    R: AsyncRead + Unpin,
{
    let mut hashers: Vec<_> = algorithms
        .iter()
        .map(|algorithm| (*algorithm, algorithm.hasher()))
        .collect();

    let mut stream = FramedRead::with_capacity(
        reader.take(limit),
        BytesCodec::new(),
        READ_BUFFER_SIZE,
    );

    let mut size: u64 = 0;

    while let Some(bytes) = stream.try_next().await? {
        for (_, hasher) in &mut hashers {
            hasher.update(&bytes);
        }

        size += bytes.len() as u64;

        buffer.extend_from_slice(&bytes);
    }

    let sums = hashers
        .into_iter()
        .map(|(algorithm, hasher)| (algorithm, hasher.finalize()))
        .collect();

    Ok(Copied {
        size,
        eof: size < limit,
        sums,
    })
}
