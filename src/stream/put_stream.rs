use crate::{
    s3::{
        actions::Part,
        checksum::{Checksum, ChecksumAlgorithm},
    },
    stream::{
        MultipartClient, ObjectSize, PartPlan, StreamError, StreamFailure, StreamOptions,
        StreamOutput, hash_copy::hash_copy_n, planner::optimal_part_info,
    },
};
use bytes::BytesMut;
use bytesize::ByteSize;
use std::collections::BTreeMap;
use tokio::io::AsyncRead;

/// Upload `reader` to `key` as a multipart upload, one part at a time.
///
/// With `ObjectSize::Unknown` the upload ends when the reader is exhausted,
/// with a known size the uploaded bytes must match it exactly.
///
/// On failure the bytes already accepted by the store are reported in
/// `StreamFailure::uploaded`. Parts are never retried.
///
/// # Errors
///
/// Will return `Err` if the size can not be planned, the upload can not be
/// initiated, reading or uploading a part fails, the stream ends early, or the
/// store rejects the completion
pub async fn put_stream<C, R>(
    client: &C,
    key: &str,
    reader: &mut R,
    size: ObjectSize,
    options: &StreamOptions,
) -> Result<StreamOutput, StreamFailure>
where
    C: MultipartClient,
    R: AsyncRead + Unpin,
{
    let upload_id = client
        .create_multipart_upload(key, &options.object)
        .await
        .map_err(|e| StreamFailure::new(0, StreamError::Initiate(e)))?;

    log::info!("upload id: {upload_id}");

    let session = Session {
        client,
        key,
        upload_id: &upload_id,
        parts: BTreeMap::new(),
        uploaded: 0,
    };

    let result = match optimal_part_info(size, &options.limits) {
        Ok(plan) => {
            log::debug!(
                "plan for {key}: {} parts of {}, last part {}",
                plan.total_parts,
                ByteSize(plan.part_size),
                ByteSize(plan.last_part_size)
            );

            session.run(reader, size, &plan, options).await
        }
        Err(e) => Err(StreamFailure::new(0, e)),
    };

    match result {
        Ok(output) => Ok(output),
        Err(failure) => {
            log::error!("upload {upload_id} of {key} failed: {failure}");

            if options.abort_on_failure {
                match client.abort_multipart_upload(key, &upload_id).await {
                    Ok(()) => log::info!("aborted upload id: {upload_id}"),
                    Err(e) => log::warn!("could not abort upload id {upload_id}: {e:#}"),
                }
            }

            Err(failure)
        }
    }
}

// state of an initiated multipart upload
struct Session<'a, C> {
    client: &'a C,
    key: &'a str,
    upload_id: &'a str,
    parts: BTreeMap<u16, Part>,
    // bytes accepted by the store
    uploaded: u64,
}

impl<C: MultipartClient> Session<'_, C> {
    fn fail(&self, error: StreamError) -> StreamFailure {
        StreamFailure::new(self.uploaded, error)
    }

    async fn run<R>(
        mut self,
        reader: &mut R,
        size: ObjectSize,
        plan: &PartPlan,
        options: &StreamOptions,
    ) -> Result<StreamOutput, StreamFailure>
    where
        R: AsyncRead + Unpin,
    {
        let algorithms = algorithms(
            self.client.sign_payload(),
            options.object.additional_checksum,
        );

        // reused for every part, never holds more than one part
        let mut buffer = BytesMut::new();

        for part_number in 1..=plan.total_parts {
            let limit = match size {
                ObjectSize::Known(_) if part_number == plan.total_parts => plan.last_part_size,
                _ => plan.part_size,
            };

            let copied = match hash_copy_n(&algorithms, reader, &mut buffer, limit).await {
                Ok(copied) => copied,
                Err(source) => {
                    buffer.clear();
                    return Err(self.fail(StreamError::Read {
                        part_number,
                        source,
                    }));
                }
            };

            // the previous part ended exactly at the end of the stream
            if copied.size == 0 && part_number > 1 {
                log::debug!("stream ended after part {}", part_number - 1);
                break;
            }

            let checksum = options
                .object
                .additional_checksum
                .and_then(|algorithm| Checksum::from_sums(algorithm, &copied.sums));

            let body = buffer.split().freeze();

            let etag = self
                .client
                .upload_part(
                    self.key,
                    self.upload_id,
                    part_number,
                    body,
                    &copied.sums,
                    checksum.as_ref(),
                )
                .await
                .map_err(|source| {
                    self.fail(StreamError::UploadPart {
                        part_number,
                        source,
                    })
                })?;

            log::info!(
                "uploaded part: {part_number}, etag: {etag}, size: {}",
                ByteSize(copied.size)
            );

            self.parts.insert(
                part_number,
                Part {
                    etag,
                    number: part_number,
                    size: copied.size,
                    checksum,
                },
            );

            self.uploaded += copied.size;

            if copied.eof {
                log::debug!("end of stream after part {part_number}");
                break;
            }
        }

        if let ObjectSize::Known(expected) = size {
            if self.uploaded != expected {
                return Err(self.fail(StreamError::UnexpectedEof {
                    expected,
                    uploaded: self.uploaded,
                }));
            }
        }

        self.finalize().await
    }

    async fn finalize(self) -> Result<StreamOutput, StreamFailure> {
        let total = u16::try_from(self.parts.len()).unwrap_or(u16::MAX);

        // part numbers must be 1..=total without gaps
        if let Some(missing) = (1..=total).find(|number| !self.parts.contains_key(number)) {
            return Err(self.fail(StreamError::MissingPart(missing)));
        }

        let etag = self
            .client
            .complete_multipart_upload(self.key, self.upload_id, &self.parts)
            .await
            .map_err(|e| self.fail(StreamError::Complete(e)))?;

        log::info!(
            "completed upload id: {}, parts: {total}, size: {}",
            self.upload_id,
            ByteSize(self.uploaded)
        );

        Ok(StreamOutput {
            upload_id: self.upload_id.to_string(),
            etag,
            uploaded: self.uploaded,
            parts: total,
        })
    }
}

// MD5 always, SHA-256 only for signed payloads, plus the additional checksum
fn algorithms(sign_payload: bool, additional: Option<ChecksumAlgorithm>) -> Vec<ChecksumAlgorithm> {
    let mut algorithms = vec![ChecksumAlgorithm::Md5];

    if sign_payload {
        algorithms.push(ChecksumAlgorithm::Sha256);
    }

    if let Some(additional) = additional {
        if !algorithms.contains(&additional) {
            algorithms.push(additional);
        }
    }

    algorithms
}
