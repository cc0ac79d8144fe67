/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// hostgrab - file hosting page downloader
// - download.rs file -

use crate::error::{describe, ResolveError};

use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs,
    io::{self, copy, Read},
    path::Path,
};
use tracing::{debug, info};
use ureq::Agent;

const UNITS: [&str; 8] = ["B", "K", "M", "G", "T", "P", "E", "Z"];

/// Human readable size with binary prefixes, e.g. `1536` -> `"1.5 K"`.
pub fn humanize(size: Option<u128>) -> String {
    let Some(size) = size else {
        return "Not Avbl".to_string();
    };

    let mut size = size as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} Yi", size)
}

struct DownloadProgress<'a, R> {
    inner: R,
    progress_bar: &'a ProgressBar,
}

impl<R: Read> Read for DownloadProgress<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map(|n| {
            self.progress_bar.inc(n as u64);
            n
        })
    }
}

fn content_length(resp: &ureq::Response) -> Option<u64> {
    resp.header("Content-Length")?.trim().parse().ok()
}

// Compares what landed on disk with what the server promised.
// The file stays where it is either way.
pub fn verify_size(file: &Path, expected: u64) -> Result<(), ResolveError> {
    let received = fs::metadata(file)?.len();
    if received != expected {
        return Err(ResolveError::SizeMismatch { expected, received });
    }
    Ok(())
}

/// Streams `link` into `target` and checks the result against the
/// announced content length. `tokens` only ends up in the error message
/// if the link cannot be reached at all.
pub fn download(
    agent: &Agent,
    link: &str,
    target: &Path,
    tokens: &[String],
) -> Result<u64, ResolveError> {
    // Find the video size first:
    let head = agent.head(link).call();
    let announced = match head {
        Ok(resp) => content_length(&resp),
        Err(ureq::Error::Status(code, _)) => {
            debug!("HEAD {} answered {}", link, code);
            None
        }
        Err(ureq::Error::Transport(_)) => {
            return Err(ResolveError::PlayerCode {
                link: link.to_string(),
                tokens: tokens.to_vec(),
            })
        }
    };

    let resp = agent
        .get(link)
        .call()
        .map_err(|e| ResolveError::Retrieve {
            link: link.to_string(),
            status: describe(&e),
        })?;
    if resp.status() != 200 {
        return Err(ResolveError::Retrieve {
            link: link.to_string(),
            status: resp.status().to_string(),
        });
    }

    let expected = announced.or_else(|| content_length(&resp));
    info!(
        "{} -> {} ({})",
        link,
        target.display(),
        humanize(expected.map(u128::from))
    );

    // Display a progress bar:
    let pb = ProgressBar::new(expected.unwrap_or(0));
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {bytes}/{total_bytes} {percent}%",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut source = DownloadProgress {
        progress_bar: &pb,
        inner: resp.into_reader(),
    };
    let mut dest = fs::File::create(target)?;
    let written = copy(&mut source, &mut dest)?;
    dest.sync_all()?;
    drop(dest);

    pb.finish_and_clear();

    match expected {
        Some(expected) => verify_size(target, expected)?,
        None => debug!("No content length for {}, size not checked", link),
    }

    Ok(written)
}

// Writes a payload the hoster sent in one piece.
pub fn save(target: &Path, payload: &[u8]) -> Result<(), ResolveError> {
    fs::write(target, payload)?;
    info!("Wrote {} ({})", target.display(), humanize(Some(payload.len() as u128)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{GET, HEAD};
    use httpmock::MockServer;

    #[test]
    fn humanize_sizes() {
        assert_eq!(humanize(Some(0)), "0.0 B");
        assert_eq!(humanize(Some(1023)), "1023.0 B");
        assert_eq!(humanize(Some(1024)), "1.0 K");
        assert_eq!(humanize(Some(1536)), "1.5 K");
        assert_eq!(humanize(Some(5 * 1024 * 1024)), "5.0 M");
        assert_eq!(humanize(None), "Not Avbl");
    }

    #[test]
    fn humanize_falls_back_to_yi() {
        assert_eq!(humanize(Some(u64::MAX.into())), "16.0 E");
        assert_eq!(humanize(Some(1024u128.pow(7))), "1.0 Z");
        assert_eq!(humanize(Some(3 * 1024u128.pow(8))), "3.0 Yi");
        assert_eq!(humanize(Some(u128::MAX)), "281474976710656.0 Yi");
    }

    #[test]
    fn size_mismatch_is_reported_after_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abc.mp4");
        fs::write(&file, b"abc").unwrap();

        let err = verify_size(&file, 10).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::SizeMismatch {
                expected: 10,
                received: 3
            }
        ));
        assert!(file.exists());
        assert!(verify_size(&file, 3).is_ok());
    }

    #[test]
    fn streams_to_disk_with_announced_length() {
        let server = MockServer::start();
        let body = vec![7u8; 4096];
        let head = server.mock(|when, then| {
            when.method(HEAD).path("/d/secret/video.mp4");
            then.status(200).header("Content-Length", "4096");
        });
        let get = server.mock(|when, then| {
            when.method(GET).path("/d/secret/video.mp4");
            then.status(200).body(body.clone());
        });

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("abc.mp4");
        let agent = ureq::agent();
        let written = download(&agent, &server.url("/d/secret/video.mp4"), &target, &[]).unwrap();

        head.assert();
        get.assert();
        assert_eq!(written, 4096);
        assert_eq!(fs::read(&target).unwrap(), body);
    }

    #[test]
    fn short_stream_is_a_size_mismatch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/d/secret/video.mp4");
            then.status(200).header("Content-Length", "10");
        });
        server.mock(|when, then| {
            when.method(GET).path("/d/secret/video.mp4");
            then.status(200).body("abc");
        });

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("abc.mp4");
        let link = server.url("/d/secret/video.mp4");
        let err = download(&ureq::agent(), &link, &target, &[]).unwrap_err();

        assert!(matches!(
            err,
            ResolveError::SizeMismatch {
                expected: 10,
                received: 3
            }
        ));
        assert!(target.exists());
        assert_eq!(fs::read(&target).unwrap(), b"abc");
    }

    #[test]
    fn failed_stream_names_the_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/video.mp4");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path("/video.mp4");
            then.status(403);
        });

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("abc.mp4");
        let link = server.url("/video.mp4");
        let err = download(&ureq::agent(), &link, &target, &[]).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("Failed to retrieve video at {}: 403", link)
        );
        assert!(!target.exists());
    }

    #[test]
    fn unreachable_link_reports_the_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("abc.mp4");
        let tokens = vec!["https".to_string(), "f12".to_string()];
        let err = download(&ureq::agent(), "://f12.invalid/video.mp4", &target, &tokens)
            .unwrap_err();

        assert!(matches!(err, ResolveError::PlayerCode { .. }));
        assert!(err.to_string().contains("\"f12\""));
    }

    #[test]
    fn payloads_are_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("abc.mp4");
        save(&target, b"not really a video").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"not really a video");
    }
}
