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
// - source.rs file -

use crate::error::ResolveError;

use std::path::{Path, PathBuf};
use url::Url;

/// A hosted video's landing page, e.g. `https://www.file-up.org/5ggryv3orudj`.
#[derive(Debug, Clone)]
pub struct SourceUrl {
    pub url: Url,
    /// The URL path without surrounding slashes. Hosters use it as the
    /// file key; we use it as the output file name.
    pub code: String,
}

impl SourceUrl {
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let url = Url::parse(input).map_err(|source| ResolveError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        let code = url.path().trim_matches('/').to_string();
        Ok(SourceUrl { url, code })
    }

    // Another page on the same scheme://host[:port].
    pub fn sibling(&self, path: &str) -> Result<Url, ResolveError> {
        self.url
            .join(path)
            .map_err(|source| ResolveError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }

    pub fn target_file(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.mp4", self.code))
    }
}
