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
// - error.rs file -

use std::io;
use thiserror::Error;

// Everything that can stop a single URL from being processed.
// The messages are what the user gets to read, so keep them short.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Cannot handle {0} as of now.")]
    Unsupported(String),

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GET {url} failed: {status}")]
    Fetch { url: String, status: String },

    #[error("No {element} in {url}")]
    MissingElement { element: &'static str, url: String },

    #[error("Form not found on {0}")]
    FormNotFound(String),

    #[error("Malformed player code in {url}: {reason}")]
    MalformedPlayerCode { url: String, reason: &'static str },

    #[error("Failed to parse player code: {link}: {tokens:?}")]
    PlayerCode { link: String, tokens: Vec<String> },

    #[error("Failed to retrieve video at {link}: {status}")]
    Retrieve { link: String, status: String },

    #[error("Incorrect size downloaded. Expected: {expected} Received: {received}")]
    SizeMismatch { expected: u64, received: u64 },

    #[error("Failed to retrieve content at {0}")]
    Content(String),

    #[error("Unable to submit form at {0}")]
    FormSubmit(String),

    #[error("Could not set up the HTTP agent: {0}")]
    Agent(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

// Short description of a failed request: the status code if the
// server answered, the transport problem otherwise.
pub fn describe(err: &ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, _) => code.to_string(),
        ureq::Error::Transport(transport) => transport.to_string(),
    }
}
