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
// - site handlers -

use crate::error::{describe, ResolveError};

use scraper::Selector;
use tracing::debug;
use ureq::{Agent, Response};

pub mod file_up;
pub mod flash_files;
pub mod indishare;

// Only used with the constant selectors below, which are known to parse.
fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("constant CSS selector")
}

// GET <url>, turning anything but a 2xx/3xx answer into a fetch error.
fn fetch(agent: &Agent, url: &str) -> Result<Response, ResolveError> {
    debug!("Requesting {}", url);
    let resp = agent.get(url).call().map_err(|e| ResolveError::Fetch {
        url: url.to_string(),
        status: describe(&e),
    })?;
    debug!("Retrieved {} ({})", url, resp.status());
    Ok(resp)
}
