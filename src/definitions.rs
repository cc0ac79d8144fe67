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
// - definitions.rs file -

use crate::error::ResolveError;
use crate::settings::Settings;
use crate::source::SourceUrl;

// What a site handler found behind a page.
#[derive(Debug, PartialEq, Eq)]
pub enum Retrieval {
    // A direct media link; stream it and check its size.
    // <tokens> are the scraped pieces the link was built from.
    Stream { link: String, tokens: Vec<String> },
    // The hoster already sent the file.
    Payload(Vec<u8>),
    // The page was processed, but there is nothing to save.
    Inspected,
}

// Define the public interface for site definitions:
pub trait SiteDefinition: Sync {
    // true, if this site can handle <url>.
    fn can_handle_url(&self, url: &str) -> bool;

    // Handlers are tried in ascending rank.
    fn rank(&self) -> u8;

    // returns the name of the site (e.g. "file-up.org").
    fn display_name(&self) -> &'static str;

    // Scrapes the page behind <source> and returns what to save.
    fn find_video(&self, source: &SourceUrl, settings: &Settings)
        -> Result<Retrieval, ResolveError>;
}

inventory::collect!(&'static dyn SiteDefinition);

// All known handlers, in the order they should be tried.
pub fn handlers() -> Vec<&'static dyn SiteDefinition> {
    let mut all: Vec<&'static dyn SiteDefinition> =
        inventory::iter::<&dyn SiteDefinition>.into_iter().copied().collect();
    all.sort_by_key(|handler| handler.rank());
    all
}

pub fn handler_for(url: &str) -> Option<&'static dyn SiteDefinition> {
    handlers()
        .into_iter()
        .find(|handler| handler.can_handle_url(url))
}
