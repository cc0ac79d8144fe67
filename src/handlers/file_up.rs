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
// - file-up.org handler -

use super::{css, fetch};
use crate::agent::{AgentBase, HostgrabAgent};
use crate::definitions::{Retrieval, SiteDefinition};
use crate::error::ResolveError;
use crate::settings::Settings;
use crate::source::SourceUrl;

use scraper::Html;
use tracing::debug;

// The packed player script starts its argument list right here.
const PLAYER_DELIMITER: &str = ",36,";

/// The pieces of the real media link, recovered from the packed
/// player script on the embed page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlayerCode {
    pub scheme: Option<String>,
    pub server: Option<String>,
    pub secret: Option<String>,
    pub tokens: Vec<String>,
}

impl PlayerCode {
    /// Sorts a `|`-separated token list into its roles. There are no
    /// markers, so this goes by looks: `https` is the scheme, anything
    /// longer than 40 characters is the secret and a short `f..` token
    /// names the server. Later matches win.
    pub fn classify(packed: &str) -> Self {
        let mut code = PlayerCode {
            tokens: packed.split('|').map(str::to_string).collect(),
            ..Default::default()
        };

        for token in &code.tokens {
            if token == "https" {
                code.scheme = Some(token.clone());
            } else if token.len() > 40 {
                code.secret = Some(token.clone());
            } else if token.len() < 4 && token.starts_with('f') {
                code.server = Some(token.clone());
            }
        }

        code
    }

    // The link as far as it could be assembled.
    pub fn link(&self) -> String {
        format!(
            "{}://{}.file-upload.download:183/d/{}/video.mp4",
            self.scheme.as_deref().unwrap_or_default(),
            self.server.as_deref().unwrap_or_default(),
            self.secret.as_deref().unwrap_or_default()
        )
    }

    pub fn media_link(&self) -> Result<String, ResolveError> {
        if self.scheme.is_none() || self.server.is_none() || self.secret.is_none() {
            return Err(ResolveError::PlayerCode {
                link: self.link(),
                tokens: self.tokens.clone(),
            });
        }
        Ok(self.link())
    }
}

/// Digs the packed token list out of the embed page.
pub fn player_code(page: &str, embed_url: &str) -> Result<PlayerCode, ResolveError> {
    let document = Html::parse_document(page);
    let player = document
        .select(&css("div#player_code"))
        .next()
        .ok_or_else(|| ResolveError::MissingElement {
            element: "player_code div",
            url: embed_url.to_string(),
        })?;
    let text = player.text().collect::<String>();

    let malformed = |reason| ResolveError::MalformedPlayerCode {
        url: embed_url.to_string(),
        reason,
    };
    let start = text
        .find(PLAYER_DELIMITER)
        .ok_or_else(|| malformed("no argument list"))?;
    let field = text[start..]
        .split(',')
        .nth(3)
        .ok_or_else(|| malformed("argument list too short"))?;
    let packed = field.split_once('.').map_or(field, |(head, _)| head);

    Ok(PlayerCode::classify(packed))
}

// Implement the site definition:
struct FileUpHandler;
impl SiteDefinition for FileUpHandler {
    fn can_handle_url(&self, url: &str) -> bool {
        url.contains("www.file-up.org")
    }

    fn rank(&self) -> u8 {
        0
    }

    fn display_name(&self) -> &'static str {
        "file-up.org"
    }

    fn find_video(
        &self,
        source: &SourceUrl,
        settings: &Settings,
    ) -> Result<Retrieval, ResolveError> {
        // The landing page is just an ad; the player lives on the embed page.
        let embed_url = source.sibling(&format!("/embed-{}-1110x500.html", source.code))?;
        let agent = HostgrabAgent::init(&embed_url, settings)?;

        let page = fetch(&agent, embed_url.as_str())?.into_string()?;
        let code = player_code(&page, embed_url.as_str())?;
        debug!("Player code tokens: {:?}", code.tokens);

        let link = code.media_link()?;
        debug!("Getting the video from {}", link);
        Ok(Retrieval::Stream {
            link,
            tokens: code.tokens,
        })
    }
}

// Push the site definition to the list of known handlers:
inventory::submit! {
    &FileUpHandler as &dyn SiteDefinition
}
