//! Share-link building.
//!
//! Each article gets a fixed set of share targets; building a link
//! substitutes the percent-encoded article URL into the target's template.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed share targets offered per article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareNetwork {
    Facebook,
    Twitter,
    LinkedIn,
    Email,
    WhatsApp,
}

impl ShareNetwork {
    /// Returns the display label for this network.
    pub fn display_name(&self) -> &'static str {
        match self {
            ShareNetwork::Facebook => "Facebook",
            ShareNetwork::Twitter => "Twitter",
            ShareNetwork::LinkedIn => "LinkedIn",
            ShareNetwork::Email => "Email",
            ShareNetwork::WhatsApp => "WhatsApp",
        }
    }

    /// Returns all networks in display order.
    pub fn all() -> &'static [ShareNetwork] {
        &[
            ShareNetwork::Facebook,
            ShareNetwork::Twitter,
            ShareNetwork::LinkedIn,
            ShareNetwork::Email,
            ShareNetwork::WhatsApp,
        ]
    }
}

impl fmt::Display for ShareNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One ready-to-open share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub network: ShareNetwork,
    pub url: String,
}

/// Builds the share link for one network and article URL.
pub fn share_link(network: ShareNetwork, article_url: &str) -> ShareLink {
    let url = match network {
        ShareNetwork::Facebook => {
            format!(
                "https://www.facebook.com/sharer/sharer.php?{}",
                encode_pairs(&[("u", article_url)])
            )
        }
        ShareNetwork::Twitter => {
            format!(
                "https://twitter.com/intent/tweet?{}",
                encode_pairs(&[("url", article_url)])
            )
        }
        ShareNetwork::LinkedIn => {
            format!(
                "https://www.linkedin.com/shareArticle?{}",
                encode_pairs(&[("mini", "true"), ("url", article_url)])
            )
        }
        ShareNetwork::Email => {
            format!(
                "mailto:?{}",
                encode_pairs(&[("subject", "Check out this article"), ("body", article_url)])
            )
        }
        ShareNetwork::WhatsApp => {
            format!(
                "https://api.whatsapp.com/send?{}",
                encode_pairs(&[("text", article_url)])
            )
        }
    };

    ShareLink { network, url }
}

/// Builds the full set of share links for an article URL, in display order.
pub fn share_links(article_url: &str) -> Vec<ShareLink> {
    ShareNetwork::all()
        .iter()
        .map(|network| share_link(*network, article_url))
        .collect()
}

fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
