//! Request tokens: which of several in-flight responses may still write the result element.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifies one click. Later clicks get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: AtomicU64,
}

impl RequestTokens {
    /// Issue the next token. Issuing implicitly invalidates every earlier token.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestToken(n)),
        }
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// Which response wins when several clicks overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderPolicy {
    /// Every response renders when it resolves; the last one to resolve wins.
    #[default]
    LastResolved,
    /// Only the most recently issued request renders; older responses are dropped.
    LatestIssued,
}

impl RenderPolicy {
    pub fn should_render(self, tokens: &RequestTokens, token: RequestToken) -> bool {
        match self {
            RenderPolicy::LatestIssued => tokens.is_latest(token),
            RenderPolicy::LastResolved => true,
        }
    }
}
