// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::campaign::payload::Campaign;
use crate::modules::campaign::service::Draft;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::{generate_token, raise_error};
use dashmap::DashMap;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

/// How long a previewed draft can be sent.
pub const DRAFT_TTL: Duration = Duration::from_secs(60 * 60);

pub static DRAFT_CACHE: LazyLock<DraftCache> = LazyLock::new(|| DraftCache::new(DRAFT_TTL));

struct CachedDraft {
    /// The previewed campaign with its recipients cleared.
    source: Campaign,
    draft: Draft,
    created_at: Instant,
}

/// Previewed drafts, so a send delivers the copy that was shown instead of
/// asking the language model again.
pub struct DraftCache {
    drafts: DashMap<String, CachedDraft>,
    ttl: Duration,
}

impl DraftCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Stores a draft and returns its id. Expired drafts are evicted first.
    pub fn insert(&self, campaign: &Campaign, draft: Draft) -> String {
        self.drafts.retain(|_, cached| cached.created_at.elapsed() < self.ttl);
        let id = generate_token!(96);
        self.drafts.insert(
            id.clone(),
            CachedDraft {
                source: campaign.without_recipients(),
                draft,
                created_at: Instant::now(),
            },
        );
        id
    }

    /// The draft previewed as `id`. The campaign may name other recipients,
    /// but its content must be what was previewed.
    pub fn get(&self, id: &str, campaign: &Campaign) -> CampaignResult<Draft> {
        let cached = self
            .drafts
            .get(id)
            .filter(|cached| cached.created_at.elapsed() < self.ttl)
            .ok_or_else(|| {
                raise_error!(
                    format!(
                        "Preview '{}' has expired or does not exist, preview the campaign again",
                        id
                    ),
                    ErrorCode::ResourceNotFound
                )
            })?;
        if cached.source != campaign.without_recipients() {
            return Err(raise_error!(
                format!("The campaign changed after preview '{}', preview it again", id),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(cached.draft.clone())
    }
}
