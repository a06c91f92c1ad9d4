//! Read-only tenant language preferences.
//!
//! Template rendering happens upstream of the router; the catalog's only
//! job is to hand the renderer a locale, preserving each tenant's
//! preference ordering unmodified.

use std::collections::HashMap;

use crate::config::schema::TenantConfig;
use crate::tenant::context::TenantId;

/// One language entry for a tenant, in preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    pub language_id: u32,
    pub code: String,
    pub preference: u32,
}

/// Per-tenant ordered language preferences.
#[derive(Debug, Clone, Default)]
pub struct TenantLanguageConfig {
    /// Sorted by preference rank, ties kept in config order.
    pub languages: Vec<LanguagePreference>,
}

impl TenantLanguageConfig {
    /// Resolve the locale for a requested language id.
    ///
    /// The requested language wins when the tenant lists it; otherwise the
    /// tenant's highest-preference language is used.
    pub fn resolve_locale(&self, requested: u32) -> Option<&str> {
        self.languages
            .iter()
            .find(|l| l.language_id == requested)
            .or_else(|| self.languages.first())
            .map(|l| l.code.as_str())
    }
}

/// Lookup of language configuration by tenant id.
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    tenants: HashMap<TenantId, TenantLanguageConfig>,
}

impl LanguageCatalog {
    /// Build the catalog from validated tenant configuration.
    pub fn from_config(tenants: &[TenantConfig]) -> Self {
        let mut map = HashMap::new();
        for tenant in tenants {
            let mut languages: Vec<LanguagePreference> = tenant
                .languages
                .iter()
                .map(|l| LanguagePreference {
                    language_id: l.id,
                    code: l.code.clone(),
                    preference: l.preference,
                })
                .collect();
            // Stable sort keeps config order within equal ranks.
            languages.sort_by_key(|l| l.preference);
            map.insert(TenantId(tenant.id), TenantLanguageConfig { languages });
        }
        Self { tenants: map }
    }

    /// Language configuration for a tenant, if known.
    pub fn get(&self, tenant: TenantId) -> Option<&TenantLanguageConfig> {
        self.tenants.get(&tenant)
    }
}
