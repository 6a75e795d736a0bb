//! Resource catalog served by this binary.

use chrono::{DateTime, Utc};

use agentic_context::{ContextResult, Registry, ResourceDescriptor};

use super::{app_config, docs, profile, status};

pub struct ResourceCatalog;

impl ResourceCatalog {
    pub fn descriptors(started_at: DateTime<Utc>) -> ContextResult<Vec<ResourceDescriptor>> {
        Ok(vec![
            app_config::descriptor()?,
            status::descriptor(started_at)?,
            profile::user_profile()?,
            profile::admin_profile()?,
            docs::descriptor()?,
        ])
    }

    pub fn register(registry: &mut Registry, started_at: DateTime<Utc>) -> ContextResult<()> {
        for descriptor in Self::descriptors(started_at)? {
            registry.register_resource(descriptor)?;
        }
        Ok(())
    }
}
