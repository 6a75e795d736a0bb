//! Resource resolution: static lookup, template matching, bounded reads.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ContextError, ContextResult, Namespace};
use crate::exec::{run_bounded, ExecFailure};
use crate::registry::Registry;
use crate::types::{ResourceDescriptor, ResourceInfo, ResourceRead, ResourceRequest};

/// A URI matched to its descriptor, with captured placeholder values.
#[derive(Debug, Clone)]
pub struct ResolvedResource<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Match a URI without running any handler.
    ///
    /// Static patterns win outright. Among templated patterns the one with
    /// the most literal segments wins, then the earliest registered.
    pub fn resolve(&self, uri: &str) -> ContextResult<ResolvedResource<'_>> {
        if let Some(descriptor) = self.registry.static_resource(uri) {
            return Ok(ResolvedResource {
                descriptor,
                params: BTreeMap::new(),
            });
        }

        let mut best: Option<ResolvedResource<'_>> = None;
        for descriptor in self.registry.templated_resources() {
            let Some(params) = descriptor.template.matches(uri) else {
                continue;
            };
            let better = best.as_ref().map_or(true, |current| {
                descriptor.template.literal_count() > current.descriptor.template.literal_count()
            });
            if better {
                best = Some(ResolvedResource { descriptor, params });
            }
        }

        best.ok_or_else(|| ContextError::not_found(Namespace::Resource, uri))
    }

    /// Resolve and read a resource.
    pub async fn read(&self, uri: &str) -> ContextResult<ResourceRead> {
        let resolved = self.resolve(uri)?;
        let descriptor = resolved.descriptor;

        let mut params = descriptor.static_params.clone();
        params.extend(resolved.params);

        tracing::debug!(
            "Reading {uri} via {} ({} param(s))",
            descriptor.template,
            params.len()
        );

        let request = ResourceRequest {
            uri: uri.to_string(),
            params,
        };

        match run_bounded(descriptor.handler.clone(), request, self.timeout).await {
            Ok(contents) => Ok(ResourceRead {
                uri: uri.to_string(),
                contents,
            }),
            Err(ExecFailure::Failed(message)) => {
                tracing::warn!("Resource {uri} failed: {message}");
                Err(ContextError::Execution {
                    target: uri.to_string(),
                    message,
                })
            }
            Err(ExecFailure::TimedOut(elapsed)) => {
                tracing::warn!("Resource {uri} timed out after {}ms", elapsed.as_millis());
                Err(ContextError::Timeout {
                    target: uri.to_string(),
                    elapsed,
                })
            }
        }
    }

    /// Metadata for every registered resource; never runs a handler.
    pub fn list(&self) -> Vec<ResourceInfo> {
        self.registry.resource_infos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::error::{ErrorKind, HandlerError};
    use crate::template::UriTemplate;
    use crate::types::ResourceContents;

    fn echo(pattern: &str, label: &'static str) -> ResourceDescriptor {
        ResourceDescriptor::new(UriTemplate::parse(pattern).unwrap(), label, move |req| async move {
            Ok(ResourceContents::json(json!({
                "matched": label,
                "uri": req.uri,
                "params": req.params,
            })))
        })
    }

    fn resolver(reg: Registry) -> Resolver {
        Resolver::new(Arc::new(reg), Duration::from_secs(1))
    }

    #[test]
    fn test_static_beats_template() {
        let mut reg = Registry::new();
        reg.register_resource(echo("user://{id}/profile", "templated")).unwrap();
        reg.register_resource(echo("user://admin/profile", "static")).unwrap();
        let r = resolver(reg);

        let hit = r.resolve("user://admin/profile").unwrap();
        assert_eq!(hit.descriptor.name, "static");
        assert!(hit.params.is_empty());

        let hit = r.resolve("user://7/profile").unwrap();
        assert_eq!(hit.descriptor.name, "templated");
        assert_eq!(hit.params["id"], "7");
    }

    #[test]
    fn test_more_literals_wins() {
        let mut reg = Registry::new();
        reg.register_resource(echo("repo://{owner}/{name}", "generic")).unwrap();
        reg.register_resource(echo("repo://{owner}/readme", "readme")).unwrap();
        let r = resolver(reg);
        assert_eq!(r.resolve("repo://acme/readme").unwrap().descriptor.name, "readme");
        assert_eq!(r.resolve("repo://acme/tools").unwrap().descriptor.name, "generic");
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let mut reg = Registry::new();
        reg.register_resource(echo("doc://{section}/intro", "first")).unwrap();
        reg.register_resource(echo("doc://guide/{page}", "second")).unwrap();
        let r = resolver(reg);
        assert_eq!(r.resolve("doc://guide/intro").unwrap().descriptor.name, "first");
    }

    #[test]
    fn test_unknown_uri() {
        let r = resolver(Registry::new());
        let err = r.resolve("nothing://here").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_merges_static_params() {
        let mut reg = Registry::new();
        reg.register_resource(
            echo("user://{id}/profile", "profile")
                .with_static_param("format", "json")
                .with_static_param("id", "ignored"),
        )
        .unwrap();
        let read = resolver(reg).read("user://42/profile").await.unwrap();
        match read.contents {
            ResourceContents::Json { value } => {
                assert_eq!(value["params"]["id"], "42");
                assert_eq!(value["params"]["format"], "json");
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_never_runs_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut reg = Registry::new();
        for pattern in ["a://one", "b://{x}"] {
            let counter = calls.clone();
            reg.register_resource(ResourceDescriptor::new(
                UriTemplate::parse(pattern).unwrap(),
                pattern,
                move |_req| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(ResourceContents::text("x"))
                    }
                },
            ))
            .unwrap();
        }
        let r = resolver(reg);
        let listed = r.list();
        assert_eq!(listed.len(), 2);
        assert!(!listed[0].templated);
        assert!(listed[1].templated);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_failure_and_timeout() {
        let mut reg = Registry::new();
        reg.register_resource(ResourceDescriptor::new(
            UriTemplate::parse("broken://x").unwrap(),
            "broken",
            |_req| async { Err(HandlerError::new("backend offline")) },
        ))
        .unwrap();
        reg.register_resource(ResourceDescriptor::new(
            UriTemplate::parse("slow://x").unwrap(),
            "slow",
            |_req| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ResourceContents::text("late"))
            },
        ))
        .unwrap();
        let r = Resolver::new(Arc::new(reg), Duration::from_millis(20));

        let err = r.read("broken://x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(err.to_string().contains("backend offline"));

        let err = r.read("slow://x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
