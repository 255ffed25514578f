//! Resolver and responder wired together for one request.

use crate::error::Result;
use crate::hooks::AccessDecision;
use crate::models::RequestContext;
use crate::resolver::{MediaResolver, Resolution};
use crate::responder::{FileResponder, FileResponse};

/// What the transport layer should send back.
#[derive(Debug)]
pub enum GateOutcome {
    /// The request carried no media path; not ours to answer.
    Skipped,
    /// Subscribers approved delivery.
    File(FileResponse),
    Denied,
    Redirect(String),
    /// Unresolved, hidden, or nobody claimed the request.
    NotFound,
}

impl GateOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::File(FileResponse::NotModified) => "not_modified",
            Self::File(FileResponse::Full(_)) => "served",
            Self::Denied => "denied",
            Self::Redirect(_) => "redirect",
            Self::NotFound => "not_found",
        }
    }
}

#[derive(Debug)]
pub struct MediaGate {
    resolver: MediaResolver,
    responder: FileResponder,
}

impl MediaGate {
    pub const fn new(resolver: MediaResolver, responder: FileResponder) -> Self {
        Self {
            resolver,
            responder,
        }
    }

    pub const fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    pub const fn responder(&self) -> &FileResponder {
        &self.responder
    }

    /// Resolve the request, publish the access event and act on the verdict.
    pub fn handle(&self, context: &mut RequestContext) -> Result<GateOutcome> {
        let Some(resolution) = self.resolver.handle(context)? else {
            return Ok(GateOutcome::Skipped);
        };
        self.respond(resolution, context)
    }

    fn respond(&self, resolution: Resolution, context: &RequestContext) -> Result<GateOutcome> {
        let Resolution { asset, decision } = resolution;
        let outcome = match decision {
            AccessDecision::Serve => {
                GateOutcome::File(self.responder.serve(&asset.path, &context.conditional)?)
            }
            AccessDecision::Deny => GateOutcome::Denied,
            AccessDecision::Redirect(location) => GateOutcome::Redirect(location),
            AccessDecision::NotFound | AccessDecision::Pass => GateOutcome::NotFound,
        };
        tracing::info!(
            url_len = asset.url.len(),
            id = ?asset.id,
            variant = asset.is_variant,
            outcome = outcome.label(),
            "Media request handled"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadsConfig;
    use crate::error::Error;
    use crate::hooks::AccessHooks;
    use crate::models::{AssetId, AssetReference, ConditionalRequest};
    use crate::store::MemoryAssetStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    const BASE: &str = "https://example.com/wp-content/uploads";

    fn gate(dir: &TempDir, hooks: AccessHooks) -> MediaGate {
        let store = MemoryAssetStore::new().with(format!("{BASE}/photo.jpg"), AssetId::new(1));
        let uploads = UploadsConfig::new(BASE, dir.path()).unwrap();
        MediaGate::new(
            MediaResolver::new(uploads, Arc::new(store), hooks),
            FileResponder::default(),
        )
    }

    fn context(path: &str) -> RequestContext {
        RequestContext::new(Some(path.to_string()), ConditionalRequest::default())
    }

    fn registered_only() -> AccessHooks {
        AccessHooks::new().with(|asset: &AssetReference| {
            if asset.is_resolved() {
                AccessDecision::Serve
            } else {
                AccessDecision::NotFound
            }
        })
    }

    #[test]
    fn serves_resolved_variant_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo-150x150.jpg"), b"thumb").unwrap();
        let gate = gate(&dir, registered_only());

        let mut ctx = context("/photo-150x150.jpg");
        match gate.handle(&mut ctx).unwrap() {
            GateOutcome::File(FileResponse::Full(file)) => {
                assert_eq!(file.content_length, 5);
                assert_eq!(file.filename, "photo-150x150.jpg");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(ctx.cache_bypass.any());
    }

    #[test]
    fn missing_parameter_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let gate = gate(&dir, registered_only());
        let mut ctx = RequestContext::default();
        assert!(matches!(gate.handle(&mut ctx).unwrap(), GateOutcome::Skipped));
    }

    #[test]
    fn unclaimed_request_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"jpeg").unwrap();
        let gate = gate(&dir, AccessHooks::new());
        assert!(matches!(
            gate.handle(&mut context("/photo.jpg")).unwrap(),
            GateOutcome::NotFound
        ));
    }

    #[test]
    fn deny_and_redirect_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let denying = gate(&dir, AccessHooks::new().with(|_: &AssetReference| AccessDecision::Deny));
        assert!(matches!(
            denying.handle(&mut context("/photo.jpg")).unwrap(),
            GateOutcome::Denied
        ));

        let redirecting = gate(
            &dir,
            AccessHooks::new()
                .with(|_: &AssetReference| AccessDecision::Redirect("/login".to_string())),
        );
        match redirecting.handle(&mut context("/photo.jpg")).unwrap() {
            GateOutcome::Redirect(location) => assert_eq!(location, "/login"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn approved_but_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gate = gate(&dir, registered_only());
        assert!(matches!(
            gate.handle(&mut context("/photo.jpg")),
            Err(Error::NotFound(_))
        ));
    }
}
