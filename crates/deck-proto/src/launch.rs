//! Launch assembly and non-blocking dispatch.
//!
//! The OS-level work happens behind [`Launcher`]; `LaunchDispatcher` hands
//! it to a blocking worker and reports the result on a channel so the UI can
//! surface failures without ever waiting on them.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::channel::ChannelType;
use crate::resolve::EffectiveChannelConfig;
use crate::validate::{validate, Validation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub kind: ChannelType,
    pub path: String,
    pub as_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("channel {id} has nothing to launch")]
    Empty { id: String },
    #[error("channel {id} has no launch type")]
    MissingType { id: String },
    #[error("channel {id}: {reason}")]
    InvalidPath { id: String, reason: &'static str },
}

impl LaunchRequest {
    pub fn from_effective(config: &EffectiveChannelConfig) -> Result<Self, LaunchError> {
        let path = config.launch_path().ok_or_else(|| LaunchError::Empty {
            id: config.id.clone(),
        })?;
        let kind = config.kind.ok_or_else(|| LaunchError::MissingType {
            id: config.id.clone(),
        })?;
        if let Validation::Invalid { reason } = validate(kind, path) {
            return Err(LaunchError::InvalidPath {
                id: config.id.clone(),
                reason,
            });
        }
        Ok(Self {
            kind,
            path: path.to_string(),
            as_admin: config.as_admin && kind == ChannelType::Exe,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRoute {
    /// Handed to the host app launcher.
    App(LaunchRequest),
    /// URL in the system browser.
    External(String),
    /// URL in the picture-in-picture window.
    Pip(String),
}

impl LaunchRoute {
    pub fn for_request(request: LaunchRequest, immersive_pip: bool) -> Self {
        match request.kind {
            ChannelType::Url if immersive_pip => Self::Pip(request.path),
            ChannelType::Url => Self::External(request.path),
            _ => Self::App(request),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::App(req) => &req.path,
            Self::External(url) | Self::Pip(url) => url,
        }
    }
}

impl fmt::Display for LaunchRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(req) if req.as_admin => write!(f, "{} (admin) {}", req.kind, req.path),
            Self::App(req) => write!(f, "{} {}", req.kind, req.path),
            Self::External(url) => write!(f, "browser {}", url),
            Self::Pip(url) => write!(f, "pip {}", url),
        }
    }
}

/// Host-side launch primitives.
pub trait Launcher: Send + Sync {
    fn launch_app(&self, request: &LaunchRequest) -> anyhow::Result<()>;
    fn open_external(&self, url: &str) -> anyhow::Result<()>;
    fn open_pip_window(&self, url: &str) -> anyhow::Result<()>;
}

/// Outcome of one dispatched launch.  `Err` carries a display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub channel_id: String,
    pub route: LaunchRoute,
    pub outcome: Result<(), String>,
}

#[derive(Clone)]
pub struct LaunchDispatcher {
    launcher: Arc<dyn Launcher>,
    reports: mpsc::UnboundedSender<LaunchReport>,
}

impl LaunchDispatcher {
    pub fn new(
        launcher: Arc<dyn Launcher>,
    ) -> (Self, mpsc::UnboundedReceiver<LaunchReport>) {
        let (reports, rx) = mpsc::unbounded_channel();
        (Self { launcher, reports }, rx)
    }

    /// Fire the launch on a blocking worker.  Must be called inside a tokio
    /// runtime; returns immediately.
    pub fn dispatch(&self, channel_id: &str, route: LaunchRoute) {
        let launcher = Arc::clone(&self.launcher);
        let reports = self.reports.clone();
        let channel_id = channel_id.to_string();
        tracing::info!("launching {}: {}", channel_id, route);

        tokio::task::spawn_blocking(move || {
            let result = match &route {
                LaunchRoute::App(req) => launcher.launch_app(req),
                LaunchRoute::External(url) => launcher.open_external(url),
                LaunchRoute::Pip(url) => launcher.open_pip_window(url),
            };
            let outcome = result.map_err(|e| {
                tracing::warn!("launch of {} failed: {:#}", channel_id, e);
                format!("{:#}", e)
            });
            // Receiver gone means the UI is shutting down.
            let _ = reports.send(LaunchReport {
                channel_id,
                route,
                outcome,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::KenBurnsMode;
    use std::sync::Mutex;

    fn effective(kind: Option<ChannelType>, path: Option<&str>) -> EffectiveChannelConfig {
        EffectiveChannelConfig {
            id: "channel-0".into(),
            kind,
            path: path.map(String::from),
            media: None,
            icon: None,
            hover_sound: None,
            as_admin: true,
            animated_on_hover: false,
            ken_burns_enabled: false,
            ken_burns_mode: KenBurnsMode::Hover,
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Launcher for Recorder {
        fn launch_app(&self, request: &LaunchRequest) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("app:{}:{}", request.kind, request.path));
            if self.fail {
                anyhow::bail!("executable not found");
            }
            Ok(())
        }

        fn open_external(&self, url: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("external:{}", url));
            Ok(())
        }

        fn open_pip_window(&self, url: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("pip:{}", url));
            Ok(())
        }
    }

    #[test]
    fn test_request_requires_path_and_type() {
        assert_eq!(
            LaunchRequest::from_effective(&effective(Some(ChannelType::Exe), Some("  "))),
            Err(LaunchError::Empty {
                id: "channel-0".into()
            })
        );
        assert_eq!(
            LaunchRequest::from_effective(&effective(None, Some("C:\\a.exe"))),
            Err(LaunchError::MissingType {
                id: "channel-0".into()
            })
        );
        assert!(matches!(
            LaunchRequest::from_effective(&effective(Some(ChannelType::Steam), Some("252950"))),
            Err(LaunchError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_as_admin_only_for_exe() {
        let req =
            LaunchRequest::from_effective(&effective(Some(ChannelType::Exe), Some(" C:\\a.exe ")))
                .unwrap();
        assert!(req.as_admin);
        assert_eq!(req.path, "C:\\a.exe");

        let req = LaunchRequest::from_effective(&effective(
            Some(ChannelType::Steam),
            Some("steam://rungameid/1"),
        ))
        .unwrap();
        assert!(!req.as_admin);
    }

    #[test]
    fn test_url_routing_follows_pip_preference() {
        let req = LaunchRequest {
            kind: ChannelType::Url,
            path: "https://example.com".into(),
            as_admin: false,
        };
        assert_eq!(
            LaunchRoute::for_request(req.clone(), false),
            LaunchRoute::External("https://example.com".into())
        );
        assert_eq!(
            LaunchRoute::for_request(req, true),
            LaunchRoute::Pip("https://example.com".into())
        );

        let steam = LaunchRequest {
            kind: ChannelType::Steam,
            path: "steam://rungameid/1".into(),
            as_admin: false,
        };
        assert!(matches!(
            LaunchRoute::for_request(steam, true),
            LaunchRoute::App(_)
        ));
    }

    #[tokio::test]
    async fn test_dispatch_reports_success() {
        let launcher = Arc::new(Recorder::default());
        let (dispatcher, mut rx) = LaunchDispatcher::new(launcher.clone());
        dispatcher.dispatch("channel-1", LaunchRoute::Pip("https://example.com".into()));
        let report = rx.recv().await.unwrap();
        assert_eq!(report.channel_id, "channel-1");
        assert_eq!(report.outcome, Ok(()));
        assert_eq!(
            launcher.calls.lock().unwrap().as_slice(),
            ["pip:https://example.com"]
        );
    }

    #[tokio::test]
    async fn test_dispatch_reports_failure() {
        let launcher = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let (dispatcher, mut rx) = LaunchDispatcher::new(launcher);
        let route = LaunchRoute::App(LaunchRequest {
            kind: ChannelType::Exe,
            path: "C:\\missing.exe".into(),
            as_admin: false,
        });
        dispatcher.dispatch("channel-2", route.clone());
        let report = rx.recv().await.unwrap();
        assert_eq!(report.route, route);
        assert_eq!(report.outcome, Err("executable not found".to_string()));
    }
}
