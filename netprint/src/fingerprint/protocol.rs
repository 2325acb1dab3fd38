//! The fingerprinting protocol.
//!
//! A run walks one session through a fixed sequence of phases:
//!
//! ```text
//! CONNECTING -> DETECTING_PROMPT -> DISABLING_PAGING -> FETCHING_VERSION
//!                                                          |
//!                                                          +-> FETCHING_NEIGHBORS -> DONE
//!                                                          +-----------------------> DONE
//! ```
//!
//! Any phase may end in FAILED. The session is closed either way.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, trace, warn};
use tokio::task::JoinSet;
use tokio::time::Instant;

use super::config::FingerprintConfig;
use super::hint::TemplateHint;
use super::paging::PagingProbe;
use super::result::{FingerprintResult, device_type};
use super::state::{ProtocolState, StateTracker};
use crate::channel::{Connector, ErrorPatterns, PromptGrammar, Session, Target};
use crate::error::{ChannelError, FingerprintError, Result, TransportError};
use crate::template::{ParsedRecord, TemplateMatcher};
use crate::vendor::VendorRegistry;

/// Read after `settle`, giving up `read_timeout` later with an empty result.
pub(crate) async fn read_output<S: Session>(
    session: &mut S,
    settle: Duration,
    read_timeout: Duration,
) -> std::result::Result<String, ChannelError> {
    let limit = settle + read_timeout;
    match tokio::time::timeout(limit, session.read_available(settle)).await {
        Ok(read) => read,
        Err(_) => {
            debug!("read gave nothing within {:?}", limit);
            Ok(String::new())
        }
    }
}

/// Identifies devices by probing their CLI and matching the output against
/// a template repository.
///
/// Cheap to clone; the repository is shared.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    config: FingerprintConfig,
    matcher: TemplateMatcher,
    vendors: VendorRegistry,
    prompt: PromptGrammar,
    errors: ErrorPatterns,
}

impl Fingerprinter {
    pub(crate) fn new(
        config: FingerprintConfig,
        matcher: TemplateMatcher,
        vendors: VendorRegistry,
        prompt: PromptGrammar,
        errors: ErrorPatterns,
    ) -> Self {
        Self {
            config,
            matcher,
            vendors,
            prompt,
            errors,
        }
    }

    /// Get the run configuration.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Get the template matcher.
    pub fn matcher(&self) -> &TemplateMatcher {
        &self.matcher
    }

    /// Connect to `target` and fingerprint it.
    pub async fn fingerprint<C: Connector>(
        &self,
        connector: &C,
        target: &Target,
    ) -> Result<FingerprintResult> {
        let started = Instant::now();
        let mut tracker = StateTracker::new(&target.host);
        info!("fingerprinting {}:{}", target.host, target.port);

        let timeout = self.config.connect_timeout;
        let session = match tokio::time::timeout(timeout, connector.open(target, timeout)).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                tracker.advance(ProtocolState::Failed);
                return Err(FingerprintError::connection(&target.host, e).into());
            }
            Err(_) => {
                tracker.advance(ProtocolState::Failed);
                return Err(
                    FingerprintError::connection(&target.host, TransportError::Timeout(timeout))
                        .into(),
                );
            }
        };

        self.drive(session, &target.host, tracker, started).await
    }

    /// Fingerprint a device over a session that is already open.
    ///
    /// The session is closed when the run ends.
    pub async fn run<S: Session>(&self, session: S, host: &str) -> Result<FingerprintResult> {
        self.drive(session, host, StateTracker::new(host), Instant::now())
            .await
    }

    /// Fingerprint many targets concurrently, one task and session each.
    ///
    /// Results are returned in completion order, paired with the host. Every
    /// target gets an entry; a task that panics is reported as `TaskFailed`.
    pub async fn fingerprint_all<C>(
        &self,
        connector: Arc<C>,
        targets: Vec<Target>,
    ) -> Vec<(String, Result<FingerprintResult>)>
    where
        C: Connector + 'static,
    {
        let mut tasks = JoinSet::new();
        let mut hosts = HashMap::with_capacity(targets.len());
        for target in targets {
            let host = target.host.clone();
            let fingerprinter = self.clone();
            let connector = Arc::clone(&connector);
            let handle = tasks.spawn(async move {
                fingerprinter.fingerprint(connector.as_ref(), &target).await
            });
            hosts.insert(handle.id(), host);
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            let entry = match joined {
                Ok((id, result)) => (hosts.remove(&id).unwrap_or_default(), result),
                Err(source) => {
                    let host = hosts.remove(&source.id()).unwrap_or_default();
                    warn!("{}: fingerprint task did not complete: {}", host, source);
                    let error = FingerprintError::TaskFailed {
                        host: host.clone(),
                        source,
                    };
                    (host, Err(error.into()))
                }
            };
            results.push(entry);
        }
        results
    }

    async fn drive<S: Session>(
        &self,
        mut session: S,
        host: &str,
        mut tracker: StateTracker,
        started: Instant,
    ) -> Result<FingerprintResult> {
        let outcome = self.probe(&mut session, host, &mut tracker, started).await;

        match &outcome {
            Ok(result) => {
                tracker.advance(ProtocolState::Done);
                info!(
                    "{}: {} ({:?}) confidence {:.1} in {:?}",
                    host, result.template_id, result.vendor, result.confidence, result.processing_time
                );
            }
            Err(e) => {
                warn!("{}: fingerprinting failed in {}: {}", host, tracker.state(), e);
                tracker.advance(ProtocolState::Failed);
            }
        }

        if let Err(e) = session.close().await {
            warn!("{}: error closing session: {}", host, e);
        }
        outcome
    }

    async fn probe<S: Session>(
        &self,
        session: &mut S,
        host: &str,
        tracker: &mut StateTracker,
        started: Instant,
    ) -> Result<FingerprintResult> {
        let config = &self.config;
        let lost = |e: ChannelError| FingerprintError::connection(host, e);

        tracker.advance(ProtocolState::DetectingPrompt);
        let banner = read_output(session, config.banner_delay, config.read_timeout)
            .await
            .map_err(lost)?;
        trace!("{}: banner {:?}", host, banner);

        session.send("\n").await.map_err(lost)?;
        let output = read_output(session, config.prompt_settle, config.read_timeout)
            .await
            .map_err(lost)?;
        let prompt = self
            .prompt
            .detect(&output)
            .ok_or_else(|| FingerprintError::PromptNotDetected {
                host: host.to_string(),
            })?;
        info!("{}: detected prompt {:?}", host, prompt);

        tracker.advance(ProtocolState::DisablingPaging);
        let paging = PagingProbe {
            registry: &self.vendors,
            errors: &self.errors,
            settle: config.command_settle,
            read_timeout: config.read_timeout,
        }
        .run(session, &prompt)
        .await
        .map_err(lost)?;

        tracker.advance(ProtocolState::FetchingVersion);
        session
            .send(&format!("{}\n", config.version_command))
            .await
            .map_err(lost)?;
        let version = read_output(session, config.version_settle, config.read_timeout)
            .await
            .map_err(lost)?;
        if version.trim().is_empty() {
            return Err(FingerprintError::NoVersionOutput {
                host: host.to_string(),
            }
            .into());
        }

        let hint = TemplateHint::derive(&version, paging.vendor, &self.vendors);
        debug!("{}: template hint {}", host, hint.filter);
        let mut matched = self.matcher.find_best_template(&version, Some(hint.filter.as_str()));
        if !matched.is_match() {
            let broadened = hint.broadened();
            info!("{}: no template for {}, retrying with {:?}", host, hint.filter, broadened);
            matched = self.matcher.find_best_template(&version, broadened);
        }
        let Some(template_id) = matched.template_id else {
            return Err(FingerprintError::NoTemplateMatch {
                host: host.to_string(),
                hint: Some(hint.filter),
            }
            .into());
        };

        let label = matched.context_label.unwrap_or_else(|| template_id.clone());
        let device_type = device_type(&label);
        let vendor = paging
            .vendor
            .or(hint.vendor)
            .or_else(|| self.vendors.vendor_for_template(&label));

        let (neighbor_output, neighbors) = if config.neighbor_discovery
            && matched.score > config.neighbor_min_confidence
        {
            match self.vendors.neighbor_command(&device_type) {
                Some(command) => {
                    tracker.advance(ProtocolState::FetchingNeighbors);
                    self.fetch_neighbors(session, host, command, &device_type)
                        .await
                }
                None => {
                    debug!("{}: no neighbor command for {:?}", host, device_type);
                    (None, vec![])
                }
            }
        } else {
            (None, vec![])
        };

        Ok(FingerprintResult {
            vendor,
            paging_commands: paging.commands,
            detected_prompt: prompt,
            parsed_data: matched.records,
            template_id,
            confidence: matched.score,
            processing_time: started.elapsed(),
            device_type,
            neighbor_output,
            neighbors,
        })
    }

    /// Neighbor phase. Failures are logged and leave the result without
    /// neighbor data.
    async fn fetch_neighbors<S: Session>(
        &self,
        session: &mut S,
        host: &str,
        command: &str,
        device_type: &str,
    ) -> (Option<String>, Vec<ParsedRecord>) {
        let fetched = match session.send(&format!("{command}\n")).await {
            Ok(()) => {
                read_output(session, self.config.neighbor_settle, self.config.read_timeout).await
            }
            Err(e) => Err(e),
        };

        let output = match fetched {
            Ok(output) if !output.trim().is_empty() => output,
            Ok(_) => {
                debug!("{}: '{}' returned nothing", host, command);
                return (None, vec![]);
            }
            Err(source) => {
                let error = FingerprintError::NeighborFetchFailed {
                    command: command.to_string(),
                    source,
                };
                warn!("{}: {}", host, error);
                return (None, vec![]);
            }
        };

        let matched = self
            .matcher
            .find_best_template(&output, Some(format!("{device_type} neighbors").as_str()));
        debug!(
            "{}: {} neighbor records via {:?}",
            host,
            matched.records.len(),
            matched.template_id
        );
        (Some(output), matched.records)
    }
}
