//! Paging disable phase.
//!
//! Every vendor's paging commands are tried in turn. A vendor whose commands
//! all produce clean output is a candidate; the prompt, then the registry's
//! priority list, picks one candidate as the device's vendor.

use std::time::Duration;

use log::{debug, info, warn};

use super::protocol::read_output;
use crate::channel::{ErrorPatterns, Session};
use crate::error::ChannelError;
use crate::vendor::{Vendor, VendorProfile, VendorRegistry};

/// Vendor picked by the paging phase and the commands that worked for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PagingOutcome {
    pub(crate) vendor: Option<Vendor>,
    pub(crate) commands: Vec<(Vendor, String)>,
}

pub(crate) struct PagingProbe<'a> {
    pub(crate) registry: &'a VendorRegistry,
    pub(crate) errors: &'a ErrorPatterns,
    pub(crate) settle: Duration,
    pub(crate) read_timeout: Duration,
}

impl PagingProbe<'_> {
    /// Try every vendor's paging commands and pick the device's vendor.
    ///
    /// Only a closed session is an error; anything else just disqualifies
    /// the vendor being tried.
    pub(crate) async fn run<S: Session>(
        &self,
        session: &mut S,
        prompt: &str,
    ) -> Result<PagingOutcome, ChannelError> {
        let mut candidates: Vec<(Vendor, Vec<(Vendor, String)>)> = Vec::new();

        for profile in self.registry.profiles() {
            debug!("trying {} paging commands", profile.vendor);
            if let Some(commands) = self.try_vendor(session, profile).await? {
                candidates.push((profile.vendor, commands));
            }
        }

        let prompt = prompt.to_lowercase();
        let chosen = candidates
            .iter()
            .position(|(vendor, _)| prompt.contains(vendor.name()))
            .inspect(|&i| info!("selected {} from prompt", candidates[i].0))
            .or_else(|| {
                self.registry
                    .priority()
                    .iter()
                    .find_map(|p| candidates.iter().position(|(vendor, _)| vendor == p))
                    .inspect(|&i| info!("selected {} by vendor priority", candidates[i].0))
            });

        match chosen {
            Some(i) => {
                let (vendor, commands) = candidates.swap_remove(i);
                Ok(PagingOutcome {
                    vendor: Some(vendor),
                    commands,
                })
            }
            None if candidates.is_empty() => {
                warn!("no vendor paging commands succeeded");
                Ok(PagingOutcome::default())
            }
            None => {
                let names: Vec<&str> = candidates.iter().map(|(vendor, _)| vendor.name()).collect();
                warn!(
                    "paging accepted by {} but neither prompt nor priority selects a vendor",
                    names.join(", ")
                );
                Ok(PagingOutcome::default())
            }
        }
    }

    async fn try_vendor<S: Session>(
        &self,
        session: &mut S,
        profile: &VendorProfile,
    ) -> Result<Option<Vec<(Vendor, String)>>, ChannelError> {
        let mut succeeded = Vec::with_capacity(profile.paging_commands.len());

        for command in &profile.paging_commands {
            session.send(&format!("{command}\n")).await?;
            let output = match read_output(session, self.settle, self.read_timeout).await {
                Ok(output) => output,
                Err(ChannelError::Closed) => return Err(ChannelError::Closed),
                Err(e) => {
                    debug!("{} command '{}' failed: {}", profile.vendor, command, e);
                    return Ok(None);
                }
            };

            if output.trim().is_empty() {
                debug!("{} command '{}' produced no output", profile.vendor, command);
                return Ok(None);
            }
            if let Some(pattern) = self.errors.find(&output) {
                debug!("{} command '{}' rejected ({})", profile.vendor, command, pattern);
                return Ok(None);
            }
            succeeded.push((profile.vendor, command.clone()));
        }

        Ok((!succeeded.is_empty()).then_some(succeeded))
    }
}
