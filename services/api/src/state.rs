//! Application state shared across handlers

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use common::store::DocumentStore;

use crate::{
    config::Settings,
    credentials::AdminAuthenticator,
    jwt::{JwtConfig, JwtService},
    notify::Notifications,
    repositories::{ProfileRepository, ScheduleRepository, inquiry::InquiryRepository},
};

/// Application state shared across handlers
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub profile_repository: ProfileRepository,
    pub schedule_repository: ScheduleRepository,
    pub inquiry_repository: InquiryRepository,
    pub authenticator: AdminAuthenticator,
    pub jwt_service: JwtService,
    pub notifications: Notifications,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        authenticator: AdminAuthenticator,
        jwt_service: JwtService,
        notifications: Notifications,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            profile_repository: ProfileRepository::new(store.clone()),
            schedule_repository: ScheduleRepository::new(store.clone()),
            inquiry_repository: InquiryRepository::new(store),
            authenticator,
            jwt_service,
            notifications,
            static_dir,
        }
    }

    /// Derive every service from the loaded settings
    ///
    /// This is where the admin password gets hashed.
    pub fn from_settings(store: Arc<dyn DocumentStore>, settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            store,
            AdminAuthenticator::from_settings(settings)?,
            JwtService::new(JwtConfig::from_settings(settings)),
            Notifications::from_settings(settings),
            PathBuf::from(&settings.static_dir),
        ))
    }
}
