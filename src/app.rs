use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::countdown;
use crate::notification::{NotificationHandle, NotificationPresenter, NotificationSurface};
use crate::phrases::PhraseStore;
use crate::scheduler::{Countdown, ReminderScheduler};
use crate::settings::{Language, SettingsStore};
use crate::theme::ThemeHint;

/// Owns the stores, the scheduler and the presenter. All handlers take the
/// current time so the loop and tests drive the same code.
pub struct ReminderApp<S> {
    settings: SettingsStore,
    phrases: PhraseStore,
    scheduler: ReminderScheduler,
    presenter: NotificationPresenter<S>,
    theme: ThemeHint,
    status: String,
}

impl<S: NotificationSurface> ReminderApp<S> {
    /// Loads both stores from the configured data directory and starts the
    /// scheduler.
    pub fn new(config: &Config, surface: S, now: DateTime<Utc>) -> Result<Self> {
        let settings = SettingsStore::load(config.settings_path()?);
        let phrases = PhraseStore::load(config.phrases_path()?);
        let presenter = NotificationPresenter::new(surface, config.notification_timeout());
        Ok(Self::from_parts(settings, phrases, presenter, config.theme, now))
    }

    pub fn from_parts(
        settings: SettingsStore,
        phrases: PhraseStore,
        presenter: NotificationPresenter<S>,
        theme: ThemeHint,
        now: DateTime<Utc>,
    ) -> Self {
        let mut app = Self {
            settings,
            phrases,
            scheduler: ReminderScheduler::new(),
            presenter,
            theme,
            status: String::new(),
        };
        app.scheduler.start(app.settings.settings(), now);
        app.refresh_status(now);
        info!(
            interval_minutes = app.settings.settings().interval_minutes,
            phrases = app.phrases.len(),
            "reminder service started"
        );
        app
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn phrases(&self) -> &PhraseStore {
        &self.phrases
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn presenter(&self) -> &NotificationPresenter<S> {
        &self.presenter
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn toggle_label(&self) -> &'static str {
        countdown::toggle_label(self.scheduler.is_running(), self.settings.language())
    }

    /// One fire-tick: shows a reminder when the deadline has been reached.
    pub fn handle_tick(&mut self, now: DateTime<Utc>) -> Option<NotificationHandle> {
        if !self.scheduler.poll(now, self.settings.settings()) {
            return None;
        }
        self.show_random_phrase(now)
    }

    /// One display-tick: recomputes the status line and closes a notification
    /// that has outlived its timeout.
    pub fn handle_display_tick(&mut self, now: DateTime<Utc>) {
        self.presenter.expire(now);
        self.refresh_status(now);
    }

    pub fn handle_toggle(&mut self, now: DateTime<Utc>) -> bool {
        let running = self.scheduler.toggle(self.settings.settings(), now);
        info!(state = self.scheduler.state().display_name(), "reminder service toggled");
        self.refresh_status(now);
        running
    }

    pub fn handle_set_interval(&mut self, raw: &str, now: DateTime<Utc>) -> u32 {
        let minutes = self
            .scheduler
            .set_interval(self.settings.settings_mut(), raw, now);
        info!(raw, minutes, "reminder interval updated");
        self.refresh_status(now);
        minutes
    }

    pub fn handle_set_language(&mut self, language: Language, now: DateTime<Utc>) {
        self.settings.set_language(language);
        info!(%language, "language changed");
        self.refresh_status(now);
    }

    pub fn handle_add_phrase(&mut self, text: &str) -> bool {
        self.phrases.add(text)
    }

    pub fn handle_remove_phrase(&mut self, index: usize) -> Option<String> {
        self.phrases.remove(index)
    }

    /// Shows a reminder right away without moving the schedule.
    pub fn show_test_notification(&mut self, now: DateTime<Utc>) -> Option<NotificationHandle> {
        self.show_random_phrase(now)
    }

    pub fn dismiss(&mut self, handle: NotificationHandle) {
        self.presenter.dismiss(handle);
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        self.scheduler.remaining_seconds(now)
    }

    fn refresh_status(&mut self, now: DateTime<Utc>) {
        self.status = countdown::status_line(self.countdown(now), self.settings.language());
    }

    fn show_random_phrase(&mut self, now: DateTime<Utc>) -> Option<NotificationHandle> {
        let Some(phrase) = self.phrases.random_phrase() else {
            warn!("phrase list is empty, skipping reminder");
            return None;
        };

        match self.presenter.present(phrase, self.theme, now) {
            Ok(handle) => Some(handle),
            Err(err) => {
                error!(error = %err, "failed to present reminder");
                None
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.presenter.live() {
            self.presenter.dismiss(handle);
        }
        info!("reminder service stopped");
    }
}

/// Drives the app until Ctrl+C. Both periodic tasks run on the calling task,
/// so the app is never shared.
pub async fn run<S: NotificationSurface>(mut app: ReminderApp<S>, config: &Config) -> Result<()> {
    let mut fire_tick = time::interval(config.check_interval());
    fire_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut display_tick = time::interval(config.display_refresh());
    display_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_status = String::new();

    loop {
        tokio::select! {
            _ = fire_tick.tick() => {
                app.handle_tick(Utc::now());
            }
            _ = display_tick.tick() => {
                app.handle_display_tick(Utc::now());
                if app.status() != last_status {
                    tracing::trace!(status = app.status(), "countdown");
                    last_status = app.status().to_string();
                }
            }
            result = &mut shutdown => {
                if let Err(err) = result {
                    error!(error = %err, "unable to listen for shutdown signal");
                }
                break;
            }
        }
    }

    app.shutdown();
    Ok(())
}
