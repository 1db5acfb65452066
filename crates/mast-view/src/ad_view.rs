// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The ad view: owner of the current rich-media session.
//
// All methods run on the thread that owns the view.  Timers and downloads
// are spawned on the current tokio runtime and report back through the
// `UiDispatcher`; call `pump` (or await `process_next`) to apply them.

use std::future::Future;
use std::time::Duration;

use kurbo::Rect;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use mast_core::error::{MastError, Result};
use mast_core::{
    CLOSE_AREA_SIZE, CreativeEvent, HostRequest, PlacementType, Rotation, SdkConfig, SessionId,
    State, Surface,
};
use mast_host::PlatformHost;
use mast_mraid::script::render_all;
use mast_mraid::{
    CapabilityRegistry, CloseButtonDecision, CloseButtonPolicy, Command, Outcome,
};

use crate::dispatch::{UiDispatcher, UiEvent};
use crate::events::{AdEvent, AdEventSink};
use crate::session::Session;

/// Hosts one rich-media ad at a time and drives its bridge.
pub struct AdView<H: PlatformHost> {
    config: SdkConfig,
    placement: PlacementType,
    capabilities: CapabilityRegistry,
    close_policy: CloseButtonPolicy,
    host: H,
    listener: Box<dyn AdEventSink>,
    dispatcher: UiDispatcher,
    session: Option<Session>,
    close_timer: Option<JoinHandle<()>>,
    interstitial_timer: Option<JoinHandle<()>>,
}

impl<H: PlatformHost> AdView<H> {
    pub fn new(
        config: SdkConfig,
        placement: PlacementType,
        host: H,
        listener: impl AdEventSink + 'static,
    ) -> Self {
        let capabilities = CapabilityRegistry::builder()
            .with_overrides(&config.features)
            .build();
        let close_policy = CloseButtonPolicy::from_config(&config);
        Self {
            config,
            placement,
            capabilities,
            close_policy,
            host,
            listener: Box::new(listener),
            dispatcher: UiDispatcher::new(),
            session: None,
            close_timer: None,
            interstitial_timer: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn placement(&self) -> PlacementType {
        self.placement
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// State of the current session's bridge.
    pub fn state(&self) -> Option<State> {
        self.session.as_ref().map(|s| s.bridge.state())
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Replace any current ad with new rich-media content.  The bridge stays
    /// in `Loading` until [`on_page_loaded`](Self::on_page_loaded).
    #[instrument(skip(self, html), fields(bytes = html.len()))]
    pub fn load_rich_media(&mut self, html: &str) -> Result<SessionId> {
        self.dispose();
        let session = Session::new(self.placement, self.capabilities, self.host.layout());
        let id = session.id;
        if let Err(e) = self.host.load_content(html) {
            self.fail(&e);
            return Err(e);
        }
        info!(session = %id, created_at = %session.created_at, "rich-media session created");
        self.session = Some(session);
        self.raise(AdEvent::AdReceived);
        Ok(id)
    }

    /// The web surface finished loading; initialize the bridge.
    #[instrument(skip(self))]
    pub fn on_page_loaded(&mut self) {
        let layout = self.host.layout();
        let Some(session) = self.session.as_mut() else {
            debug!("page loaded without a session");
            return;
        };
        let prev = session.bridge.state();
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = session.bridge.initialize(layout, &mut events);
        self.apply_outcome(prev, outcome, events, None);
    }

    /// Tear the session down, releasing any overlay or resize surface.
    #[instrument(skip(self))]
    pub fn dispose(&mut self) {
        self.cancel_timers();
        let Some(mut session) = self.session.take() else {
            return;
        };
        let state = session.bridge.state();
        let releases = matches!(state, State::Expanded | State::Resized)
            || (self.placement == PlacementType::Interstitial && self.host.layout().overlay_open);
        if releases {
            let outcome = session.bridge.close(&mut Vec::<CreativeEvent>::new());
            for request in outcome
                .requests
                .iter()
                .filter(|r| !matches!(r, HostRequest::DismissAd))
            {
                if let Err(e) = self.host.apply(request) {
                    self.fail(&e);
                }
            }
        }
        info!(session = %session.id, state = %state, "session disposed");
    }

    // -----------------------------------------------------------------------
    // Inbound from the host
    // -----------------------------------------------------------------------

    /// A notification string arrived from the ad's web surface.
    #[instrument(skip(self))]
    pub fn on_script_notify(&mut self, raw: &str) {
        let Some(session) = self.session.as_ref() else {
            debug!("notification without a session");
            return;
        };
        if session.bridge.state() == State::Loading {
            debug!(session = %session.id, "dropping notification while loading");
            return;
        }
        if let Some(command) = Command::parse(raw) {
            self.run_command(command);
        }
    }

    /// A notification from the second surface of a two-part expand.  That
    /// surface never gets the bridge script, so its bridge is always still
    /// loading and the notification is dropped.
    pub fn on_second_surface_notify(&mut self, raw: &str) {
        let Some(bridge) = self.session.as_mut().and_then(|s| s.two_part.as_mut()) else {
            debug!("no second surface");
            return;
        };
        if bridge.state() == State::Loading {
            debug!(raw, "dropping second-surface notification while loading");
            return;
        }
        let mut events: Vec<CreativeEvent> = Vec::new();
        if let Some(outcome) = bridge.notify(raw, &mut events) {
            debug!(state = %outcome.state, "second-surface command handled");
        }
    }

    /// The container's size or position changed.
    pub fn on_layout_changed(&mut self) {
        let layout = self.host.layout();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let prev = session.bridge.state();
        if prev == State::Loading {
            return;
        }
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = session.bridge.update_layout(layout, &mut events);
        self.apply_outcome(prev, outcome, events, None);
    }

    /// The device rotated.  Ignored while expanded with orientation changes
    /// locked.
    #[instrument(skip(self))]
    pub fn on_orientation_changed(&mut self, rotation: Rotation) {
        if let Some(session) = &self.session {
            if !session.bridge.accepts_rotation() {
                debug!(?rotation, "orientation locked while expanded");
                return;
            }
        }
        self.on_layout_changed();
    }

    /// The user tapped a close affordance.
    #[instrument(skip(self))]
    pub fn on_close_tapped(&mut self) {
        match (self.placement, self.state()) {
            (PlacementType::Interstitial, _) => self.close_interstitial(),
            (PlacementType::Inline, Some(State::Expanded | State::Resized)) => {
                self.run_command(Command::Close)
            }
            _ => self.raise(AdEvent::CloseButtonPressed),
        }
    }

    // -----------------------------------------------------------------------
    // Interstitials
    // -----------------------------------------------------------------------

    /// Put the interstitial on screen and start its auto-dismiss timer.
    #[instrument(skip(self))]
    pub fn show_interstitial(&mut self) -> Result<()> {
        if self.placement != PlacementType::Interstitial {
            return Err(MastError::Config(
                "show_interstitial called on an inline ad view".into(),
            ));
        }
        if self.session.is_none() {
            return Err(MastError::NoSession);
        }
        if let Err(e) = self.host.apply(&HostRequest::OpenOverlay) {
            self.fail(&e);
            return Err(e);
        }

        let mut events: Vec<CreativeEvent> = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return Err(MastError::NoSession);
        };
        session.bridge.set_viewable(true, &mut events);
        session.bridge.set_state(State::Default, &mut events);
        let id = session.id;
        self.inject(&events);
        self.prepare_close_button();

        let secs = self.config.interstitial_duration_secs;
        if secs >= 1 {
            let handle = self.dispatcher.handle();
            let timer = self.spawn(async move {
                tokio::time::sleep(Duration::from_secs(u64::from(secs))).await;
                if handle
                    .post(UiEvent::InterstitialTimeout { session: id })
                    .is_err()
                {
                    debug!("dispatcher closed before interstitial timeout");
                }
            });
            match timer {
                Ok(timer) => self.interstitial_timer = Some(timer),
                Err(e) => self.fail(&e),
            }
        }
        info!(session = %id, duration_secs = secs, "interstitial shown");
        Ok(())
    }

    /// Take the interstitial off screen.
    #[instrument(skip(self))]
    pub fn close_interstitial(&mut self) {
        self.cancel_timers();
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.bridge.state() == State::Hidden {
            return;
        }
        for request in [
            HostRequest::CloseOverlay,
            HostRequest::RemoveCloseAffordance {
                surface: Surface::Overlay,
            },
        ] {
            if let Err(e) = self.host.apply(&request) {
                self.fail(&e);
            }
        }
        let mut events: Vec<CreativeEvent> = Vec::new();
        if let Some(session) = self.session.as_mut() {
            session.bridge.set_viewable(false, &mut events);
            session.bridge.set_state(State::Hidden, &mut events);
        }
        self.inject(&events);
    }

    // -----------------------------------------------------------------------
    // Dispatcher
    // -----------------------------------------------------------------------

    /// Apply every queued timer expiry and fetch completion.  Returns how many
    /// items were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.dispatcher.try_next() {
            self.handle_ui_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next queued item and apply it.
    pub async fn process_next(&mut self) {
        if let Some(event) = self.dispatcher.next().await {
            self.handle_ui_event(event);
        }
    }

    fn handle_ui_event(&mut self, event: UiEvent) {
        let current = self.session.as_ref().map(|s| s.id);
        match event {
            UiEvent::CloseButtonDue { session } if Some(session) == current => {
                self.close_timer = None;
                if self.state() == Some(State::Default) {
                    self.render_close_button();
                }
            }
            UiEvent::InterstitialTimeout { session } if Some(session) == current => {
                self.interstitial_timer = None;
                debug!(session = %session, "interstitial duration elapsed");
                self.close_interstitial();
            }
            UiEvent::FetchCompleted {
                session,
                url,
                result,
            } if Some(session) == current => match result {
                Ok(body) => {
                    let mut events: Vec<CreativeEvent> = Vec::new();
                    if let Some(s) = self.session.as_mut() {
                        s.bridge.deliver_response(url, body, &mut events);
                    }
                    self.inject(&events);
                }
                Err(e) => self.fail(&e),
            },
            UiEvent::PictureDownloaded {
                session,
                url,
                result,
            } if Some(session) == current => {
                match result.and_then(|image| self.host.save_picture(&image)) {
                    Ok(()) => info!(session = %session, url = %url, "picture stored"),
                    Err(e) => self.fail(&e),
                }
            }
            stale => debug!(event = ?stale, "discarding UI event for a previous session"),
        }
    }

    // -----------------------------------------------------------------------
    // Outcome handling
    // -----------------------------------------------------------------------

    fn run_command(&mut self, command: Command) {
        let name = command.name();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let prev = session.bridge.state();
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = session.bridge.dispatch(command, &mut events);
        self.apply_outcome(prev, outcome, events, Some(name));
    }

    /// Apply host requests, then confirm to the creative, then tell the app.
    fn apply_outcome(
        &mut self,
        prev: State,
        outcome: Outcome,
        events: Vec<CreativeEvent>,
        command: Option<&'static str>,
    ) {
        let ok = outcome.is_ok();
        let state = outcome.state;
        let frame = outcome.geometry.map(|g| g.current_position);
        for request in outcome.requests {
            self.perform(request);
        }
        self.inject(&events);
        if state != prev {
            self.on_state_changed(prev, state, frame);
        }
        if let Some(command) = command {
            self.raise(AdEvent::ProcessedRichMediaRequest {
                command: command.to_owned(),
                handled: ok,
            });
        }
    }

    fn on_state_changed(&mut self, prev: State, state: State, frame: Option<Rect>) {
        match state {
            State::Expanded => {
                self.cancel_close_timer();
                self.raise(AdEvent::Expanded);
            }
            State::Resized => {
                self.cancel_close_timer();
                if let Some(frame) = frame {
                    self.raise(AdEvent::Resized(frame));
                }
            }
            State::Default => {
                if matches!(prev, State::Expanded | State::Resized) {
                    self.raise(AdEvent::Collapsed);
                }
                if self.placement == PlacementType::Inline {
                    self.prepare_close_button();
                }
            }
            State::Hidden | State::Loading => self.cancel_close_timer(),
        }
    }

    fn perform(&mut self, request: HostRequest) {
        let device_action =
            !request.is_surface() && !matches!(request, HostRequest::FetchData { .. });
        if device_action && !self.listener.allow(&request) {
            debug!(request = ?request, "device action cancelled by the app");
            return;
        }
        let internal = self.config.use_internal_browser;
        let result = match request {
            HostRequest::OpenUrl(url) => self.host.open_url(&url, internal).map(|()| !internal),
            HostRequest::PlayMedia {
                url,
                kind,
                properties,
            } => self.host.play_media(&url, kind, &properties).map(|()| true),
            HostRequest::CreateCalendarEvent(event) => {
                self.host.create_calendar_event(&event).map(|()| false)
            }
            HostRequest::StorePicture(url) => self.spawn_download(url).map(|()| false),
            HostRequest::MakeCall(number) => self.host.make_call(&number).map(|()| true),
            HostRequest::SendSms { recipient, body } => {
                self.host.send_sms(&recipient, &body).map(|()| true)
            }
            HostRequest::SendMail {
                recipient,
                subject,
                body,
            } => self.host.send_mail(&recipient, &subject, &body).map(|()| true),
            HostRequest::OpenMap { poi, fullscreen } => {
                self.host.open_map(&poi, fullscreen).map(|()| true)
            }
            HostRequest::FetchData { url, display: mode } => {
                debug!(url = %url, mode = %mode, "starting data request");
                self.spawn_fetch(url).map(|()| false)
            }
            surface => {
                self.track_surface(&surface);
                self.host.apply(&surface).map(|()| false)
            }
        };
        match result {
            Ok(true) => self.raise(AdEvent::LeavingApplication),
            Ok(false) => {}
            Err(e) => self.fail(&e),
        }
    }

    /// Session bookkeeping that rides on surface requests.
    fn track_surface(&mut self, request: &HostRequest) {
        let layout = self.host.layout();
        match request {
            HostRequest::LoadTwoPartExpand { url, .. } => {
                if let Some(session) = self.session.as_mut() {
                    debug!(session = %session.id, url = %url, "opening two-part surface");
                    session.open_two_part(layout);
                }
            }
            HostRequest::CloseOverlay => {
                if let Some(session) = self.session.as_mut() {
                    if session.close_two_part() {
                        debug!(session = %session.id, "two-part surface discarded");
                    }
                }
            }
            HostRequest::DismissAd => {
                self.cancel_timers();
                self.raise(AdEvent::CloseButtonPressed);
            }
            _ => {}
        }
    }

    fn spawn_fetch(&mut self, url: String) -> Result<()> {
        let session = self.session.as_ref().map(|s| s.id).ok_or(MastError::NoSession)?;
        let fetch = self.host.fetch_text(&url);
        let handle = self.dispatcher.handle();
        // Fetches are not cancelled on dispose; a late result for an old
        // session is discarded by `handle_ui_event`.
        self.spawn(async move {
            let result = fetch.await;
            if handle
                .post(UiEvent::FetchCompleted {
                    session,
                    url,
                    result,
                })
                .is_err()
            {
                debug!("dispatcher closed before fetch completed");
            }
        })?;
        Ok(())
    }

    /// Download a picture off the UI thread; it is saved when the download
    /// comes back through the dispatcher.
    fn spawn_download(&mut self, url: String) -> Result<()> {
        let session = self.session.as_ref().map(|s| s.id).ok_or(MastError::NoSession)?;
        let download = self.host.fetch_bytes(&url);
        let handle = self.dispatcher.handle();
        self.spawn(async move {
            let result = download.await;
            if handle
                .post(UiEvent::PictureDownloaded {
                    session,
                    url,
                    result,
                })
                .is_err()
            {
                debug!("dispatcher closed before picture download completed");
            }
        })?;
        Ok(())
    }

    fn inject(&mut self, events: &[CreativeEvent]) {
        if events.is_empty() {
            return;
        }
        let script = render_all(events);
        if let Err(e) = self.host.inject_script(&script) {
            self.fail(&e);
        }
    }

    // -----------------------------------------------------------------------
    // SDK close button
    // -----------------------------------------------------------------------

    fn prepare_close_button(&mut self) {
        self.cancel_close_timer();
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let state = session.bridge.state();
        let id = session.id;
        let decision = self
            .close_policy
            .decide(state, session.bridge.expand_properties().use_custom_close);
        if matches!(state, State::Expanded | State::Resized) {
            debug!(?decision, "close affordance armed by the bridge");
            return;
        }
        match decision {
            CloseButtonDecision::RenderNow => self.render_close_button(),
            CloseButtonDecision::RenderAfter(delay) => {
                let handle = self.dispatcher.handle();
                let timer = self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if handle.post(UiEvent::CloseButtonDue { session: id }).is_err() {
                        debug!("dispatcher closed before close button was due");
                    }
                });
                match timer {
                    Ok(timer) => self.close_timer = Some(timer),
                    Err(e) => self.fail(&e),
                }
            }
            CloseButtonDecision::CreativeSupplied | CloseButtonDecision::None => {}
        }
    }

    fn render_close_button(&mut self) {
        let layout = self.host.layout();
        let (surface, width, size) = match self.placement {
            PlacementType::Inline => (
                Surface::Inline,
                layout.container.width(),
                self.config.inline_close_button_size,
            ),
            PlacementType::Interstitial => (Surface::Overlay, layout.screen.width, CLOSE_AREA_SIZE),
        };
        self.perform(HostRequest::RenderCloseAffordance {
            surface,
            rect: Rect::new(width - size, 0.0, width, size),
            draw_button: true,
        });
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn spawn<F>(&self, task: F) -> Result<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Ok(runtime.spawn(task)),
            Err(e) => {
                warn!(error = %e, "no async runtime; background task not started");
                Err(MastError::Host("no async runtime".into()))
            }
        }
    }

    fn cancel_close_timer(&mut self) {
        if let Some(timer) = self.close_timer.take() {
            timer.abort();
        }
    }

    fn cancel_timers(&mut self) {
        self.cancel_close_timer();
        if let Some(timer) = self.interstitial_timer.take() {
            timer.abort();
        }
    }

    fn raise(&mut self, event: AdEvent) {
        debug!(event = ?event, "ad event");
        self.listener.on_event(event);
    }

    fn fail(&mut self, err: &MastError) {
        warn!(error = %err, "host collaborator failed");
        self.raise(AdEvent::AdFailed(err.to_string()));
    }
}

impl<H: PlatformHost> Drop for AdView<H> {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}
