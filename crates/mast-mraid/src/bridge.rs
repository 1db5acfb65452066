// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge state machine.
//
// One `Bridge` per rendered rich-media ad.  Every operation validates against
// the current state, applies the transition, emits creative events to the
// supplied sink, and returns the ordered host requests in an `Outcome`.  A
// refused command leaves the state untouched and produces one `error` event.

use kurbo::{Point, Rect, Size};
use tracing::{debug, info, warn};

use mast_core::{
    CLOSE_AREA_SIZE, CalendarEvent, CreativeEvent, CustomClosePosition, ExpandProperties,
    Feature, GeometrySnapshot, HostLayout, HostRequest, MediaKind, MediaProperties,
    OrientationProperties,
    PlacementType, ResizeProperties, State, Surface,
};

use crate::capabilities::CapabilityRegistry;
use crate::close_area::plan_resize;
use crate::command::{Command, ResizeArgs, ResizePropertiesPayload};
use crate::error::BridgeError;
use crate::geometry;

/// Receiver for creative-bound events.
pub trait EventSink {
    fn emit(&mut self, event: CreativeEvent);
}

impl EventSink for Vec<CreativeEvent> {
    fn emit(&mut self, event: CreativeEvent) {
        self.push(event);
    }
}

/// Result of one bridge operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// State after the operation.
    pub state: State,
    /// Snapshot pushed to the creative, if one was.
    pub geometry: Option<GeometrySnapshot>,
    pub error: Option<BridgeError>,
    /// Host requests in the order they must be applied.
    pub requests: Vec<HostRequest>,
}

impl Outcome {
    fn new(state: State) -> Self {
        Self {
            state,
            geometry: None,
            error: None,
            requests: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Close region currently armed on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affordance {
    surface: Surface,
    rect: Rect,
    draw_button: bool,
}

impl Affordance {
    fn request(&self) -> HostRequest {
        HostRequest::RenderCloseAffordance {
            surface: self.surface,
            rect: self.rect,
            draw_button: self.draw_button,
        }
    }
}

/// The rich-media protocol state machine.
#[derive(Debug, Clone)]
pub struct Bridge {
    placement: PlacementType,
    state: State,
    expand_properties: ExpandProperties,
    resize_properties: ResizeProperties,
    orientation_properties: OrientationProperties,
    capabilities: CapabilityRegistry,
    layout: HostLayout,
    geometry: Option<GeometrySnapshot>,
    viewable: bool,
    /// Set on the secondary bridge of a two-part expand until it completes.
    two_part_pending: bool,
    two_part_url: Option<String>,
    resize_frame: Option<Rect>,
    affordance: Option<Affordance>,
}

impl Bridge {
    /// New session bridge in `Loading`.
    pub fn new(placement: PlacementType, capabilities: CapabilityRegistry, layout: HostLayout) -> Self {
        Self {
            placement,
            state: State::Loading,
            expand_properties: ExpandProperties::default(),
            resize_properties: ResizeProperties::default(),
            orientation_properties: OrientationProperties::default(),
            capabilities,
            layout,
            geometry: None,
            viewable: false,
            two_part_pending: false,
            two_part_url: None,
            resize_frame: None,
            affordance: None,
        }
    }

    /// Bridge for the second surface of a two-part expand.  Its initialization
    /// completes the expand instead of entering `Default`.
    pub fn two_part(
        placement: PlacementType,
        capabilities: CapabilityRegistry,
        layout: HostLayout,
    ) -> Self {
        Self {
            two_part_pending: true,
            ..Self::new(placement, capabilities, layout)
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn placement(&self) -> PlacementType {
        self.placement
    }

    pub fn is_viewable(&self) -> bool {
        self.viewable
    }

    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    pub fn expand_properties(&self) -> &ExpandProperties {
        &self.expand_properties
    }

    pub fn resize_properties(&self) -> &ResizeProperties {
        &self.resize_properties
    }

    pub fn orientation_properties(&self) -> &OrientationProperties {
        &self.orientation_properties
    }

    /// Last snapshot pushed to the creative.
    pub fn geometry(&self) -> Option<&GeometrySnapshot> {
        self.geometry.as_ref()
    }

    /// Frame of the open resize surface, if any.
    pub fn resize_frame(&self) -> Option<Rect> {
        self.resize_frame
    }

    /// URL loaded into the second surface of an active two-part expand.
    pub fn two_part_url(&self) -> Option<&str> {
        self.two_part_url.as_deref()
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Decode and apply a raw notification.  Returns `None` when the string
    /// is malformed and was dropped.
    pub fn notify(&mut self, raw: &str, sink: &mut dyn EventSink) -> Option<Outcome> {
        let command = Command::parse(raw)?;
        Some(self.dispatch(command, sink))
    }

    /// Apply a decoded command.
    pub fn dispatch(&mut self, command: Command, sink: &mut dyn EventSink) -> Outcome {
        let action = command.name();
        debug!(command = action, state = ?self.state, "dispatching");
        let result = match command {
            Command::Close => Ok(self.close(sink)),
            Command::Hide => self.hide(sink),
            Command::Show => Ok(self.show(sink)),
            Command::Expand { properties, url } => self.expand(properties, url, sink),
            Command::Resize(args) => self.resize(args, sink),
            Command::UseCustomClose(flag) => Ok(self.use_custom_close(flag)),
            Command::SetExpandProperties(props) => Ok(self.set_expand_properties(props)),
            Command::SetResizeProperties(payload) => self.set_resize_properties(payload),
            Command::SetOrientationProperties(props) => {
                Ok(self.set_orientation_properties(props))
            }
            Command::Supports(name) => Ok(self.supports(&name, sink)),
            Command::Open(url) => self.open(url),
            Command::PlayMedia {
                kind,
                url,
                properties,
            } => self.play_media(kind, url, properties.unwrap_or_default()),
            Command::CreateCalendarEvent(event) => self.create_calendar_event(event),
            Command::StorePicture(url) => self.store_picture(url),
            Command::MakeCall(number) => self.make_call(number),
            Command::SendSms { recipient, body } => self.send_sms(recipient, body),
            Command::SendMail {
                recipient,
                subject,
                body,
            } => Ok(self.outcome_with(vec![HostRequest::SendMail {
                recipient,
                subject,
                body,
            }])),
            Command::OpenMap { poi, fullscreen } => {
                Ok(self.outcome_with(vec![HostRequest::OpenMap { poi, fullscreen }]))
            }
            Command::Request { url, display } => self.request(url, display),
        };
        match result {
            Ok(outcome) => outcome,
            Err(err) => self.reject(err, sink),
        }
    }

    /// Report the session to the creative and leave `Loading`.
    ///
    /// Sends the capability table, placement type, default expand properties
    /// sized to the screen, geometry and viewability; then enters `Default`
    /// (or completes a pending two-part expand) and fires `ready`.
    pub fn initialize(&mut self, layout: HostLayout, sink: &mut dyn EventSink) -> Outcome {
        if self.state != State::Loading {
            debug!(state = ?self.state, "bridge already initialized");
            return Outcome::new(self.state);
        }
        self.layout = layout;

        sink.emit(CreativeEvent::Supports(self.capabilities.table()));
        sink.emit(CreativeEvent::PlacementType(self.placement));
        self.expand_properties.width = layout.screen.width;
        self.expand_properties.height = layout.screen.height;
        sink.emit(CreativeEvent::ExpandProperties(self.expand_properties.clone()));

        let mut outcome = if self.two_part_pending {
            match self.expand(None, None, sink) {
                Ok(outcome) => outcome,
                Err(err) => self.reject(err, sink),
            }
        } else {
            self.state = State::Default;
            let mut outcome = Outcome::new(self.state);
            outcome.geometry = Some(self.push_geometry(sink));
            sink.emit(CreativeEvent::StateChange(self.state));
            outcome
        };
        self.refresh_viewable(sink);
        sink.emit(CreativeEvent::Ready);
        outcome.state = self.state;
        info!(placement = self.placement.as_str(), state = %self.state, "bridge ready");
        outcome
    }

    /// Host layout changed (size, position, visibility, rotation).  Never
    /// changes state; always pushes the new snapshot.
    pub fn update_layout(&mut self, layout: HostLayout, sink: &mut dyn EventSink) -> Outcome {
        self.layout = layout;
        let mut outcome = Outcome::new(self.state);
        outcome.geometry = Some(self.push_geometry(sink));
        self.refresh_viewable(sink);
        outcome
    }

    /// Host-driven visibility; bypasses command validation.
    pub fn set_viewable(&mut self, viewable: bool, sink: &mut dyn EventSink) {
        if self.viewable != viewable {
            self.viewable = viewable;
            sink.emit(CreativeEvent::ViewableChange(viewable));
        }
    }

    /// Host-driven state; bypasses command validation.
    pub fn set_state(&mut self, state: State, sink: &mut dyn EventSink) {
        debug!(from = %self.state, to = %state, "state set by host");
        self.state = state;
        sink.emit(CreativeEvent::StateChange(state));
    }

    /// Deliver the body of a completed data `request`.
    pub fn deliver_response(&mut self, url: String, body: String, sink: &mut dyn EventSink) {
        sink.emit(CreativeEvent::Response { url, body });
    }

    // -----------------------------------------------------------------------
    // Layout transitions
    // -----------------------------------------------------------------------

    /// Enter `Expanded`, moving the current surface into the overlay or
    /// loading `url` into a second surface there.
    pub fn expand(
        &mut self,
        properties: Option<ExpandProperties>,
        url: Option<String>,
        sink: &mut dyn EventSink,
    ) -> Result<Outcome, BridgeError> {
        const ACTION: &str = "expand";

        if self.placement == PlacementType::Interstitial {
            return Err(BridgeError::illegal(
                ACTION,
                "Can not expand with placementType interstitial.",
            ));
        }
        match self.state {
            State::Loading if !self.two_part_pending => {
                return Err(BridgeError::illegal(
                    ACTION,
                    "Can not expand while state is loading.",
                ));
            }
            State::Expanded => {
                return Err(BridgeError::illegal(
                    ACTION,
                    "Can not expand while state is expanded.",
                ));
            }
            _ => {}
        }
        if let Some(url) = &url {
            if url::Url::parse(url).is_err() {
                return Err(BridgeError::constraint(
                    ACTION,
                    "Unable to retrieve specified URL.",
                ));
            }
        }

        if let Some(props) = properties {
            self.expand_properties = props;
        }

        let mut outcome = Outcome::new(self.state);
        match self.state {
            State::Resized => {
                outcome.requests.push(HostRequest::CloseResizeSurface);
                self.resize_frame = None;
            }
            State::Hidden => {
                outcome.requests.push(HostRequest::SetVisibility(true));
                self.layout.visible = true;
            }
            _ => {}
        }

        let screen = Rect::from_origin_size(Point::ZERO, self.layout.screen);
        if self.two_part_pending {
            // Already showing in the overlay; nothing to move.
            self.two_part_pending = false;
        } else if let Some(url) = url {
            outcome.requests.push(HostRequest::LoadTwoPartExpand {
                url: url.clone(),
                frame: screen,
            });
            self.two_part_url = Some(url);
        } else {
            outcome
                .requests
                .push(HostRequest::MoveToOverlay { frame: screen });
        }
        self.layout.overlay_open = true;

        let affordance = Affordance {
            surface: Surface::Overlay,
            rect: Rect::new(
                self.layout.screen.width - CLOSE_AREA_SIZE,
                0.0,
                self.layout.screen.width,
                CLOSE_AREA_SIZE,
            ),
            draw_button: !self.expand_properties.use_custom_close,
        };
        outcome.requests.push(affordance.request());
        self.affordance = Some(affordance);

        if let Some(rotation) = self.orientation_properties.force_orientation.rotation() {
            outcome.requests.push(HostRequest::ForceOrientation(rotation));
        }

        self.transition(State::Expanded, &mut outcome, sink);
        self.refresh_viewable(sink);
        Ok(outcome)
    }

    /// Open or move the resize surface.
    pub fn resize(&mut self, args: ResizeArgs, sink: &mut dyn EventSink) -> Result<Outcome, BridgeError> {
        const ACTION: &str = "resize";

        if self.placement == PlacementType::Interstitial {
            return Err(BridgeError::illegal(
                ACTION,
                "Can not resize with placementType interstitial.",
            ));
        }
        if matches!(self.state, State::Loading | State::Hidden | State::Expanded) {
            return Err(BridgeError::illegal(
                ACTION,
                "Can not resize loading, hidden or expanded.",
            ));
        }

        let mut props = self.resize_properties.clone();
        match args {
            ResizeArgs::Stored => {}
            ResizeArgs::Size { width, height } => {
                props.width = width;
                props.height = height;
            }
            ResizeArgs::Frame {
                offset_x,
                offset_y,
                width,
                height,
            } => {
                props.offset_x = offset_x;
                props.offset_y = offset_y;
                props.width = width;
                props.height = height;
            }
        }

        let plan = plan_resize(&props, self.layout.default_frame.origin(), self.layout.page)?;
        self.resize_properties = props;

        let mut outcome = Outcome::new(self.state);
        outcome.requests.push(match self.resize_frame {
            Some(_) => HostRequest::MoveResizeSurface { frame: plan.frame },
            None => HostRequest::OpenResizeSurface { frame: plan.frame },
        });
        let affordance = Affordance {
            surface: Surface::Resize,
            rect: plan.close_area,
            draw_button: false,
        };
        outcome.requests.push(affordance.request());
        self.affordance = Some(affordance);
        self.resize_frame = Some(plan.frame);

        debug!(frame = ?plan.frame, offset = ?plan.offset, "resize planned");
        self.transition(State::Resized, &mut outcome, sink);
        Ok(outcome)
    }

    /// Collapse back to `Default` or, for interstitials, dismiss the ad.
    /// Closing from `Default`, `Hidden` or `Loading` only re-confirms geometry.
    pub fn close(&mut self, sink: &mut dyn EventSink) -> Outcome {
        let mut outcome = Outcome::new(self.state);
        let default_frame = self.layout.default_frame;

        match (self.placement, self.state) {
            (PlacementType::Interstitial, s) if s != State::Hidden => {
                outcome.requests.push(HostRequest::CloseOverlay);
                outcome.requests.push(HostRequest::DismissAd);
                self.layout.overlay_open = false;
                self.affordance = None;
                self.set_viewable(false, sink);
                self.transition(State::Hidden, &mut outcome, sink);
            }
            (PlacementType::Inline, State::Expanded) => {
                outcome.requests.push(HostRequest::CloseOverlay);
                outcome.requests.push(HostRequest::RestoreInline {
                    frame: default_frame,
                });
                outcome.requests.push(HostRequest::RemoveCloseAffordance {
                    surface: Surface::Overlay,
                });
                if let Some(url) = self.two_part_url.take() {
                    debug!(url = %url, "discarding two-part surface");
                }
                self.layout.overlay_open = false;
                self.layout.container = default_frame;
                self.affordance = None;
                self.transition(State::Default, &mut outcome, sink);
            }
            (PlacementType::Inline, State::Resized) => {
                outcome.requests.push(HostRequest::CloseResizeSurface);
                outcome.requests.push(HostRequest::RestoreInline {
                    frame: default_frame,
                });
                outcome.requests.push(HostRequest::RemoveCloseAffordance {
                    surface: Surface::Resize,
                });
                self.resize_frame = None;
                self.layout.container = default_frame;
                self.affordance = None;
                self.transition(State::Default, &mut outcome, sink);
            }
            _ => {
                outcome.geometry = Some(self.push_geometry(sink));
                sink.emit(CreativeEvent::StateChange(self.state));
            }
        }
        outcome
    }

    /// `Default` → `Hidden`.  Illegal while a layout change is in effect.
    pub fn hide(&mut self, sink: &mut dyn EventSink) -> Result<Outcome, BridgeError> {
        match self.state {
            State::Hidden => Ok(Outcome::new(self.state)),
            State::Default => {
                let mut outcome = Outcome::new(self.state);
                outcome.requests.push(HostRequest::SetVisibility(false));
                self.layout.visible = false;
                self.state = State::Hidden;
                outcome.state = State::Hidden;
                sink.emit(CreativeEvent::StateChange(State::Hidden));
                self.set_viewable(false, sink);
                Ok(outcome)
            }
            other => Err(BridgeError::illegal(
                "hide",
                format!("Can not hide while state is {other}."),
            )),
        }
    }

    /// `Hidden` → `Default`; otherwise nothing happens.
    pub fn show(&mut self, sink: &mut dyn EventSink) -> Outcome {
        if self.state != State::Hidden {
            return Outcome::new(self.state);
        }
        let mut outcome = Outcome::new(self.state);
        outcome.requests.push(HostRequest::SetVisibility(true));
        self.layout.visible = true;
        self.state = State::Default;
        outcome.state = State::Default;
        sink.emit(CreativeEvent::StateChange(State::Default));
        self.refresh_viewable(sink);
        outcome
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    /// Toggle the creative-drawn close; re-arms an expanded affordance.
    pub fn use_custom_close(&mut self, flag: bool) -> Outcome {
        self.expand_properties.use_custom_close = flag;
        self.rearm_overlay_affordance()
    }

    pub fn set_expand_properties(&mut self, props: ExpandProperties) -> Outcome {
        self.expand_properties = props;
        self.rearm_overlay_affordance()
    }

    pub fn set_resize_properties(
        &mut self,
        payload: ResizePropertiesPayload,
    ) -> Result<Outcome, BridgeError> {
        let custom_close_position = match payload.custom_close_position.as_deref() {
            None | Some("") => CustomClosePosition::default(),
            Some(keyword) => CustomClosePosition::from_keyword(keyword).ok_or_else(|| {
                BridgeError::constraint(
                    "setResizeProperties",
                    format!("Invalid customClosePosition \"{keyword}\"."),
                )
            })?,
        };
        self.resize_properties = ResizeProperties {
            width: payload.width,
            height: payload.height,
            offset_x: payload.offset_x,
            offset_y: payload.offset_y,
            custom_close_position,
            allow_offscreen: payload.allow_offscreen,
        };
        Ok(Outcome::new(self.state))
    }

    /// Store orientation properties; a forced orientation is applied at once
    /// when already expanded.
    pub fn set_orientation_properties(&mut self, props: OrientationProperties) -> Outcome {
        self.orientation_properties = props;
        let mut outcome = Outcome::new(self.state);
        if self.state == State::Expanded {
            if let Some(rotation) = props.force_orientation.rotation() {
                outcome.requests.push(HostRequest::ForceOrientation(rotation));
            }
        }
        outcome
    }

    /// Whether a host rotation should be applied.  Ignored while expanded
    /// with orientation changes disallowed.
    pub fn accepts_rotation(&self) -> bool {
        !(self.state == State::Expanded && !self.orientation_properties.allow_orientation_change)
    }

    fn supports(&mut self, name: &str, sink: &mut dyn EventSink) -> Outcome {
        sink.emit(CreativeEvent::FeatureQuery {
            feature: name.to_owned(),
            supported: self.capabilities.supports_name(name),
        });
        Outcome::new(self.state)
    }

    // -----------------------------------------------------------------------
    // Device actions
    // -----------------------------------------------------------------------

    fn open(&self, url: String) -> Result<Outcome, BridgeError> {
        let url = valid_url("open", url)?;
        Ok(self.outcome_with(vec![HostRequest::OpenUrl(url)]))
    }

    fn play_media(
        &self,
        kind: MediaKind,
        url: String,
        properties: MediaProperties,
    ) -> Result<Outcome, BridgeError> {
        let action = match kind {
            MediaKind::Video => "playVideo",
            MediaKind::Audio => "playAudio",
        };
        let url = valid_url(action, url)?;
        Ok(self.outcome_with(vec![HostRequest::PlayMedia {
            url,
            kind,
            properties,
        }]))
    }

    fn create_calendar_event(&self, event: CalendarEvent) -> Result<Outcome, BridgeError> {
        self.require(Feature::Calendar, "createCalendarEvent")?;
        Ok(self.outcome_with(vec![HostRequest::CreateCalendarEvent(event)]))
    }

    fn store_picture(&self, url: String) -> Result<Outcome, BridgeError> {
        self.require(Feature::StorePicture, "storePicture")?;
        let url = valid_url("storePicture", url)?;
        Ok(self.outcome_with(vec![HostRequest::StorePicture(url)]))
    }

    fn make_call(&self, number: String) -> Result<Outcome, BridgeError> {
        self.require(Feature::Tel, "makeCall")?;
        Ok(self.outcome_with(vec![HostRequest::MakeCall(number)]))
    }

    fn send_sms(&self, recipient: String, body: String) -> Result<Outcome, BridgeError> {
        self.require(Feature::Sms, "sendSms")?;
        Ok(self.outcome_with(vec![HostRequest::SendSms { recipient, body }]))
    }

    fn request(&self, url: String, display: String) -> Result<Outcome, BridgeError> {
        let url = valid_url("request", url)?;
        Ok(self.outcome_with(vec![HostRequest::FetchData { url, display }]))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require(&self, feature: Feature, action: &'static str) -> Result<(), BridgeError> {
        if self.capabilities.supports(feature) {
            Ok(())
        } else {
            Err(BridgeError::unsupported(action))
        }
    }

    fn outcome_with(&self, requests: Vec<HostRequest>) -> Outcome {
        Outcome {
            requests,
            ..Outcome::new(self.state)
        }
    }

    fn reject(&self, err: BridgeError, sink: &mut dyn EventSink) -> Outcome {
        warn!(command = err.action(), state = %self.state, error = %err, "command refused");
        sink.emit(err.to_event());
        Outcome {
            error: Some(err),
            ..Outcome::new(self.state)
        }
    }

    /// Enter `state`, push geometry, then announce the state change.
    fn transition(&mut self, state: State, outcome: &mut Outcome, sink: &mut dyn EventSink) {
        info!(from = %self.state, to = %state, "state transition");
        self.state = state;
        outcome.state = state;
        outcome.geometry = Some(self.push_geometry(sink));
        sink.emit(CreativeEvent::StateChange(state));
    }

    /// Compute and emit the current snapshot, plus `sizeChange` when the
    /// current size differs from the previous snapshot.
    fn push_geometry(&mut self, sink: &mut dyn EventSink) -> GeometrySnapshot {
        let snap = geometry::snapshot(&self.layout, self.state, self.resize_frame);
        let size: Size = snap.current_position.size();
        let resized = self
            .geometry
            .is_none_or(|prev| prev.current_position.size() != size);
        sink.emit(CreativeEvent::Geometry(snap));
        if resized {
            sink.emit(CreativeEvent::SizeChange(size));
        }
        self.geometry = Some(snap);
        snap
    }

    fn refresh_viewable(&mut self, sink: &mut dyn EventSink) {
        let viewable = geometry::is_viewable(&self.layout, self.placement);
        self.set_viewable(viewable, sink);
    }

    fn rearm_overlay_affordance(&mut self) -> Outcome {
        let mut outcome = Outcome::new(self.state);
        if let Some(affordance) = self.affordance.as_mut() {
            let draw = !self.expand_properties.use_custom_close;
            if affordance.surface == Surface::Overlay && affordance.draw_button != draw {
                affordance.draw_button = draw;
                outcome.requests.push(affordance.request());
            }
        }
        outcome
    }
}

fn valid_url(action: &'static str, url: String) -> Result<String, BridgeError> {
    match url::Url::parse(&url) {
        Ok(_) => Ok(url),
        Err(e) => {
            debug!(action, url = %url, error = %e, "rejecting URL");
            Err(BridgeError::constraint(action, "Invalid URL."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mast_core::{ForceOrientation, Rotation};
    use mast_core::config::FeatureOverrides;

    const SCREEN: Size = Size::new(480.0, 800.0);

    fn layout_at(container: Rect) -> HostLayout {
        HostLayout::new(SCREEN, SCREEN, container)
    }

    fn layout() -> HostLayout {
        layout_at(Rect::new(0.0, 0.0, 320.0, 50.0))
    }

    fn ready_with(placement: PlacementType, layout: HostLayout) -> Bridge {
        let mut bridge = Bridge::new(placement, CapabilityRegistry::default(), layout);
        bridge.initialize(layout, &mut Vec::<CreativeEvent>::new());
        bridge
    }

    fn ready(placement: PlacementType) -> Bridge {
        ready_with(placement, layout())
    }

    fn error_of(events: &[CreativeEvent]) -> Option<(&str, &str)> {
        events.iter().find_map(|e| match e {
            CreativeEvent::Error { message, action } => Some((message.as_str(), action.as_str())),
            _ => None,
        })
    }

    #[test]
    fn initialize_reports_session_then_ready() {
        let mut bridge = Bridge::new(PlacementType::Inline, CapabilityRegistry::default(), layout());
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.initialize(layout(), &mut events);

        assert_eq!(outcome.state, State::Default);
        let snap = outcome.geometry.unwrap();
        assert_eq!(snap.max_size, SCREEN);
        assert_eq!(snap.current_position, Rect::new(0.0, 0.0, 320.0, 50.0));

        let expand_props = ExpandProperties {
            width: 480.0,
            height: 800.0,
            ..Default::default()
        };
        assert_eq!(
            events,
            vec![
                CreativeEvent::Supports(CapabilityRegistry::default().table()),
                CreativeEvent::PlacementType(PlacementType::Inline),
                CreativeEvent::ExpandProperties(expand_props),
                CreativeEvent::Geometry(snap),
                CreativeEvent::SizeChange(Size::new(320.0, 50.0)),
                CreativeEvent::StateChange(State::Default),
                CreativeEvent::ViewableChange(true),
                CreativeEvent::Ready,
            ]
        );
    }

    #[test]
    fn second_initialize_is_ignored() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.initialize(layout(), &mut events);
        assert_eq!(outcome.state, State::Default);
        assert!(events.is_empty());
    }

    #[test]
    fn malformed_notification_is_dropped_silently() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        assert!(bridge.notify("resize|wide|tall", &mut events).is_none());
        assert!(bridge.notify("teleport", &mut events).is_none());
        assert!(events.is_empty());
        assert_eq!(bridge.state(), State::Default);
    }

    #[test]
    fn interstitial_resize_is_always_illegal() {
        let mut bridge = ready(PlacementType::Interstitial);
        for state in [
            State::Loading,
            State::Default,
            State::Expanded,
            State::Resized,
            State::Hidden,
        ] {
            let mut events: Vec<CreativeEvent> = Vec::new();
            bridge.set_state(state, &mut events);
            let outcome = bridge.notify("resize|10|10|300|250", &mut events).unwrap();
            assert!(matches!(
                outcome.error,
                Some(BridgeError::IllegalTransition { action: "resize", .. })
            ));
            assert_eq!(outcome.state, state);
            assert_eq!(bridge.state(), state);
            assert!(outcome.requests.is_empty());
        }
    }

    #[test]
    fn oversized_resize_is_a_constraint_violation() {
        let mut bridge = ready(PlacementType::Inline);
        for raw in ["resize|480|100", "resize|100|800", "resize|0|0|600|900"] {
            let mut events: Vec<CreativeEvent> = Vec::new();
            let outcome = bridge.notify(raw, &mut events).unwrap();
            assert!(matches!(
                outcome.error,
                Some(BridgeError::ConstraintViolation { .. })
            ));
            assert_eq!(bridge.state(), State::Default);
            assert_eq!(
                error_of(&events),
                Some(("Size must be smaller than the max size.", "resize"))
            );
        }
    }

    #[test]
    fn undersized_resize_is_a_constraint_violation() {
        let mut bridge = ready(PlacementType::Inline);
        for raw in ["resize|49|100", "resize|100|10"] {
            let mut events: Vec<CreativeEvent> = Vec::new();
            let outcome = bridge.notify(raw, &mut events).unwrap();
            assert!(!outcome.is_ok());
            assert_eq!(bridge.state(), State::Default);
            assert_eq!(
                error_of(&events),
                Some(("Size must be at least the minimum close area size.", "resize"))
            );
        }
    }

    #[test]
    fn offscreen_resize_is_clamped_back_on_screen() {
        let mut bridge = ready_with(
            PlacementType::Inline,
            layout_at(Rect::new(400.0, 0.0, 480.0, 50.0)),
        );
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge
            .notify(r#"setResizeProperties|{"allowOffscreen":false}"#, &mut events)
            .unwrap();
        let outcome = bridge.notify("resize|50|50|300|250", &mut events).unwrap();

        let frame = Rect::new(180.0, 50.0, 480.0, 300.0);
        assert!(outcome.is_ok());
        assert_eq!(outcome.state, State::Resized);
        assert_eq!(outcome.requests[0], HostRequest::OpenResizeSurface { frame });
        assert_eq!(outcome.geometry.unwrap().current_position, frame);
        assert!(events.contains(&CreativeEvent::SizeChange(Size::new(300.0, 250.0))));
        assert!(events.contains(&CreativeEvent::StateChange(State::Resized)));
    }

    #[test]
    fn bottom_right_close_area_is_relative_to_surface() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge
            .notify(
                r#"setResizeProperties|{"customClosePosition":"bottom-right"}"#,
                &mut events,
            )
            .unwrap();
        let outcome = bridge.notify("resize|0|0|300|250", &mut events).unwrap();
        assert_eq!(
            outcome.requests[1],
            HostRequest::RenderCloseAffordance {
                surface: Surface::Resize,
                rect: Rect::new(250.0, 200.0, 300.0, 250.0),
                draw_button: false,
            }
        );
    }

    #[test]
    fn unknown_close_position_is_reported() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge
            .notify(
                r#"setResizeProperties|{"customClosePosition":"left-ish"}"#,
                &mut events,
            )
            .unwrap();
        assert!(!outcome.is_ok());
        assert_eq!(error_of(&events).map(|(_, a)| a), Some("setResizeProperties"));
        assert_eq!(
            bridge.resize_properties().custom_close_position,
            CustomClosePosition::TopRight
        );
    }

    #[test]
    fn second_resize_moves_existing_surface() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("resize|0|0|300|250", &mut events).unwrap();
        let outcome = bridge.notify("resize|0|100|200|200", &mut events).unwrap();
        assert_eq!(
            outcome.requests[0],
            HostRequest::MoveResizeSurface {
                frame: Rect::new(0.0, 100.0, 200.0, 300.0)
            }
        );
        assert_eq!(bridge.state(), State::Resized);
    }

    #[test]
    fn resize_without_arguments_uses_stored_properties() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge
            .notify(
                r#"setResizeProperties|{"width":200,"height":100,"offsetX":10,"offsetY":20}"#,
                &mut events,
            )
            .unwrap();
        let outcome = bridge.notify("resize", &mut events).unwrap();
        assert_eq!(bridge.resize_frame(), Some(Rect::new(10.0, 20.0, 210.0, 120.0)));
        assert_eq!(outcome.state, State::Resized);
    }

    #[test]
    fn expand_from_resized_collapses_resize_surface_first() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("resize|0|0|300|250", &mut events).unwrap();
        let outcome = bridge.notify("expand", &mut events).unwrap();

        assert_eq!(outcome.state, State::Expanded);
        assert_eq!(
            outcome.requests,
            vec![
                HostRequest::CloseResizeSurface,
                HostRequest::MoveToOverlay {
                    frame: Rect::new(0.0, 0.0, 480.0, 800.0)
                },
                HostRequest::RenderCloseAffordance {
                    surface: Surface::Overlay,
                    rect: Rect::new(430.0, 0.0, 480.0, 50.0),
                    draw_button: true,
                },
            ]
        );
        let snap = outcome.geometry.unwrap();
        assert_eq!(snap.max_size, SCREEN);
        assert_eq!(snap.current_position, Rect::new(0.0, 0.0, 480.0, 800.0));
        assert_eq!(bridge.resize_frame(), None);
    }

    #[test]
    fn interstitial_expand_is_refused() {
        let mut bridge = ready(PlacementType::Interstitial);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.notify("expand", &mut events).unwrap();
        assert_eq!(outcome.state, State::Default);
        assert_eq!(
            error_of(&events),
            Some(("Can not expand with placementType interstitial.", "expand"))
        );
    }

    #[test]
    fn expand_while_loading_is_refused() {
        let mut bridge = Bridge::new(PlacementType::Inline, CapabilityRegistry::default(), layout());
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.notify("expand", &mut events).unwrap();
        assert_eq!(outcome.state, State::Loading);
        assert_eq!(bridge.state(), State::Loading);
        assert_eq!(
            error_of(&events),
            Some(("Can not expand while state is loading.", "expand"))
        );
    }

    #[test]
    fn expand_twice_is_refused() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("expand", &mut events).unwrap();
        let outcome = bridge.notify("expand", &mut events).unwrap();
        assert!(matches!(
            outcome.error,
            Some(BridgeError::IllegalTransition { action: "expand", .. })
        ));
        assert_eq!(bridge.state(), State::Expanded);
    }

    #[test]
    fn expand_with_bad_url_leaves_state() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.notify("expand|not a url", &mut events).unwrap();
        assert_eq!(outcome.state, State::Default);
        assert!(outcome.requests.is_empty());
        assert_eq!(
            error_of(&events),
            Some(("Unable to retrieve specified URL.", "expand"))
        );
    }

    #[test]
    fn two_part_expand_then_close_discards_second_surface() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge
            .notify("expand|https://ads.example.com/expanded.html", &mut events)
            .unwrap();
        assert_eq!(
            outcome.requests[0],
            HostRequest::LoadTwoPartExpand {
                url: "https://ads.example.com/expanded.html".into(),
                frame: Rect::new(0.0, 0.0, 480.0, 800.0),
            }
        );
        assert_eq!(bridge.two_part_url(), Some("https://ads.example.com/expanded.html"));

        let closed = bridge.notify("close", &mut events).unwrap();
        assert_eq!(closed.state, State::Default);
        assert_eq!(
            closed.requests,
            vec![
                HostRequest::CloseOverlay,
                HostRequest::RestoreInline {
                    frame: Rect::new(0.0, 0.0, 320.0, 50.0)
                },
                HostRequest::RemoveCloseAffordance {
                    surface: Surface::Overlay
                },
            ]
        );
        assert_eq!(bridge.two_part_url(), None);
        assert_eq!(
            closed.geometry.unwrap().current_position,
            Rect::new(0.0, 0.0, 320.0, 50.0)
        );
    }

    #[test]
    fn two_part_bridge_completes_expand_on_initialize() {
        let mut second =
            Bridge::two_part(PlacementType::Inline, CapabilityRegistry::default(), layout());
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = second.initialize(layout(), &mut events);
        assert_eq!(outcome.state, State::Expanded);
        assert!(
            !outcome
                .requests
                .iter()
                .any(|r| matches!(r, HostRequest::MoveToOverlay { .. }))
        );
        assert_eq!(events.last(), Some(&CreativeEvent::Ready));
    }

    #[test]
    fn close_from_resized_restores_default() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("resize|0|0|300|250", &mut events).unwrap();
        let outcome = bridge.close(&mut events);
        assert_eq!(outcome.state, State::Default);
        assert_eq!(
            outcome.requests,
            vec![
                HostRequest::CloseResizeSurface,
                HostRequest::RestoreInline {
                    frame: Rect::new(0.0, 0.0, 320.0, 50.0)
                },
                HostRequest::RemoveCloseAffordance {
                    surface: Surface::Resize
                },
            ]
        );
        assert_eq!(bridge.resize_frame(), None);
        assert_eq!(
            events.last(),
            Some(&CreativeEvent::StateChange(State::Default))
        );
    }

    #[test]
    fn close_is_idempotent_from_default() {
        let mut bridge = ready(PlacementType::Inline);
        let mut first_events: Vec<CreativeEvent> = Vec::new();
        let first = bridge.close(&mut first_events);
        let mut second_events: Vec<CreativeEvent> = Vec::new();
        let second = bridge.close(&mut second_events);

        assert_eq!(first, second);
        assert_eq!(first_events, second_events);
        assert_eq!(first.state, State::Default);
        assert!(first.requests.is_empty());
        assert!(first.geometry.is_some());
        assert!(first_events.contains(&CreativeEvent::StateChange(State::Default)));
    }

    #[test]
    fn interstitial_close_dismisses_ad() {
        let mut bridge = ready(PlacementType::Interstitial);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.set_viewable(true, &mut events);
        let outcome = bridge.notify("close", &mut events).unwrap();
        assert_eq!(outcome.state, State::Hidden);
        assert_eq!(
            outcome.requests,
            vec![HostRequest::CloseOverlay, HostRequest::DismissAd]
        );
        assert!(!bridge.is_viewable());
        assert!(events.contains(&CreativeEvent::ViewableChange(false)));
    }

    #[test]
    fn update_layout_is_deterministic_and_keeps_state() {
        let mut bridge = ready(PlacementType::Inline);
        let moved = layout_at(Rect::new(0.0, 300.0, 320.0, 350.0))
            .with_default_frame(Rect::new(0.0, 0.0, 320.0, 50.0));
        let mut events: Vec<CreativeEvent> = Vec::new();
        let a = bridge.update_layout(moved, &mut events);
        let b = bridge.update_layout(moved, &mut events);
        assert_eq!(a.geometry, b.geometry);
        assert_eq!(a.state, State::Default);
        // Same size, new position: geometry is pushed but no sizeChange.
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, CreativeEvent::SizeChange(_)))
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, CreativeEvent::Geometry(_)))
                .count(),
            2
        );
    }

    #[test]
    fn layout_size_change_is_announced() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.update_layout(layout_at(Rect::new(0.0, 0.0, 320.0, 100.0)), &mut events);
        assert!(events.contains(&CreativeEvent::SizeChange(Size::new(320.0, 100.0))));
    }

    #[test]
    fn hide_and_show_toggle_visibility() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let hidden = bridge.notify("hide", &mut events).unwrap();
        assert_eq!(hidden.state, State::Hidden);
        assert_eq!(hidden.requests, vec![HostRequest::SetVisibility(false)]);
        assert!(!bridge.is_viewable());

        let again = bridge.notify("hide", &mut events).unwrap();
        assert!(again.is_ok() && again.requests.is_empty());

        let shown = bridge.notify("show", &mut events).unwrap();
        assert_eq!(shown.state, State::Default);
        assert_eq!(shown.requests, vec![HostRequest::SetVisibility(true)]);
        assert!(bridge.is_viewable());
    }

    #[test]
    fn expand_from_hidden_makes_container_visible_again() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("hide", &mut events).unwrap();
        assert!(!bridge.layout().visible);

        events.clear();
        let expanded = bridge.notify("expand", &mut events).unwrap();
        assert_eq!(expanded.state, State::Expanded);
        assert_eq!(expanded.requests[0], HostRequest::SetVisibility(true));
        assert!(bridge.layout().visible);
        assert!(bridge.is_viewable());
        assert!(events.contains(&CreativeEvent::ViewableChange(true)));

        let closed = bridge.notify("close", &mut events).unwrap();
        assert_eq!(closed.state, State::Default);
        assert!(bridge.is_viewable());
        assert!(bridge.layout().visible);
    }

    #[test]
    fn hide_while_expanded_is_illegal() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("expand", &mut events).unwrap();
        let outcome = bridge.notify("hide", &mut events).unwrap();
        assert!(matches!(
            outcome.error,
            Some(BridgeError::IllegalTransition { action: "hide", .. })
        ));
        assert_eq!(bridge.state(), State::Expanded);
    }

    #[test]
    fn use_custom_close_rearms_expanded_affordance() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("expand", &mut events).unwrap();
        let outcome = bridge.notify("useCustomClose|true", &mut events).unwrap();
        assert_eq!(
            outcome.requests,
            vec![HostRequest::RenderCloseAffordance {
                surface: Surface::Overlay,
                rect: Rect::new(430.0, 0.0, 480.0, 50.0),
                draw_button: false,
            }]
        );
        let unchanged = bridge.notify("useCustomClose|true", &mut events).unwrap();
        assert!(unchanged.requests.is_empty());
    }

    #[test]
    fn custom_close_from_expand_properties() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge
            .notify(r#"expand|{"useCustomClose":true}|"#, &mut events)
            .unwrap();
        assert!(outcome.requests.contains(&HostRequest::RenderCloseAffordance {
            surface: Surface::Overlay,
            rect: Rect::new(430.0, 0.0, 480.0, 50.0),
            draw_button: false,
        }));
    }

    #[test]
    fn forced_orientation_applies_when_expanded() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let before = bridge
            .notify(
                r#"setOrientationProperties|{"forceOrientation":"landscape","allowOrientationChange":false}"#,
                &mut events,
            )
            .unwrap();
        assert!(before.requests.is_empty());
        assert!(bridge.accepts_rotation());

        let expanded = bridge.notify("expand", &mut events).unwrap();
        assert_eq!(
            expanded.requests.last(),
            Some(&HostRequest::ForceOrientation(Rotation::LandscapeLeft))
        );
        assert!(!bridge.accepts_rotation());

        let props = OrientationProperties {
            allow_orientation_change: true,
            force_orientation: ForceOrientation::Portrait,
        };
        let outcome = bridge.dispatch(Command::SetOrientationProperties(props), &mut events);
        assert_eq!(
            outcome.requests,
            vec![HostRequest::ForceOrientation(Rotation::PortraitUp)]
        );
        assert!(bridge.accepts_rotation());
    }

    #[test]
    fn calendar_is_unsupported_by_default() {
        let raw = r#"createCalendarEvent|{"description":"Sale","start":"2026-11-27T09:00:00Z"}"#;
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.notify(raw, &mut events).unwrap();
        assert!(matches!(outcome.error, Some(BridgeError::Unsupported { .. })));
        assert_eq!(
            error_of(&events),
            Some(("Not supported by platform.", "createCalendarEvent"))
        );

        let caps = CapabilityRegistry::builder()
            .with_overrides(&FeatureOverrides {
                calendar: Some(true),
                ..Default::default()
            })
            .build();
        let mut enabled = Bridge::new(PlacementType::Inline, caps, layout());
        enabled.initialize(layout(), &mut Vec::<CreativeEvent>::new());
        let outcome = enabled.notify(raw, &mut Vec::<CreativeEvent>::new()).unwrap();
        assert!(matches!(
            outcome.requests.as_slice(),
            [HostRequest::CreateCalendarEvent(_)]
        ));
    }

    #[test]
    fn device_actions_become_host_requests() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let open = bridge.notify("open|https://shop.example.com", &mut events).unwrap();
        assert_eq!(
            open.requests,
            vec![HostRequest::OpenUrl("https://shop.example.com".into())]
        );
        let call = bridge.notify("makeCall|5551234", &mut events).unwrap();
        assert_eq!(call.requests, vec![HostRequest::MakeCall("5551234".into())]);
        let video = bridge
            .notify("playVideo|https://cdn.example.com/v.mp4", &mut events)
            .unwrap();
        assert!(matches!(
            video.requests.as_slice(),
            [HostRequest::PlayMedia {
                kind: MediaKind::Video,
                ..
            }]
        ));
        let looped = bridge
            .notify(
                r#"playAudio|https://cdn.example.com/a.mp3|{"loop":true}"#,
                &mut events,
            )
            .unwrap();
        let [HostRequest::PlayMedia { properties, .. }] = looped.requests.as_slice() else {
            panic!("expected a media request");
        };
        assert!(properties.looping);
        let fetch = bridge
            .notify("request|https://ads.example.com/feed|proxy", &mut events)
            .unwrap();
        assert!(matches!(
            fetch.requests.as_slice(),
            [HostRequest::FetchData { .. }]
        ));
        assert!(events.is_empty());
        assert_eq!(bridge.state(), State::Default);
    }

    #[test]
    fn invalid_open_url_is_reported() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        let outcome = bridge.notify("open|::nope", &mut events).unwrap();
        assert!(outcome.requests.is_empty());
        assert_eq!(error_of(&events), Some(("Invalid URL.", "open")));
    }

    #[test]
    fn sms_refused_when_disabled() {
        let caps = CapabilityRegistry::builder().set(Feature::Sms, false).build();
        let mut bridge = Bridge::new(PlacementType::Inline, caps, layout());
        bridge.initialize(layout(), &mut Vec::<CreativeEvent>::new());
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("sendSms|5551234|hi", &mut events).unwrap();
        assert_eq!(
            error_of(&events),
            Some(("Not supported by platform.", "sendSms"))
        );
    }

    #[test]
    fn supports_query_answers_creative() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.notify("supports|tel", &mut events).unwrap();
        bridge.notify("supports|calendar", &mut events).unwrap();
        assert_eq!(
            events,
            vec![
                CreativeEvent::FeatureQuery {
                    feature: "tel".into(),
                    supported: true
                },
                CreativeEvent::FeatureQuery {
                    feature: "calendar".into(),
                    supported: false
                },
            ]
        );
    }

    #[test]
    fn response_is_forwarded() {
        let mut bridge = ready(PlacementType::Inline);
        let mut events: Vec<CreativeEvent> = Vec::new();
        bridge.deliver_response("https://a.example".into(), "{}".into(), &mut events);
        assert_eq!(
            events,
            vec![CreativeEvent::Response {
                url: "https://a.example".into(),
                body: "{}".into()
            }]
        );
    }
}
