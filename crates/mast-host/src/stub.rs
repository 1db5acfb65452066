// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub host for desktop/CI builds where no native ad surface exists.
//
// Surface requests are simulated against an in-memory layout and recorded.
// Device actions return `PlatformUnavailable`, except saving pictures, which
// go to an in-memory library.  Downloads answer from tables of canned
// responses.

use std::collections::HashMap;

use kurbo::Rect;
use tracing::{debug, warn};

use mast_core::error::{MastError, Result};
use mast_core::{CalendarEvent, HostLayout, HostRequest, MediaKind, MediaProperties};

use crate::traits::*;

/// In-memory host.
#[derive(Debug, Clone)]
pub struct StubHost {
    layout: HostLayout,
    /// Frame the container occupied before it was moved into an overlay or
    /// resize surface.
    inline_frame: Rect,
    content: Option<String>,
    applied: Vec<HostRequest>,
    scripts: Vec<String>,
    responses: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    pictures: Vec<Vec<u8>>,
}

impl StubHost {
    pub fn new(layout: HostLayout) -> Self {
        Self {
            layout,
            inline_frame: layout.container,
            content: None,
            applied: Vec::new(),
            scripts: Vec::new(),
            responses: HashMap::new(),
            images: HashMap::new(),
            pictures: Vec::new(),
        }
    }

    /// Register a canned body for `fetch_text`.
    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// Register canned bytes for `fetch_bytes`.
    pub fn with_image(mut self, url: impl Into<String>, image: impl Into<Vec<u8>>) -> Self {
        self.images.insert(url.into(), image.into());
        self
    }

    /// Replace the layout, as if the page had been re-laid out.
    pub fn set_layout(&mut self, layout: HostLayout) {
        self.layout = layout;
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Surface requests applied so far, in order.
    pub fn applied(&self) -> &[HostRequest] {
        &self.applied
    }

    /// Scripts injected so far, in order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Pictures saved to the in-memory library.
    pub fn pictures(&self) -> &[Vec<u8>] {
        &self.pictures
    }

    pub fn clear_records(&mut self) {
        self.applied.clear();
        self.scripts.clear();
    }
}

impl PlatformHost for StubHost {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl SurfaceHost for StubHost {
    fn load_content(&mut self, html: &str) -> Result<()> {
        debug!(bytes = html.len(), "stub host loaded content");
        self.content = Some(html.to_owned());
        Ok(())
    }

    fn apply(&mut self, request: &HostRequest) -> Result<()> {
        match request {
            HostRequest::OpenOverlay => self.layout.overlay_open = true,
            HostRequest::MoveToOverlay { frame } | HostRequest::LoadTwoPartExpand { frame, .. } => {
                self.inline_frame = self.layout.container;
                self.layout.overlay_open = true;
                self.layout.container = *frame;
            }
            HostRequest::CloseOverlay => self.layout.overlay_open = false,
            HostRequest::OpenResizeSurface { frame } => {
                self.inline_frame = self.layout.container;
                self.layout.container = *frame;
            }
            HostRequest::MoveResizeSurface { frame } => self.layout.container = *frame,
            HostRequest::CloseResizeSurface => self.layout.container = self.inline_frame,
            HostRequest::RestoreInline { frame } => self.layout.container = *frame,
            HostRequest::SetVisibility(visible) => self.layout.visible = *visible,
            HostRequest::ForceOrientation(rotation) => self.layout.rotation = *rotation,
            HostRequest::RenderCloseAffordance { .. }
            | HostRequest::RemoveCloseAffordance { .. }
            | HostRequest::DismissAd => {}
            other => {
                warn!(request = ?other, "device action sent to SurfaceHost::apply");
                return Err(MastError::Host(format!("not a surface request: {other:?}")));
            }
        }
        self.applied.push(request.clone());
        Ok(())
    }

    fn inject_script(&mut self, script: &str) -> Result<()> {
        self.scripts.push(script.to_owned());
        Ok(())
    }

    fn layout(&self) -> HostLayout {
        self.layout
    }
}

impl NativeBrowser for StubHost {
    fn open_url(&mut self, _url: &str, _internal: bool) -> Result<()> {
        warn!("NativeBrowser::open_url called on stub host");
        Err(MastError::PlatformUnavailable)
    }
}

impl NativeMedia for StubHost {
    fn play_media(
        &mut self,
        _url: &str,
        _kind: MediaKind,
        _properties: &MediaProperties,
    ) -> Result<()> {
        warn!("NativeMedia::play_media called on stub host");
        Err(MastError::PlatformUnavailable)
    }
}

impl NativeTelephony for StubHost {
    fn make_call(&mut self, _number: &str) -> Result<()> {
        warn!("NativeTelephony::make_call called on stub host");
        Err(MastError::PlatformUnavailable)
    }

    fn send_sms(&mut self, _recipient: &str, _body: &str) -> Result<()> {
        Err(MastError::PlatformUnavailable)
    }
}

impl NativeMail for StubHost {
    fn send_mail(&mut self, _recipient: &str, _subject: &str, _body: &str) -> Result<()> {
        warn!("NativeMail::send_mail called on stub host");
        Err(MastError::PlatformUnavailable)
    }
}

impl NativeCalendar for StubHost {
    fn create_calendar_event(&mut self, _event: &CalendarEvent) -> Result<()> {
        Err(MastError::PlatformUnavailable)
    }
}

impl NativePhotoLibrary for StubHost {
    fn save_picture(&mut self, image: &[u8]) -> Result<()> {
        debug!(bytes = image.len(), "stub host saved picture");
        self.pictures.push(image.to_vec());
        Ok(())
    }
}

impl NativeMaps for StubHost {
    fn open_map(&mut self, _poi: &str, _fullscreen: bool) -> Result<()> {
        Err(MastError::PlatformUnavailable)
    }
}

impl NativeNetwork for StubHost {
    fn fetch_text(&self, url: &str) -> FetchFuture {
        let result = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| MastError::Network(format!("no canned response for {url}")));
        Box::pin(async move { result })
    }

    fn fetch_bytes(&self, url: &str) -> DownloadFuture {
        let result = self
            .images
            .get(url)
            .cloned()
            .ok_or_else(|| MastError::Network(format!("no canned image for {url}")));
        Box::pin(async move { result })
    }
}
