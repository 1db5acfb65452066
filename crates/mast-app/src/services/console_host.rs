// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host that prints what a real platform would do.  Surface requests are
// simulated by the stub host so the layout stays consistent; device actions
// are printed and reported as successful.

use mast_core::error::{MastError, Result};
use mast_core::{CalendarEvent, HostLayout, HostRequest, MediaKind, MediaProperties};
use mast_host::traits::*;
use mast_host::StubHost;

pub struct ConsoleHost {
    inner: StubHost,
}

impl ConsoleHost {
    pub fn new(layout: HostLayout) -> Self {
        Self {
            inner: StubHost::new(layout),
        }
    }

    pub fn set_layout(&mut self, layout: HostLayout) {
        self.inner.set_layout(layout);
    }

    fn action(&self, what: std::fmt::Arguments<'_>) -> Result<()> {
        println!("  device  {what}");
        Ok(())
    }
}

impl PlatformHost for ConsoleHost {
    fn platform_name(&self) -> &str {
        "console"
    }
}

impl SurfaceHost for ConsoleHost {
    fn load_content(&mut self, html: &str) -> Result<()> {
        println!("  content {} bytes", html.len());
        self.inner.load_content(html)
    }

    fn apply(&mut self, request: &HostRequest) -> Result<()> {
        if !request.is_surface() {
            return Err(MastError::Host(format!("not a surface request: {request:?}")));
        }
        println!("  surface {request:?}");
        self.inner.apply(request)
    }

    fn inject_script(&mut self, script: &str) -> Result<()> {
        for statement in script.split_inclusive(';') {
            println!("  script  {statement}");
        }
        self.inner.inject_script(script)
    }

    fn layout(&self) -> HostLayout {
        self.inner.layout()
    }
}

impl NativeBrowser for ConsoleHost {
    fn open_url(&mut self, url: &str, internal: bool) -> Result<()> {
        let browser = if internal { "internal" } else { "system" };
        self.action(format_args!("open {url} in {browser} browser"))
    }
}

impl NativeMedia for ConsoleHost {
    fn play_media(
        &mut self,
        url: &str,
        kind: MediaKind,
        properties: &MediaProperties,
    ) -> Result<()> {
        let style = &properties.start_style;
        self.action(format_args!("play {kind:?} {url} ({style}, loop: {})", properties.looping))
    }
}

impl NativeTelephony for ConsoleHost {
    fn make_call(&mut self, number: &str) -> Result<()> {
        self.action(format_args!("call {number}"))
    }

    fn send_sms(&mut self, recipient: &str, body: &str) -> Result<()> {
        self.action(format_args!("sms to {recipient}: {body}"))
    }
}

impl NativeMail for ConsoleHost {
    fn send_mail(&mut self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        self.action(format_args!("mail to {recipient} [{subject}]: {body}"))
    }
}

impl NativeCalendar for ConsoleHost {
    fn create_calendar_event(&mut self, event: &CalendarEvent) -> Result<()> {
        self.action(format_args!(
            "calendar \"{}\" at {}",
            event.description,
            event.start.to_rfc3339()
        ))
    }
}

impl NativePhotoLibrary for ConsoleHost {
    fn save_picture(&mut self, image: &[u8]) -> Result<()> {
        self.action(format_args!("save picture ({} bytes)", image.len()))
    }
}

impl NativeMaps for ConsoleHost {
    fn open_map(&mut self, poi: &str, fullscreen: bool) -> Result<()> {
        self.action(format_args!("map {poi} (fullscreen: {fullscreen})"))
    }
}

impl NativeNetwork for ConsoleHost {
    fn fetch_text(&self, url: &str) -> FetchFuture {
        let err = MastError::Network(format!("console host is offline: {url}"));
        Box::pin(async move { Err(err) })
    }

    fn fetch_bytes(&self, url: &str) -> DownloadFuture {
        let err = MastError::Network(format!("console host is offline: {url}"));
        Box::pin(async move { Err(err) })
    }
}
