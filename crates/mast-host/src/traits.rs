// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host adapter.

use std::future::Future;
use std::pin::Pin;

use mast_core::error::Result;
use mast_core::{CalendarEvent, HostLayout, HostRequest, MediaKind, MediaProperties};

/// Everything an ad view needs from the embedding platform.
///
/// Hosts that lack a device feature return `MastError::PlatformUnavailable`
/// from the corresponding method.
pub trait PlatformHost:
    SurfaceHost
    + NativeBrowser
    + NativeMedia
    + NativeTelephony
    + NativeMail
    + NativeCalendar
    + NativePhotoLibrary
    + NativeMaps
    + NativeNetwork
{
    /// Human-readable platform name (e.g. "Windows Phone 8", "console").
    fn platform_name(&self) -> &str;
}

/// The web surface and the containers around it.
pub trait SurfaceHost {
    /// Load rich-media HTML into the ad's web surface.
    fn load_content(&mut self, html: &str) -> Result<()>;

    /// Apply one surface request (overlay, resize surface, close affordance...).
    fn apply(&mut self, request: &HostRequest) -> Result<()>;

    /// Run script in the ad's web surface.
    fn inject_script(&mut self, script: &str) -> Result<()>;

    /// Current layout facts.
    fn layout(&self) -> HostLayout;
}

/// Open a URL outside the ad.
pub trait NativeBrowser {
    /// `internal` selects the SDK's in-app browser over the system one.
    fn open_url(&mut self, url: &str, internal: bool) -> Result<()>;
}

pub trait NativeMedia {
    fn play_media(
        &mut self,
        url: &str,
        kind: MediaKind,
        properties: &MediaProperties,
    ) -> Result<()>;
}

pub trait NativeTelephony {
    fn make_call(&mut self, number: &str) -> Result<()>;

    /// Open the SMS composer prefilled with `body`.
    fn send_sms(&mut self, recipient: &str, body: &str) -> Result<()>;
}

pub trait NativeMail {
    fn send_mail(&mut self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

pub trait NativeCalendar {
    fn create_calendar_event(&mut self, event: &CalendarEvent) -> Result<()>;
}

/// Device photo library.  The image is downloaded through
/// [`NativeNetwork::fetch_bytes`] first; saving runs on the UI thread.
pub trait NativePhotoLibrary {
    fn save_picture(&mut self, image: &[u8]) -> Result<()>;
}

pub trait NativeMaps {
    fn open_map(&mut self, poi: &str, fullscreen: bool) -> Result<()>;
}

/// Boxed future returned by [`NativeNetwork::fetch_text`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<String>> + Send + 'static>>;

/// Boxed future returned by [`NativeNetwork::fetch_bytes`].
pub type DownloadFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'static>>;

/// Background downloads for the creative's `request` and `storePicture`
/// commands.  The futures must not borrow the host; the ad view runs them on
/// the async runtime and marshals the result back.
pub trait NativeNetwork {
    fn fetch_text(&self, url: &str) -> FetchFuture;

    fn fetch_bytes(&self, url: &str) -> DownloadFuture;
}
