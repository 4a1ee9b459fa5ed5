//! Camera capture glue.
//!
//! JS owns the animation-frame cadence: it awaits [`request_camera`],
//! hands the stream to [`CameraScanner::begin`], then calls
//! [`CameraScanner::poll`] once per frame until it returns text or the
//! user stops. The actual loop/cancellation semantics live in
//! `agree_qr::scan`; this module only turns a video element into a
//! [`FrameSource`] and guarantees the media tracks are stopped on
//! teardown.

use agree_qr::{CaptureError, Frame, FrameSource, ScanHandle, ScanPoll, ScanTask};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints,
};

/// HTMLMediaElement.HAVE_ENOUGH_DATA.
const HAVE_ENOUGH_DATA: u16 = 4;

/// Ask for the rear camera. Denial is reported once; the caller offers
/// the image-upload path as fallback instead of retrying.
#[wasm_bindgen]
pub async fn request_camera() -> Result<MediaStream, JsValue> {
    let unavailable = || JsValue::from_str("CaptureUnavailable: camera access denied");

    let window = web_sys::window().ok_or_else(unavailable)?;
    let devices = window.navigator().media_devices().map_err(|_| unavailable())?;

    let constraints = MediaStreamConstraints::new();
    let video = js_sys::Object::new();
    js_sys::Reflect::set(&video, &"facingMode".into(), &"environment".into())?;
    constraints.set_video(&video.into());

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|_| unavailable())?;
    let stream = JsFuture::from(promise).await.map_err(|_| unavailable())?;
    stream.dyn_into::<MediaStream>().map_err(|_| unavailable())
}

/// Samples the current video frame through a scratch canvas.
struct CanvasFrameSource {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    stream: Option<MediaStream>,
}

impl CanvasFrameSource {
    fn grab(&self) -> Result<Option<Frame>, JsValue> {
        if self.video.ready_state() < HAVE_ENOUGH_DATA {
            return Ok(None);
        }

        let width = self.video.video_width();
        let height = self.video.video_height();
        if width == 0 || height == 0 {
            return Ok(None);
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.draw_image_with_html_video_element(&self.video, 0.0, 0.0)?;
        let image_data = ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;

        Ok(Some(Frame {
            width,
            height,
            rgba: image_data.data().0,
        }))
    }
}

impl FrameSource for CanvasFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        self.grab().map_err(|_| CaptureError::Unavailable)
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
        self.video.set_src_object(None);
    }
}

/// One camera scan session.
#[wasm_bindgen]
pub struct CameraScanner {
    task: Option<ScanTask<CanvasFrameSource>>,
    handle: Option<ScanHandle>,
}

impl Default for CameraScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CameraScanner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            task: None,
            handle: None,
        }
    }

    /// Wire an acquired stream to the video element and start scanning.
    pub fn begin(
        &mut self,
        stream: MediaStream,
        video: HtmlVideoElement,
        canvas: HtmlCanvasElement,
    ) {
        // A previous session, if any, is torn down first.
        self.stop();

        video.set_src_object(Some(&stream));
        let task = ScanTask::new(CanvasFrameSource {
            video,
            canvas,
            stream: Some(stream),
        });
        self.handle = Some(task.handle());
        self.task = Some(task);
    }

    /// One animation-frame step. `Some(text)` when a code was decoded;
    /// the camera is released by then.
    pub fn poll(&mut self) -> Result<Option<String>, JsValue> {
        let task = match self.task.as_mut() {
            Some(task) => task,
            None => return Ok(None),
        };
        match task.poll_step() {
            Ok(ScanPoll::Pending) => Ok(None),
            Ok(ScanPoll::Found(text)) => {
                self.task = None;
                Ok(Some(text))
            }
            Ok(ScanPoll::Cancelled) => {
                self.task = None;
                Ok(None)
            }
            Err(err) => {
                self.task = None;
                Err(JsValue::from_str(&err.to_string()))
            }
        }
    }

    /// Stop scanning and release the capture device.
    pub fn stop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.stop();
        }
        // Dropping the task releases the media tracks.
        self.task = None;
        self.handle = None;
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}
