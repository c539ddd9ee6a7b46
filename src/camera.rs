// Opens a webcam and hands frames to the capture loop as RGB images.
// Visual expectation: every `next_frame()` is the newest camera picture,
// unmirrored; the engine flips it for the selfie view.
//
// nokhwa's Camera stays on the thread that opened it, so the camera gets a
// small thread of its own and frames cross over a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use image::RgbImage;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use crate::error::{Error, Result};
use crate::source::FrameSource;

/// How long `next_frame` waits before reporting "no frame yet".
const FRAME_WAIT: Duration = Duration::from_millis(100);

pub struct CameraCapture {
    frames: Receiver<Result<RgbImage>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution. Failing here is
    /// the signal for the caller to fall back to keyboard input.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded::<Result<(u32, u32)>>(1);
        let (frame_tx, frame_rx) = bounded::<Result<RgbImage>>(2);
        let stop = Arc::new(AtomicBool::new(false));

        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name("spellcaster-camera".into())
            .spawn(move || camera_thread(index, width, height, ready_tx, frame_tx, thread_stop))
            .map_err(|e| Error::CameraInit(format!("spawn camera thread: {e}")))?;

        let (w, h) = match ready_rx.recv() {
            Ok(Ok(res)) => res,
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = handle.join();
                return Err(Error::CameraInit("camera thread exited during setup".into()));
            }
        };

        Ok(Self {
            frames: frame_rx,
            stop,
            handle: Some(handle),
            width: w,
            height: h,
        })
    }
}

fn open_camera(index: u32, width: u32, height: u32) -> Result<Camera> {
    let fmt = CameraFormat::new(
        Resolution::new(width, height),
        FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
        30,                // target FPS
    );
    let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

    let mut cam = Camera::new(CameraIndex::Index(index), req)
        .map_err(|e| Error::CameraInit(format!("create camera {index}: {e}")))?;
    cam.open_stream()
        .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;
    Ok(cam)
}

fn grab(cam: &mut Camera) -> Result<RgbImage> {
    // Blocks until the camera has a new frame.
    let frame = cam
        .frame()
        .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;
    let decoded = frame
        .decode_image::<RgbFormat>()
        .map_err(|e| Error::CameraFrame(format!("decode RGB: {e}")))?;

    // Rebuild as our own RgbImage so nokhwa's image version doesn't leak out.
    let (w, h) = decoded.dimensions();
    RgbImage::from_raw(w, h, decoded.into_raw())
        .ok_or_else(|| Error::CameraFrame("short RGB buffer".into()))
}

fn camera_thread(
    index: u32,
    width: u32,
    height: u32,
    ready: Sender<Result<(u32, u32)>>,
    frames: Sender<Result<RgbImage>>,
    stop: Arc<AtomicBool>,
) {
    let mut cam = match open_camera(index, width, height) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    // The stream might pick a slightly different resolution.
    let actual = cam.resolution();
    let session = (actual.width(), actual.height());
    log::info!("camera {index} streaming at {}x{}", session.0, session.1);
    if ready.send(Ok(session)).is_err() {
        return;
    }

    while !stop.load(Ordering::Acquire) {
        let res = grab(&mut cam).and_then(|img| {
            if img.dimensions() == session {
                Ok(img)
            } else {
                Err(Error::CameraFrame(format!(
                    "frame is {}x{}, session is {}x{}",
                    img.width(),
                    img.height(),
                    session.0,
                    session.1
                )))
            }
        });
        // Full channel: the consumer is behind, this frame is dropped.
        if let Err(crossbeam_channel::TrySendError::Disconnected(_)) = frames.try_send(res) {
            break;
        }
    }

    if let Err(e) = cam.stop_stream() {
        log::warn!("stopping camera stream: {e}");
    }
    log::info!("camera {index} released");
}

impl FrameSource for CameraCapture {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut latest = match self.frames.recv_timeout(FRAME_WAIT) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(Error::CameraFrame("camera thread stopped".into()));
            }
        };
        while let Ok(newer) = self.frames.try_recv() {
            latest = newer;
        }
        latest.map(Some)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
