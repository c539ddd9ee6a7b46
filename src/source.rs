// Where frames come from. The engine only needs "give me the next RGB frame"
// and the session's fixed resolution.

use image::RgbImage;

use crate::error::Result;

pub trait FrameSource: Send {
    /// Next frame, `Ok(None)` when none is ready yet. Errors are treated as
    /// a missed frame by the capture loop.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Width and height every frame of this session has.
    fn resolution(&self) -> (u32, u32);
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        (**self).next_frame()
    }

    fn resolution(&self) -> (u32, u32) {
        (**self).resolution()
    }
}

/// Endless blank frames of a fixed size. Useful with detectors that ignore
/// pixel content (pointer simulation, tests).
#[derive(Clone, Debug)]
pub struct BlankSource {
    width: u32,
    height: u32,
}

impl BlankSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FrameSource for BlankSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(Some(RgbImage::new(self.width, self.height)))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
