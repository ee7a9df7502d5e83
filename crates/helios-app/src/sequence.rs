//! Streams rendered frames into an infinitely looping animated GIF.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::error::RunError;

/// NeuQuant sampling factor; 1 is best quality and slowest, 30 the fastest.
const ENCODER_SPEED: i32 = 10;

struct Sink {
    out: BufWriter<File>,
    error: Option<io::Error>,
}

/// Writer handed to the encoder. The assembler keeps a second handle so the
/// trailer write and the final flush can be checked after the encoder is dropped,
/// since the encoder swallows errors raised from its own `Drop`.
#[derive(Clone)]
struct SharedSink(Rc<RefCell<Sink>>);

impl SharedSink {
    fn record(&self, result: io::Result<usize>) -> io::Result<usize> {
        match result {
            Ok(n) => Ok(n),
            Err(e) => {
                let mut sink = self.0.borrow_mut();
                if sink.error.is_none() {
                    sink.error = Some(io::Error::new(e.kind(), e.to_string()));
                }
                Err(e)
            }
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.0.borrow_mut().out.write(buf);
        self.record(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.0.borrow_mut().out.flush().map(|()| 0);
        self.record(result).map(|_| ())
    }
}

/// Encodes frames as they arrive so a run never holds the whole sequence in memory.
pub struct SequenceAssembler {
    encoder: GifEncoder<SharedSink>,
    sink: SharedSink,
    delay: Delay,
    path: PathBuf,
    frames: u32,
}

impl SequenceAssembler {
    /// Create `path` (and its parent directories) and write the GIF header.
    pub fn create(path: &Path, frame_delay_ms: u32) -> Result<Self, RunError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RunError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| RunError::io(path, e))?;

        let sink = SharedSink(Rc::new(RefCell::new(Sink {
            out: BufWriter::new(file),
            error: None,
        })));
        let mut encoder = GifEncoder::new_with_speed(sink.clone(), ENCODER_SPEED);
        encoder.set_repeat(Repeat::Infinite)?;

        Ok(Self {
            encoder,
            sink,
            delay: Delay::from_numer_denom_ms(frame_delay_ms, 1),
            path: path.to_path_buf(),
            frames: 0,
        })
    }

    pub fn push(&mut self, image: RgbaImage) -> Result<(), RunError> {
        self.encoder
            .encode_frame(Frame::from_parts(image, 0, 0, self.delay))?;
        self.frames += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the trailer and flush the file. Returns the number of frames written.
    pub fn finish(self) -> Result<u32, RunError> {
        let Self {
            encoder,
            mut sink,
            path,
            frames,
            ..
        } = self;
        // Dropping the encoder writes the trailer into the sink.
        drop(encoder);

        let flushed = sink.flush();
        let recorded = sink.0.borrow_mut().error.take();
        match (recorded, flushed) {
            (Some(e), _) | (None, Err(e)) => Err(RunError::io(path, e)),
            (None, Ok(())) => Ok(frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use std::io::BufReader;

    fn solid(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(8, 8, image::Rgba([value, value, value, 255]))
    }

    #[test]
    fn test_writes_looping_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("7.gif");

        let mut assembler = SequenceAssembler::create(&path, 33).unwrap();
        for value in [0, 128, 255] {
            assembler.push(solid(value)).unwrap();
        }
        assert_eq!(assembler.path(), path.as_path());
        assert_eq!(assembler.finish().unwrap(), 3);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        // Netscape looping extension is present.
        assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        let (numer, denom) = frames[0].delay().numer_denom_ms();
        assert_eq!(numer / denom, 30, "GIF delays are stored in centiseconds");
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let result = SequenceAssembler::create(&blocker.join("1.gif"), 33);
        assert!(matches!(result, Err(RunError::Io { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_device_fails_at_finish() {
        let path = Path::new("/dev/full");
        let mut assembler = SequenceAssembler::create(path, 33).unwrap();
        for value in [0, 128, 255] {
            // Small frames stay buffered, so the failure surfaces at the final flush.
            assembler.push(solid(value)).unwrap();
        }

        match assembler.finish() {
            Err(RunError::Io { path: failed, .. }) => assert_eq!(failed.as_path(), path),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
