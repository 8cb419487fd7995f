use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

type FrameResult = Result<Frame, Box<dyn std::error::Error>>;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// Converts each decoded frame to RGB24 and wraps it in a [`Frame`].
/// Decoder state is dropped on `close` or when the reader goes out of scope.
pub struct FfmpegReader {
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    video_stream_index: usize,
    /// Set when the opened file has no bytes: there is nothing to decode.
    empty_source: bool,
}

// Safety: FfmpegReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegReader {}

impl FfmpegReader {
    pub fn new() -> Self {
        Self {
            input_ctx: None,
            video_stream_index: 0,
            empty_source: false,
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FfmpegReader {
    fn drop(&mut self) {
        self.close();
    }
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        self.close();

        if std::fs::metadata(path)?.len() == 0 {
            log::warn!("{} is empty; no frames to decode", path.display());
            self.empty_source = true;
            return Ok(VideoMetadata::empty(Some(path.to_path_buf())));
        }

        ffmpeg_next::init()?;
        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let fps = rational_to_f64(stream.rate())
            .or_else(|| rational_to_f64(stream.avg_frame_rate()))
            .unwrap_or(0.0);

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            total_frames: stream.frames().max(0) as usize,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        self.video_stream_index = video_stream_index;
        self.input_ctx = Some(ictx);

        Ok(metadata)
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = FrameResult> + '_> {
        if self.empty_source {
            return Box::new(std::iter::empty());
        }
        let video_stream_index = self.video_stream_index;
        let Some(ictx) = self.input_ctx.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegReader: not opened".into())));
        };

        match FfmpegFrameIter::new(ictx, video_stream_index) {
            Ok(iter) => Box::new(iter),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    fn close(&mut self) {
        self.input_ctx = None;
        self.empty_source = false;
    }
}

fn rational_to_f64(rate: ffmpeg_next::Rational) -> Option<f64> {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        return None;
    }
    Some(rate.numerator() as f64 / rate.denominator() as f64)
}

/// Lazy iterator that decodes video frames one at a time, avoiding the need
/// to buffer the entire video in memory.
struct FfmpegFrameIter<'a> {
    ictx: &'a mut ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl<'a> FfmpegFrameIter<'a> {
    fn new(
        ictx: &'a mut ffmpeg_next::format::context::Input,
        video_stream_index: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = ictx
            .stream(video_stream_index)
            .ok_or("Video stream disappeared after open")?;
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            width,
            height,
            video_stream_index,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn try_receive(&mut self) -> Option<FrameResult> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.frame_index);
        self.frame_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for FfmpegFrameIter<'_> {
    type Item = FrameResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            // Corrupt packets are skipped; the decoder resynchronizes on the next keyframe.
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Skipping undecodable packet: {e}");
                continue;
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping the row padding ffmpeg may add (stride > width * 3).
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Encodes `num_frames` solid-color MPEG-4 frames; frame `i` has green level `green(i)`.
    pub(crate) fn create_test_video(
        path: &Path,
        num_frames: usize,
        width: u32,
        height: u32,
        fps: i32,
        green: impl Fn(usize) -> u8,
    ) {
        ffmpeg_next::init().unwrap();

        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(0).unwrap().time_base();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .unwrap();

        for i in 0..num_frames {
            let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
            );
            let stride = rgb_frame.stride(0);
            let data = rgb_frame.data_mut(0);
            let g = green(i);
            for row in 0..height as usize {
                for col in 0..width as usize {
                    let offset = row * stride + col * 3;
                    data[offset] = 90;
                    data[offset + 1] = g;
                    data[offset + 2] = 60;
                }
            }

            let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
            scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
            yuv_frame.set_pts(Some(i as i64));
            encoder.send_frame(&yuv_frame).unwrap();

            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(0);
                encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
                encoded.write_interleaved(&mut octx).unwrap();
            }
        }

        encoder.send_eof().unwrap();
        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
            encoded.write_interleaved(&mut octx).unwrap();
        }
        octx.write_trailer().unwrap();
    }

    fn test_video_path(dir: &Path) -> PathBuf {
        dir.join("test.mp4")
    }

    #[test]
    fn test_open_returns_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 5, 160, 120, 30, |_| 128);

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!(meta.width, 160);
        assert_eq!(meta.height, 120);
        assert!(meta.has_usable_fps(), "fps was {}", meta.fps);
        assert_eq!(meta.source_path, Some(path));
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let mut reader = FfmpegReader::new();
        assert!(reader.open(Path::new("/nonexistent/test.mp4")).is_err());
    }

    #[test]
    fn test_open_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        std::fs::write(&path, b"definitely not a video container").unwrap();

        let mut reader = FfmpegReader::new();
        assert!(reader.open(&path).is_err());
    }

    #[test]
    fn test_empty_file_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        std::fs::write(&path, b"").unwrap();

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!(meta.total_frames, 0);
        assert!(!meta.has_usable_fps());
        assert_eq!(reader.frames().count(), 0);
    }

    #[test]
    fn test_frames_yields_correct_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 5, 160, 120, 30, |_| 128);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();

        let frames: Vec<_> = reader.frames().collect();
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|f| f.is_ok()));
    }

    #[test]
    fn test_frames_have_sequential_indices() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 5, 160, 120, 30, |_| 128);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();

        for (i, frame) in reader.frames().map(|f| f.unwrap()).enumerate() {
            assert_eq!(frame.index(), i);
        }
    }

    #[test]
    fn test_frames_are_3_channel_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 3, 160, 120, 30, |_| 200);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();

        let frame = reader.frames().next().unwrap().unwrap();
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.data().len(), 160 * 120 * 3);
        // Lossy YUV round trip keeps a solid color close to its source
        let green = frame.as_ndarray()[[60, 80, 1]] as i32;
        assert!((green - 200).abs() <= 12, "green was {green}");
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = FfmpegReader::new();
        let result = reader.frames().next().unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_early_termination_then_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 10, 64, 48, 30, |_| 128);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        assert_eq!(reader.frames().take(2).count(), 2);
        reader.close();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_video_path(dir.path());
        create_test_video(&path, 1, 160, 120, 30, |_| 128);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        reader.close();
        reader.close();
    }

    #[test]
    fn test_rational_to_f64() {
        assert_eq!(rational_to_f64(ffmpeg_next::Rational(30, 1)), Some(30.0));
        assert!((rational_to_f64(ffmpeg_next::Rational(30000, 1001)).unwrap() - 29.97).abs() < 0.01);
        assert_eq!(rational_to_f64(ffmpeg_next::Rational(0, 1)), None);
        assert_eq!(rational_to_f64(ffmpeg_next::Rational(30, 0)), None);
    }
}
