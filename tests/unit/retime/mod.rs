use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::FrameIndex;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

/// Fake clip whose frames encode `(segment, source time in centiseconds)` in the first pixel.
struct FakeVideo {
    width: u32,
    height: u32,
    durations: Vec<f64>,
    decoded: AtomicUsize,
    cancel_after: Option<(usize, &'static AtomicBool)>,
}

impl FakeVideo {
    fn new(durations: &[f64]) -> Self {
        Self {
            width: 4,
            height: 2,
            durations: durations.to_vec(),
            decoded: AtomicUsize::new(0),
            cancel_after: None,
        }
    }

    fn sources(&self) -> Vec<VideoSourceInfo> {
        (0..self.durations.len())
            .map(|k| self.probe(&PathBuf::from(format!("clip{k}.mp4"))).unwrap())
            .collect()
    }
}

impl VideoBackend for FakeVideo {
    fn probe(&self, path: &Path) -> SeamResult<VideoSourceInfo> {
        let name = path.to_string_lossy();
        let k: usize = name
            .trim_start_matches("clip")
            .trim_end_matches(".mp4")
            .parse()
            .map_err(|_| SeamError::media(format!("no such clip '{name}'")))?;
        let duration_sec = *self
            .durations
            .get(k)
            .ok_or_else(|| SeamError::media(format!("no such clip '{name}'")))?;
        Ok(VideoSourceInfo {
            source_path: path.to_path_buf(),
            duration_sec,
            width: self.width,
            height: self.height,
            frame_rate: Fps::new(30, 1).ok(),
        })
    }

    fn extract_frame(&self, info: &VideoSourceInfo, time_sec: f64) -> SeamResult<FrameRGBA> {
        let n = self.decoded.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, flag)) = self.cancel_after
            && n >= limit
        {
            flag.store(true, Ordering::SeqCst);
        }
        let segment = info
            .source_path
            .to_string_lossy()
            .trim_start_matches("clip")
            .trim_end_matches(".mp4")
            .parse::<u8>()
            .unwrap_or(255);
        let centis = (time_sec * 100.0).round() as u16;
        let mut frame = FrameRGBA::solid(info.width, info.height, [0, 0, 0, 255]);
        frame.data[0] = segment;
        frame.data[1] = (centis >> 8) as u8;
        frame.data[2] = (centis & 0xff) as u8;
        Ok(frame)
    }
}

fn decode_marker(frame: &FrameRGBA) -> (usize, f64) {
    let centis = (u16::from(frame.data[1]) << 8) | u16::from(frame.data[2]);
    (usize::from(frame.data[0]), f64::from(centis) / 100.0)
}

fn eased_plan(durations: &[f64]) -> GlobalTimestampPlan {
    plan_segments(
        Ease::InOutQuad,
        durations,
        1.0,
        Fps::new(30, 1).unwrap(),
        &MapperOptions::default(),
    )
    .unwrap()
}

#[test]
fn parallel_delivery_is_ordered_and_matches_plan() {
    let video = FakeVideo::new(&[3.0, 5.0, 2.0]);
    let plan = eased_plan(&video.durations);
    let mut sink = InMemorySink::new();
    let threading = RetimeThreading {
        parallel: true,
        chunk_size: 7,
        threads: Some(3),
    };
    let stats = render_plan(
        &plan,
        &video.sources(),
        &video,
        &mut sink,
        &threading,
        Some("4M".to_owned()),
        &AtomicBool::new(false),
    )
    .unwrap();

    assert_eq!(stats.frames, 90);
    assert_eq!(stats.chunks, 13);
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (4, 2));
    assert_eq!(cfg.bitrate.as_deref(), Some("4M"));

    for ((idx, frame), gf) in sink.frames().iter().zip(&plan.frames) {
        assert_eq!(*idx, gf.index);
        let (segment, t) = decode_marker(frame);
        assert_eq!(segment, gf.segment);
        assert!((t - gf.source_time).abs() <= 0.005 + 1e-9);
    }
}

#[test]
fn sequential_and_parallel_agree() {
    let video = FakeVideo::new(&[2.0, 4.0]);
    let plan = eased_plan(&video.durations);
    let sources = video.sources();
    let run = |parallel: bool| {
        let mut sink = InMemorySink::new();
        let threading = RetimeThreading {
            parallel,
            chunk_size: 16,
            threads: Some(2),
        };
        render_plan(
            &plan,
            &sources,
            &video,
            &mut sink,
            &threading,
            None,
            &AtomicBool::new(false),
        )
        .unwrap();
        sink.frames().to_vec()
    };
    assert_eq!(run(false), run(true));
}

#[test]
fn cancellation_stops_before_the_next_chunk() {
    static CANCEL: AtomicBool = AtomicBool::new(false);
    let mut video = FakeVideo::new(&[3.0]);
    video.cancel_after = Some((20, &CANCEL));
    let plan = eased_plan(&video.durations);
    let mut sink = InMemorySink::new();
    let threading = RetimeThreading {
        parallel: false,
        chunk_size: 8,
        threads: None,
    };
    let err = render_plan(
        &plan,
        &video.sources(),
        &video,
        &mut sink,
        &threading,
        None,
        &CANCEL,
    )
    .unwrap_err();

    assert!(matches!(err, SeamError::Cancelled));
    assert!(!sink.is_finished());
    // Chunks 0 and 1 were delivered; chunk 2 flipped the flag while decoding and was dropped.
    assert_eq!(sink.frames().len(), 16);
    assert_eq!(video.decoded.load(Ordering::SeqCst), 24);
}

#[test]
fn pre_cancelled_run_pushes_nothing() {
    let video = FakeVideo::new(&[3.0]);
    let plan = eased_plan(&video.durations);
    let mut sink = InMemorySink::new();
    let err = render_plan(
        &plan,
        &video.sources(),
        &video,
        &mut sink,
        &RetimeThreading::default(),
        None,
        &AtomicBool::new(true),
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Cancelled));
    assert!(sink.frames().is_empty());
    assert_eq!(video.decoded.load(Ordering::SeqCst), 0);
}

#[test]
fn mismatched_inputs_are_rejected() {
    let video = FakeVideo::new(&[3.0, 3.0]);
    let plan = eased_plan(&video.durations);
    let mut sources = video.sources();
    let cancel = AtomicBool::new(false);
    let threading = RetimeThreading::default();

    let err = render_plan(
        &plan,
        &sources[..1],
        &video,
        &mut InMemorySink::new(),
        &threading,
        None,
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Validation(_)));

    sources[1].width = 8;
    let err = render_plan(
        &plan,
        &sources,
        &video,
        &mut InMemorySink::new(),
        &threading,
        None,
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Validation(_)));

    let bad_threads = RetimeThreading {
        threads: Some(0),
        ..RetimeThreading::default()
    };
    let err = render_plan(
        &plan,
        &video.sources(),
        &video,
        &mut InMemorySink::new(),
        &bad_threads,
        None,
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Validation(_)));
}

#[test]
fn retime_files_probes_plans_and_renders() {
    let video = FakeVideo::new(&[6.0, 2.0]);
    let mut sink = InMemorySink::new();
    let paths = [Path::new("clip0.mp4"), Path::new("clip1.mp4")];
    let (plan, stats) = retime_files(
        &video,
        &paths,
        Ease::Linear,
        0.5,
        Fps::new(24, 1).unwrap(),
        &mut sink,
        &RetimeOptions::default(),
        &AtomicBool::new(false),
    )
    .unwrap();
    assert_eq!(plan.len(), 24);
    assert_eq!(stats.frames, 24);
    assert_eq!(sink.frames().last().map(|(i, _)| *i), Some(FrameIndex(23)));

    let missing = [Path::new("clip9.mp4")];
    let err = retime_files(
        &video,
        &missing,
        Ease::Linear,
        0.5,
        Fps::new(24, 1).unwrap(),
        &mut InMemorySink::new(),
        &RetimeOptions::default(),
        &AtomicBool::new(false),
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Media(_)));
}

#[test]
fn empty_plan_is_rejected() {
    let video = FakeVideo::new(&[3.0]);
    let plan = plan_segments(
        Ease::Linear,
        &video.durations,
        0.01,
        Fps::new(30, 1).unwrap(),
        &MapperOptions::default(),
    )
    .unwrap();
    let err = render_plan(
        &plan,
        &video.sources(),
        &video,
        &mut InMemorySink::new(),
        &RetimeThreading::default(),
        None,
        &AtomicBool::new(false),
    )
    .unwrap_err();
    assert!(matches!(err, SeamError::Validation(_)));
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: RetimeOptions =
        serde_json::from_str(r#"{"easing": "sine-in-out", "threading": {"chunk_size": 8}}"#)
            .unwrap();
    assert_eq!(opts.easing, Ease::InOutSine);
    assert_eq!(opts.threading.chunk_size, 8);
    assert!(opts.threading.parallel);
    assert_eq!(opts.mapper, MapperOptions::default());
}
