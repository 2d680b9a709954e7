use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32, bitrate: Option<&str>) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        bitrate: bitrate.map(str::to_owned),
    }
}

fn temp_out(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!(
            "seamcut_sink_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
        .join("out.mp4")
}

fn flatten(bg: Rgba8, px: [u8; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    flatten_onto(bg, &px, &mut out);
    out
}

#[test]
fn flatten_keeps_opaque_pixels_and_shows_background_through_transparent_ones() {
    let bg = Rgba8::new(10, 20, 30, 255);
    assert_eq!(flatten(bg, [1, 2, 3, 255]), [1, 2, 3, 255]);
    assert_eq!(flatten(bg, [200, 100, 50, 0]), [10, 20, 30, 255]);
    assert_eq!(flatten(Rgba8::BLACK, [255, 0, 0, 128]), [128, 0, 0, 255]);
}

#[test]
fn bitrate_notation() {
    for ok in ["8M", "2500k", "1.5M", "1200000"] {
        assert!(validate_bitrate(ok).is_ok(), "{ok}");
    }
    for bad in ["", "fast", "8MM", "-2M", "M"] {
        assert!(validate_bitrate(bad).is_err(), "{bad}");
    }
}

#[test]
fn encoder_args_carry_geometry_rate_and_bitrate() {
    let opts = FfmpegSinkOpts::new("/tmp/out.mp4");
    let args: Vec<String> = encoder_args(&opts, &cfg(64, 48, Some("4M")))
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args[0], "-y");
    let after = |flag: &str| {
        let i = args.iter().position(|a| a == flag).unwrap();
        args[i + 1].clone()
    };
    assert_eq!(after("-s"), "64x48");
    assert_eq!(after("-r"), "30/1");
    assert_eq!(after("-b:v"), "4M");
    assert_eq!(after("-c:v"), "libx264");
    assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));

    let mut keep = FfmpegSinkOpts::new("/tmp/out.mp4");
    keep.overwrite = false;
    let args = encoder_args(&keep, &cfg(64, 48, None));
    assert_eq!(args[0], "-n");
    assert!(!args.iter().any(|a| a == "-b:v"));
}

#[test]
fn invalid_configs_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(temp_out("invalid")));
    for bad in [cfg(3, 2, None), cfg(0, 2, None), cfg(4, 4, Some("fast"))] {
        assert!(matches!(sink.begin(bad), Err(SeamError::Validation(_))));
    }
    assert!(sink.encoder.is_none());
}

#[test]
fn pushing_or_ending_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(temp_out("unstarted")));
    let frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn second_begin_is_rejected_while_encoding() {
    if !crate::media::ffmpeg_tools_available() {
        return;
    }
    let out = temp_out("double_begin");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16, None)).unwrap();
    assert!(matches!(
        sink.begin(cfg(16, 16, None)),
        Err(SeamError::Validation(_))
    ));

    let frame = FrameRGBA::solid(16, 16, [40, 80, 120, 255]);
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    assert!(sink.push_frame(FrameIndex(1), &frame).is_err());
    sink.end().unwrap();
    assert!(out.exists());

    sink.begin(cfg(16, 16, None)).unwrap();
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.end().unwrap();

    std::fs::remove_dir_all(out.parent().unwrap()).unwrap();
}
