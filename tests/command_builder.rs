use std::cell::Cell;
use std::sync::Arc;

use ffcompose::command::{FilterDescriptor, FilterSpec, OutputTarget, PipeOptions};
use ffcompose::render::build_args;
use ffcompose::stream::MediaStream;
use ffcompose::{FfcomposeError, FfmpegCommand};

/// Test double recording whether it was paused
#[derive(Default)]
struct TestStream {
    readable: bool,
    writable: bool,
    paused: Cell<bool>,
}

impl TestStream {
    fn source() -> Arc<TestStream> {
        Arc::new(TestStream {
            readable: true,
            ..Default::default()
        })
    }

    fn sink() -> Arc<TestStream> {
        Arc::new(TestStream {
            writable: true,
            ..Default::default()
        })
    }
}

impl MediaStream for TestStream {
    fn readable(&self) -> bool {
        self.readable
    }

    fn writable(&self) -> bool {
        self.writable
    }

    fn pause(&self) {
        self.paused.set(true);
    }
}

fn as_stream(stream: &Arc<TestStream>) -> Arc<dyn MediaStream> {
    stream.clone()
}

#[test]
fn test_one_stream_input_and_one_stream_output() {
    let source = TestStream::source();
    let sink = TestStream::sink();

    let mut command = FfmpegCommand::new();
    command
        .input(as_stream(&source))
        .unwrap()
        .output(as_stream(&sink))
        .unwrap();

    assert!(source.paused.get());
    assert!(!sink.paused.get());
    assert!(command.inputs()[0].is_stream());
    assert!(command.outputs()[0].target().is_some_and(OutputTarget::is_stream));
}

#[test]
fn test_duplicate_streams_fail_on_second_registration() {
    let mut command = FfmpegCommand::new();
    command.input(as_stream(&TestStream::source())).unwrap();
    command.input("b.mp4").unwrap();

    let second = TestStream::source();
    let err = command.input(as_stream(&second)).unwrap_err();
    assert!(matches!(err, FfcomposeError::DuplicateStreamInput));
    assert!(!second.paused.get());
    assert_eq!(command.inputs().len(), 2);

    command.output(as_stream(&TestStream::sink())).unwrap();
    command.output("copy.mkv").unwrap();
    let err = command.output(as_stream(&TestStream::sink())).unwrap_err();
    assert!(matches!(err, FfcomposeError::DuplicateStreamOutput));
    assert_eq!(command.outputs().len(), 2);
}

#[test]
fn test_stream_without_capability_is_invalid() {
    let mut command = FfmpegCommand::new();

    let sink_as_source = TestStream::sink();
    let err = command.input(as_stream(&sink_as_source)).unwrap_err();
    assert!(matches!(err, FfcomposeError::InvalidInput(_)));
    assert!(!sink_as_source.paused.get());

    let err = command.output(as_stream(&TestStream::source())).unwrap_err();
    assert!(matches!(err, FfcomposeError::InvalidOutput(_)));
}

#[test]
fn test_placeholder_output_lifecycle() {
    let mut command = FfmpegCommand::new();

    let err = command.add_output(None, PipeOptions::default()).unwrap_err();
    assert!(matches!(err, FfcomposeError::InvalidOutput(_)));
    assert_eq!(command.outputs().len(), 1);

    command.output("first.mp4").unwrap();
    assert_eq!(command.outputs().len(), 1);

    command.output("second.mp4").unwrap();
    assert_eq!(command.outputs().len(), 2);

    let err = command.add_output(None, PipeOptions::default()).unwrap_err();
    assert!(matches!(err, FfcomposeError::InvalidOutput(_)));
    assert_eq!(command.outputs().len(), 2);
}

#[test]
fn test_no_audio_then_codec() {
    let mut command = FfmpegCommand::new();
    command.audio_bitrate(64).no_audio().audio_codec("aac");

    assert_eq!(
        command.current_output().audio().as_slice(),
        &["-an", "-acodec", "aac"]
    );
}

#[test]
fn test_filter_normalization_through_builder() {
    let mut command = FfmpegCommand::new();
    command.output("a.wav").unwrap().audio_filters(["volume=2"]);
    command
        .output("b.wav")
        .unwrap()
        .audio_filters(["volume=2", "atempo=1.5"]);
    command
        .output("c.wav")
        .unwrap()
        .audio_filters([FilterDescriptor::new("volume").option("v", "2")]);
    command.output("d.wav").unwrap().audio_filters(vec![
        FilterSpec::from("aresample=48000"),
        FilterDescriptor::new("aformat")
            .option("sample_fmts", "s16")
            .option("channel_layouts", "stereo")
            .into(),
    ]);

    let filters: Vec<Vec<String>> = command
        .outputs()
        .iter()
        .map(|output| output.audio_filters().to_vec())
        .collect();

    assert_eq!(filters[0], vec!["volume=2"]);
    assert_eq!(filters[1], vec!["volume=2", "atempo=1.5"]);
    assert_eq!(filters[2], vec!["volume=v=2"]);
    assert_eq!(
        filters[3],
        vec![
            "aresample=48000",
            "aformat=sample_fmts=s16:channel_layouts=stereo"
        ]
    );
}

#[test]
fn test_input_methods_before_any_input() {
    let mut command = FfmpegCommand::new();

    assert!(matches!(
        command.seek_input("00:00:05"),
        Err(FfcomposeError::NoCurrentInput)
    ));
    assert!(command.inputs().is_empty());

    // The command is still usable afterwards
    command.input("in.mp4").unwrap().seek_input("00:00:05").unwrap();
    assert_eq!(command.inputs()[0].options().as_slice(), &["-ss", "00:00:05"]);
}

#[test]
fn test_multi_input_multi_output_job() {
    let mut command = FfmpegCommand::new();
    command
        .input("video.mp4")
        .unwrap()
        .input("commentary.wav")
        .unwrap()
        .output("full.mkv")
        .unwrap()
        .map("0:v")
        .map("1:a")
        .video_codec("copy")
        .audio_codec("libopus")
        .output("preview.mp4")
        .unwrap()
        .map("0:v")
        .size("?x360")
        .unwrap()
        .duration(30)
        .no_audio();

    assert_eq!(
        build_args(&command),
        vec![
            "-i",
            "video.mp4",
            "-i",
            "commentary.wav",
            "-acodec",
            "libopus",
            "-vcodec",
            "copy",
            "-map",
            "[0:v]",
            "-map",
            "[1:a]",
            "full.mkv",
            "-an",
            "-filter:v",
            "scale=trunc(oh*a/2)*2:360",
            "-map",
            "[0:v]",
            "-t",
            "30",
            "preview.mp4",
        ]
    );
}

#[test]
fn test_named_and_closure_presets() {
    let mut command = FfmpegCommand::new();
    command
        .preset("podcast")
        .unwrap()
        .apply(|cmd| {
            cmd.audio_channels(2);
            Ok(())
        })
        .unwrap()
        .output("episode.m4v")
        .unwrap();

    let output = command.current_output();
    assert_eq!(&output.options().as_slice()[..2], &["-f", "m4v"]);
    assert_eq!(output.audio().as_slice().last().map(String::as_str), Some("2"));
    assert_eq!(output.size_filters().as_slice(), &["scale=320:176"]);

    let err = command.preset("missing").unwrap_err();
    assert!(matches!(err, FfcomposeError::PresetLoad { ref name, .. } if name == "missing"));
}
