#![cfg(unix)]

use std::sync::mpsc;
use std::time::Duration;

use forge_core::{compose, ProcessConfig};
use forge_engine::{
    ChannelProgressSink, CommandProcessingService, EngineEvent, FailureKind, ProcessingService,
};
use pretty_assertions::assert_eq;

fn shell(script: &str) -> CommandProcessingService {
    CommandProcessingService::new("sh").with_args(["-c", script, "sh"])
}

async fn run(
    service: &CommandProcessingService,
) -> (
    Result<forge_core::ProcessResult, forge_engine::ProcessError>,
    Vec<EngineEvent>,
) {
    let (tx, rx) = mpsc::channel();
    let sink = ChannelProgressSink::new(tx);
    let config = compose(&ProcessConfig::default(), None);
    let result = service
        .process_one(9, std::path::Path::new("/in/photo.png"), &config, &sink)
        .await;
    drop(sink);
    (result, rx.iter().collect())
}

#[tokio::test]
async fn progress_lines_and_result_are_parsed() {
    let service = shell(
        r#"cat > /dev/null
echo "progress 25"
echo "progress 90"
printf '{"success":true,"originalSize":100,"newSize":40,"compressionRatio":60.0,"outputPath":"%s.out"}\n' "$1""#,
    );
    let (result, events) = run(&service).await;

    let result = result.unwrap();
    assert_eq!(result.output_path, "/in/photo.png.out");
    assert_eq!(result.saved_bytes(), 60);
    assert_eq!(
        events,
        vec![
            EngineEvent::Progress {
                item_id: 9,
                percent: 25
            },
            EngineEvent::Progress {
                item_id: 9,
                percent: 90
            },
        ]
    );
}

#[tokio::test]
async fn config_is_written_to_stdin() {
    let service = shell(
        r#"grep -q '"outputFormat":"jpeg"' || exit 3
echo '{"success":true,"originalSize":1,"newSize":1,"compressionRatio":0.0,"outputPath":"x"}'"#,
    );
    let (result, _) = run(&service).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn large_stderr_output_does_not_stall_the_call() {
    let service = shell(
        r#"cat > /dev/null
head -c 262144 /dev/zero | tr '\0' 'x' >&2
echo '{"success":true,"originalSize":10,"newSize":5,"compressionRatio":50.0,"outputPath":"out"}'"#,
    );
    let (result, _) = tokio::time::timeout(Duration::from_secs(10), run(&service))
        .await
        .expect("call finished while stderr was busy");

    assert_eq!(result.unwrap().output_path, "out");
}

#[tokio::test]
async fn non_zero_exit_carries_stderr() {
    let service = shell("echo 'bad header' >&2; exit 2");
    let (result, _) = run(&service).await;

    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::ServiceFailed { exit_code: Some(2) });
    assert_eq!(err.message, "bad header");
}

#[tokio::test]
async fn garbage_output_is_invalid_response() {
    let service = shell("echo 'hello'");
    let (result, _) = run(&service).await;
    assert_eq!(result.unwrap_err().kind, FailureKind::InvalidResponse);
}

#[tokio::test]
async fn missing_program_is_spawn_failure() {
    let service = CommandProcessingService::new("/definitely/not/a/program");
    let (result, _) = run(&service).await;
    assert_eq!(result.unwrap_err().kind, FailureKind::Spawn);
}
