// tests/sink_concurrency.rs

use std::io::Write;
use std::thread;

use taskweave::sink::SharedWriter;
use taskweave_test_utils::CaptureBuffer;

#[test]
fn concurrent_writes_never_interleave() {
    let out = CaptureBuffer::new();
    let writer = out.writer();

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let writer = writer.clone();
            thread::spawn(move || {
                let line = format!("writer-{id}:{}", "x".repeat(200));
                for _ in 0..100 {
                    writer.write_line(&line).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = out.lines();
    assert_eq!(lines.len(), 800);
    for line in lines {
        let (head, body) = line.split_once(':').unwrap();
        assert!(head.starts_with("writer-"), "corrupted line {line:?}");
        assert_eq!(body, "x".repeat(200));
    }
}

#[tokio::test]
async fn concurrent_tokio_tasks_share_one_sink() {
    let out = CaptureBuffer::new();
    let writer = out.writer();

    let mut tasks = Vec::new();
    for stream in ["stdout", "stderr"] {
        let writer = writer.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..50 {
                writer.write_line(&format!("{stream} line {i}")).unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let lines = out.lines();
    assert_eq!(lines.len(), 100);
    let stdout: Vec<_> = lines.iter().filter(|l| l.starts_with("stdout")).collect();
    assert_eq!(stdout.len(), 50);
    assert_eq!(stdout[49], "stdout line 49");
}

#[test]
fn prefix_applies_to_every_line_start() {
    let out = CaptureBuffer::new();
    let mut writer = out.writer();

    writer.write_line("before").unwrap();
    writer.set_prefix(Some(b"  | "));
    writer.write_all(b"one\ntwo\nthr").unwrap();
    writer.write_all(b"ee\n").unwrap();
    writer.set_prefix(None);
    writer.write_line("after").unwrap();

    assert_eq!(out.contents(), "before\n  | one\n  | two\n  | three\nafter\n");
}

#[test]
fn clones_write_to_the_same_destination() {
    let out = CaptureBuffer::new();
    let a: SharedWriter = out.writer();
    let b = a.clone();

    a.write_line("from a").unwrap();
    b.write_line("from b").unwrap();

    assert_eq!(out.lines(), vec!["from a", "from b"]);
}
