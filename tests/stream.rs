use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spex::prelude::*;
use spex::{BufferedStream, StreamEvent};

async fn idle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn assert_no_listeners<C: spex::Chunk>(stream: &BufferedStream<C>) {
    for event in StreamEvent::ALL {
        assert_eq!(stream.listener_count(event), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn two_readable_batches_then_end() {
    let stream = BufferedStream::new();
    let writer = stream.clone();
    let mut calls = 0;

    let (summary, ()) = tokio::join!(
        read(
            &stream,
            |_, _: Vec<String>, _| {
                calls += 1;
                Ok(Mixed::value(()))
            },
            ReadOptions::new(),
        ),
        async move {
            idle().await;
            writer.write([String::from("ab"), String::from("cde")]);
            idle().await;
            writer.write([String::from("f")]);
            idle().await;
            writer.emit(StreamEvent::End);
        }
    );

    let summary = summary.unwrap();
    assert_eq!(summary.reads, 3);
    assert_eq!(summary.length, 6);
    assert_eq!(summary.calls, 2);
    assert_eq!(calls, 2);
    assert_no_listeners(&stream);
}

#[tokio::test(start_paused = true)]
async fn receiver_backpressure() {
    let stream = BufferedStream::new();
    let writer = stream.clone();
    let log = Rc::new(RefCell::new(Vec::new()));
    let receiver_log = log.clone();
    let writer_log = log.clone();

    let (summary, ()) = tokio::join!(
        read(
            &stream,
            move |index, chunks: Vec<Vec<u8>>, _| {
                let log = receiver_log.clone();
                log.borrow_mut().push(format!("receive {index}: {chunks:?}"));
                Ok(Mixed::deferred(async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    log.borrow_mut().push(format!("done {index}"));
                    Ok(())
                }))
            },
            ReadOptions::new(),
        ),
        async move {
            idle().await;
            writer.write([vec![1]]);
            idle().await;
            // arrives while the first batch is still being processed
            writer.write([vec![2], vec![3]]);
            writer_log.borrow_mut().push("wrote more".to_string());
            tokio::time::sleep(Duration::from_millis(500)).await;
            writer.finish();
        }
    );

    assert_eq!(summary.unwrap().calls, 2);
    assert_eq!(
        *log.borrow(),
        vec!["receive 0: [[1]]", "wrote more", "done 0", "receive 1: [[2], [3]]", "done 1"]
    );
    assert_no_listeners(&stream);
}

#[tokio::test(start_paused = true)]
async fn configured_read_size() {
    let config = spex::Config::from_toml_str("[stream]\nread_size = 4").unwrap();
    let spex = Spex::new().with_config(config);
    let stream = BufferedStream::new();
    let writer = stream.clone();
    let mut sizes = Vec::new();

    let (summary, ()) = tokio::join!(
        spex.read(
            &stream,
            |_, chunks: Vec<Vec<u8>>, _| {
                sizes.extend(chunks.iter().map(Vec::len));
                Ok(Mixed::value(()))
            },
            spex.read_options(),
        ),
        async move {
            idle().await;
            writer.write([vec![0; 10]]);
            writer.finish();
        }
    );

    assert_eq!(summary.unwrap().reads, 3);
    assert_eq!(sizes, vec![4, 4, 2]);
}
