//! # Frame Loop Example
//!
//! Drives a hub from a tokio interval at ~60 fps for half a second.
//!
//! Shows:
//! - immediate vs. deferred delivery
//! - priority ordering inside one frame
//! - a weak subscription ending when its owner drops the handler
//! - a panicking handler being isolated
//!
//! ## Run
//! ```bash
//! RUST_LOG=tickbus=debug cargo run --example frame_loop
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tickbus::{handler, Event, HubConfig, IntervalHost, Lifetime};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug)]
struct Input {
    frame: u32,
}
impl Event for Input {}

#[derive(Clone, Copy, Debug)]
struct Alert {
    level: i32,
}
impl Event for Alert {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = IntervalHost::new(Duration::from_millis(16));
    let hub = tickbus::Hub::builder(host.clone())
        .with_config(HubConfig {
            sweep_interval_ticks: 10,
            ..HubConfig::default()
        })
        .build();

    let inputs = Rc::new(Cell::new(0u32));
    let counter = inputs.clone();
    let on_input = handler(move |e: &Input| {
        counter.set(counter.get() + 1);
        if e.frame == 3 {
            println!(" ├─► input at frame {}", e.frame);
        }
    });
    let _input_sub = hub.subscribe(&on_input, Lifetime::Weak)?;

    let _alerts = hub.subscribe_fn(|a: &Alert| println!(" ├─► alert level {}", a.level))?;
    let _faulty = hub.subscribe_fn(|a: &Alert| {
        if a.level > 5 {
            panic!("alert level {} is too high", a.level);
        }
    })?;

    // delivered next frame, lowest priority value first, neutral last
    hub.queue_with_priority(Alert { level: 9 }, 9)?;
    hub.queue_with_priority(Alert { level: -1 }, -1)?;
    hub.queue(Alert { level: 0 })?;
    hub.publish(Alert { level: 42 })?;

    let token = CancellationToken::new();
    let producer = {
        let hub = hub.clone();
        let token = token.clone();
        let mut on_input = Some(on_input);
        async move {
            for frame in 0..30 {
                let _ = hub.queue(Input { frame });
                if frame == 15 {
                    // the weak subscription dies with its handler
                    drop(on_input.take());
                }
                tokio::time::sleep(Duration::from_millis(16)).await;
            }
            token.cancel();
        }
    };

    let (frames, ()) = tokio::join!(host.run(token), producer);

    println!();
    println!("Summary:");
    println!(" ├─► frames:  {frames}");
    println!(" ├─► inputs:  {}", inputs.get());
    println!(" └─► stats:   {:?}", hub.stats());

    hub.dispose();
    Ok(())
}
