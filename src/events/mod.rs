//! # Events Module
//!
//! Progress reporting for the copy and verify phases.
//!
//! ## Design
//! The core library never prints. It emits events through a channel and any
//! front end (the CLI progress bar, a test, a log sink) subscribes to them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Copy(CopyEvent::Progress(p)) = event {
//!             println!("Copied {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
